// SPDX-License-Identifier: MPL-2.0

use std::fs;

use desk_clock::config::{Rgb, Settings, default_payload};
use desk_clock::loader::{self, Fetch, HttpFetcher};
use desk_clock::{ClockApp, Command, Event, LoadError, store};

#[test]
fn missing_file_is_bootstrapped_with_defaults() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("clock_settings");

    let text = loader::load_or_bootstrap(&path).expect("bootstrap settings file");

    assert_eq!(text, default_payload());
    assert_eq!(fs::read_to_string(&path).expect("read settings file"), default_payload());
}

#[test]
fn existing_file_is_returned_untouched() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("clock_settings");
    fs::write(&path, "title::Mine\n").expect("write settings file");

    assert_eq!(loader::load_or_bootstrap(&path).expect("load"), "title::Mine\n");
}

#[test]
fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let err = loader::load_from_file(&dir.path().join("absent")).expect_err("file is absent");
    assert!(matches!(err, LoadError::NotFound { .. }), "unexpected error: {err}");
}

#[test]
fn save_without_network_writes_every_field() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("clock_settings");
    let settings = Settings {
        title: "Porch Clock".into(),
        background: Rgb::new(0, 0, 0),
        use_net_settings: false,
        ..Settings::default()
    };

    loader::save(&path, &settings).expect("save settings");

    let mut reread = Settings::default();
    store::apply(&fs::read_to_string(&path).expect("read back"), &mut reread).expect("parse back");
    assert_eq!(reread, settings);
}

#[test]
fn http_fetch_returns_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/clock_settings.txt")
        .with_status(200)
        .with_body("title::Net%Clock\nquery-interval::15\n")
        .create();

    let fetcher = HttpFetcher::new().expect("build client");
    let body = fetcher
        .fetch(&format!("{}/clock_settings.txt", server.url()))
        .expect("fetch settings");

    mock.assert();
    assert_eq!(body, "title::Net%Clock\nquery-interval::15\n");
}

#[test]
fn http_error_status_is_a_load_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/gone").with_status(404).create();

    let fetcher = HttpFetcher::new().expect("build client");
    let err = fetcher
        .fetch(&format!("{}/gone", server.url()))
        .expect_err("404 should fail");

    assert!(matches!(err, LoadError::Status { status: 404, .. }), "unexpected error: {err}");
}

#[test]
fn startup_merges_file_and_network_settings() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/clock_settings.txt")
        .with_status(200)
        .with_body("# served remotely\nbackground-color::(0,0,90)\n")
        .create();

    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("clock_settings");
    fs::write(
        &path,
        format!(
            "title::Shop%Clock\nfont-color::(1,2,3)\nsettings-url::{}/clock_settings.txt\n",
            server.url()
        ),
    )
    .expect("write settings file");

    let fetcher = HttpFetcher::new().expect("build client");
    let mut app = ClockApp::load(&path, &fetcher);

    assert_eq!(app.settings().title, "Shop Clock");
    assert_eq!(app.settings().foreground, Rgb::new(1, 2, 3));
    assert_eq!(app.settings().background, Rgb::new(0, 0, 90));

    let reload = app.update(Event::ReloadNetwork);
    assert_eq!(reload, Command::Fetch(format!("{}/clock_settings.txt", server.url())));
}

#[test]
fn unreachable_network_keeps_file_settings() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("clock_settings");
    fs::write(&path, "title::Offline\nsettings-url::http://127.0.0.1:1/settings\n")
        .expect("write settings file");

    let fetcher = HttpFetcher::new().expect("build client");
    let app = ClockApp::load(&path, &fetcher);

    assert_eq!(app.settings().title, "Offline");
    assert_eq!(app.display_title(), "Offline");
}
