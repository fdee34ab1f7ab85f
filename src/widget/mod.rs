// SPDX-License-Identifier: MPL-2.0

//! Terminal presentation surface

pub mod input;
pub mod renderer;
pub mod terminal;

pub use renderer::RenderParams;
