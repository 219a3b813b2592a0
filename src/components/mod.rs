//! The components module contains all shared components for our app.

mod app;
mod icons;
pub mod views;

pub use app::*;
pub use icons::*;
