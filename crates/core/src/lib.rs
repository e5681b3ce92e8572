//! Core business logic for canvass.

pub mod services;

pub use services::*;
