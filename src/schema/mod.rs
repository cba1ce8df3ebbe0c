//! Schema module - Configuration types for universe views.

mod config;

pub use config::*;
