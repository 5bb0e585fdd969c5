//! Utility modules for the static site generator.

pub mod date;
pub mod minify;
pub mod slug;
pub mod value;
pub mod walk;
