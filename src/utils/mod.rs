//! Utility modules for the site generator.

pub mod escape;
pub mod minify;
pub mod slug;
