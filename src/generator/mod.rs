//! Generated files besides the pages.

pub mod sitemap;
