mod builder;
mod feed;
mod markdown;
pub mod post;
pub mod render;
mod sitemap;

pub use builder::{base_path_from_config, BuildError, BuildResult, Builder};
