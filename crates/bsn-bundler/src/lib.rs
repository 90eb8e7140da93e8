pub mod bundler;
pub mod combine;
pub mod config;
pub mod dirs;
pub mod finalize;
pub mod loader;
pub mod minify;
pub mod names;
pub mod release;
pub mod selection;
pub mod template;
pub mod universe;

pub use bundler::{BuildOptions, Bundler};
pub use config::Config;
pub use finalize::Emit;
