// Ultra Minify - render-stage minification for the Ultra bundler

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod plugins;
pub mod utils;
