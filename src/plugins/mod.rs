// Built-in plugins

pub mod minify_plugin;

pub use minify_plugin::MinifyPlugin;
