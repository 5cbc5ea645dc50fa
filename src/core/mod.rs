// Core domain layer
pub mod interfaces;
pub mod models;
pub mod name_cache;
pub mod options;
pub mod plugin;

pub use interfaces::*;
pub use models::*;
pub use name_cache::*;
pub use options::*;
pub use plugin::*;
