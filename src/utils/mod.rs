// Shared utilities module
pub mod code_frame;
pub mod config_loader;
pub mod errors;
pub mod logging;

pub use code_frame::*;
pub use config_loader::*;
pub use errors::*;
pub use logging::*;
