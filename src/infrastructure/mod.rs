// Infrastructure layer
pub mod processors;

pub use processors::*;
