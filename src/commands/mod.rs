//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against a tag store or the batchfile.

pub mod create;
pub mod edit;
pub mod settings;
pub mod write;

// Re-export execute functions for convenience
pub use create::execute as create;
pub use edit::execute as edit;
pub use settings::execute as settings;
pub use write::execute as write;
