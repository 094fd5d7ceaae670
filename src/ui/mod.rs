//! UI abstraction layer
//!
//! Interactive prompts go through the [`UserInput`] trait so the interpreter
//! can run against a terminal or a scripted answer list.
//!
//! - [`DialoguerInput`] - terminal prompts (dialoguer, or stdin when piped)
//! - [`ScriptedInput`] - predetermined answers for tests and automation

pub mod input;
pub mod mock;

pub use input::{DialoguerInput, InputError, UserInput};
pub use mock::ScriptedInput;
