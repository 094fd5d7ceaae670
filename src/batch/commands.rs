//! Batchfile commands
//!
//! Commands are looked up by name in a [`CommandRegistry`]. Each registered
//! [`CommandSpec`] declares its arity and a handler that mutates the
//! [`Environment`]; the registry checks the arity before calling the handler,
//! so handlers can index their arguments directly.
//!
//! | Command            | Alias  | Arguments                      |
//! |--------------------|--------|--------------------------------|
//! | `set`              |        | KEY VALUE                      |
//! | `set-once`         | `seto` | KEY VALUE                      |
//! | `unset`            |        | KEY                            |
//! | `reset`            |        |                                |
//! | `set-incrementing` | `seti` | KEY INITIAL \[FORMAT\]         |
//! | `set-pattern`      | `setp` | TO FROM PATTERN REPLACEMENT    |

use std::collections::HashMap;

use super::env::{Environment, is_internal};
use super::error::{BatchError, LineRef};
use super::format::{DEFAULT_FORMAT, IncrementFormat};
use super::pattern::PatternRule;

/// Handler signature shared by all commands
pub type Handler = fn(&mut Environment, &[String]) -> Result<(), String>;

/// A named batchfile command
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Argument synopsis, e.g. `KEY VALUE`
    pub usage: &'static str,
    pub summary: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    /// First argument names the key the command edits
    pub edits_key: bool,
    pub handler: Handler,
}

impl CommandSpec {
    /// Name followed by the argument synopsis, e.g. `set KEY VALUE`
    #[must_use]
    pub fn synopsis(&self) -> String {
        if self.usage.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }
}

/// Where a command was issued from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A batchfile line
    Batchfile(usize),
    /// The interactive prompt while a file is being previewed
    Prompt,
}

impl Origin {
    const fn line(self) -> LineRef {
        match self {
            Self::Batchfile(line) => LineRef(Some(line)),
            Self::Prompt => LineRef(None),
        }
    }
}

/// Lookup table from command names and aliases to their specs
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
    names: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in commands
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in builtin_commands() {
            registry.register(spec);
        }
        registry
    }

    /// Add a command, replacing any earlier command with the same name or alias
    pub fn register(&mut self, spec: CommandSpec) {
        let index = self.specs.len();
        self.names.insert(spec.name, index);
        for alias in spec.aliases {
            self.names.insert(*alias, index);
        }
        self.specs.push(spec);
    }

    /// Look up a command by name or alias
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.names.get(name).map(|&i| &self.specs[i])
    }

    /// Registered commands that are still reachable by name, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.specs
            .iter()
            .enumerate()
            .filter(|(i, spec)| self.names.get(spec.name) == Some(i))
            .map(|(_, spec)| spec)
    }

    /// Run a tokenized command against the environment.
    ///
    /// # Errors
    /// * `BatchError::UnrecognizedCommand` if the name is not registered.
    /// * `BatchError::CommandArgument` for a wrong argument count, an internal
    ///   key edited from the prompt, or a handler rejecting its arguments.
    pub fn execute(
        &self,
        env: &mut Environment,
        words: &[String],
        origin: Origin,
    ) -> Result<(), BatchError> {
        let Some((name, args)) = words.split_first() else {
            return Err(BatchError::UnrecognizedCommand {
                command: String::new(),
                line: origin.line(),
            });
        };
        let spec = self
            .get(name)
            .ok_or_else(|| BatchError::UnrecognizedCommand {
                command: name.clone(),
                line: origin.line(),
            })?;
        let argument_error = |reason: String| BatchError::CommandArgument {
            command: name.clone(),
            line: origin.line(),
            reason,
        };

        if args.len() < spec.min_args || args.len() > spec.max_args {
            return Err(argument_error(format!("usage: {}", spec.synopsis())));
        }
        if origin == Origin::Prompt
            && spec.edits_key
            && args.first().is_some_and(|k| is_internal(k))
        {
            return Err(argument_error(format!(
                "internal key '{}' cannot be edited from the prompt",
                args[0]
            )));
        }

        tracing::debug!(command = spec.name, ?args, ?origin, "executing command");
        (spec.handler)(env, args).map_err(argument_error)
    }
}

fn builtin_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "set",
            aliases: &[],
            usage: "KEY VALUE",
            summary: "Set KEY to VALUE for every following file",
            min_args: 2,
            max_args: 2,
            edits_key: true,
            handler: set,
        },
        CommandSpec {
            name: "set-once",
            aliases: &["seto"],
            usage: "KEY VALUE",
            summary: "Set KEY to VALUE for the next file only",
            min_args: 2,
            max_args: 2,
            edits_key: true,
            handler: set_once,
        },
        CommandSpec {
            name: "unset",
            aliases: &[],
            usage: "KEY",
            summary: "Stop setting KEY and forget its modifiers",
            min_args: 1,
            max_args: 1,
            edits_key: true,
            handler: unset,
        },
        CommandSpec {
            name: "reset",
            aliases: &[],
            usage: "",
            summary: "Unset every key",
            min_args: 0,
            max_args: 0,
            edits_key: false,
            handler: reset,
        },
        CommandSpec {
            name: "set-incrementing",
            aliases: &["seti"],
            usage: "KEY INITIAL [FORMAT]",
            summary: "Set KEY to the integer INITIAL, adding one after each written file",
            min_args: 2,
            max_args: 3,
            edits_key: true,
            handler: set_incrementing,
        },
        CommandSpec {
            name: "set-pattern",
            aliases: &["setp"],
            usage: "TO FROM PATTERN REPLACEMENT",
            summary: "Derive TO from FROM by regex substitution before each file",
            min_args: 4,
            max_args: 4,
            edits_key: true,
            handler: set_pattern,
        },
    ]
}

fn set(env: &mut Environment, args: &[String]) -> Result<(), String> {
    env.set(&args[0], &args[1]);
    Ok(())
}

fn set_once(env: &mut Environment, args: &[String]) -> Result<(), String> {
    env.set_once(&args[0], &args[1]);
    Ok(())
}

fn unset(env: &mut Environment, args: &[String]) -> Result<(), String> {
    env.unset(&args[0]).map_err(|e| e.to_string())
}

fn reset(env: &mut Environment, _args: &[String]) -> Result<(), String> {
    env.reset();
    Ok(())
}

fn set_incrementing(env: &mut Environment, args: &[String]) -> Result<(), String> {
    let initial: i64 = args[1]
        .trim()
        .parse()
        .map_err(|_| format!("INITIAL '{}' is not an integer", args[1]))?;
    let format = IncrementFormat::parse(args.get(2).map_or(DEFAULT_FORMAT, String::as_str))
        .map_err(|e| e.to_string())?;
    env.set_incrementing(&args[0], initial, format);
    Ok(())
}

fn set_pattern(env: &mut Environment, args: &[String]) -> Result<(), String> {
    let rule = PatternRule::new(&args[1], &args[2], &args[3]).map_err(|e| e.to_string())?;
    env.set_pattern(&args[0], rule);
    Ok(())
}
