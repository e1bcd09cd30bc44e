//! Named commands over parsed params.
//!
//! A [`Shell`] is a registry of [`Command`]s. Executing a command parses the
//! caller's params with the command's [`Type`](crate::Type), rejects them
//! with [`ShellError::InvalidParams`] if any field fails, and otherwise runs
//! the command's async handler with the parsed record.
//!
//! # Example
//!
//! ```rust
//! use mapparse::converter::{int32, required};
//! use mapparse::shell::{Command, Shell};
//! use mapparse::{Map, Type, Value};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let shell = Shell::new();
//! shell
//!     .register(
//!         Command::new("add")
//!             .params(
//!                 Type::new()
//!                     .field("a", [required(), int32()])
//!                     .field("b", [required(), int32()]),
//!             )
//!             .exec(|params| async move {
//!                 let sum = params.get("a").as_i64().unwrap_or(0)
//!                     + params.get("b").as_i64().unwrap_or(0);
//!                 let mut out = Map::new();
//!                 out.insert("sum".to_string(), Value::Int(sum));
//!                 Ok(Some(out))
//!             }),
//!     )
//!     .unwrap();
//!
//! let params = Value::from(json!({"a": 1, "b": 2})).into_map().unwrap();
//! let body = shell.exec_json("add", params).await.unwrap();
//! assert_eq!(body, br#"{"sum":3}"#.to_vec());
//! # });
//! ```

mod command;
mod error;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::Map;

pub use command::Command;
pub use error::{BoxError, ShellError};

/// A thread-safe registry of commands.
///
/// Cloning a shell is cheap and clones share the same commands, so one
/// shell can be handed to many request handlers.
#[derive(Clone, Default)]
pub struct Shell {
    commands: Arc<RwLock<HashMap<String, Arc<Command>>>>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name.
    ///
    /// Fails with [`ShellError::DuplicateCommand`] if the name is taken; the
    /// registered command is kept.
    pub fn register(&self, command: Command) -> Result<(), ShellError> {
        let mut commands = self.commands.write();
        if commands.contains_key(command.name()) {
            return Err(ShellError::DuplicateCommand(command.name().to_string()));
        }
        tracing::debug!(command = %command.name(), "registered command");
        commands.insert(command.name().to_string(), Arc::new(command));
        Ok(())
    }

    /// Looks up a command by name.
    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.read().get(name).cloned()
    }

    /// Returns the registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Runs the named command and returns its response as a map. `None`
    /// means the command produced no content.
    pub async fn exec(&self, name: &str, params: Map) -> Result<Option<Map>, ShellError> {
        let command = self.lookup(name)?;
        command.run(params).await
    }

    /// Runs the named command and returns its response as JSON bytes.
    /// Empty bytes mean the command produced no content.
    pub async fn exec_json(&self, name: &str, params: Map) -> Result<Vec<u8>, ShellError> {
        let command = self.lookup(name)?;
        command.run_json(params).await
    }

    fn lookup(&self, name: &str) -> Result<Arc<Command>, ShellError> {
        match self.command(name) {
            Some(command) => {
                tracing::debug!(command = %name, "executing command");
                Ok(command)
            }
            None => {
                tracing::warn!(command = %name, "command not found");
                Err(ShellError::CommandNotFound(name.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell").field("commands", &self.names()).finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Shell>();
    assert_sync::<Shell>();
    assert_send::<Command>();
    assert_sync::<Command>();
};
