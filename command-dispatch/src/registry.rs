//! Command registry: exact-match commands, regex rules, and the platform command menu.
//!
//! Mutations (`add_commands` / `remove_commands`) are serialized by one async mutex that is held
//! across the remote resync. Readers never see a half-built lookup table: every mutation builds a
//! new table and swaps the `Arc` in one step.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use loader_core::{ChatPlatform, CommandSpec, DispatchError, Result};
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::handler::CommandHandler;

/// Marker in front of every exact-match command as typed by users (`/start`).
pub const COMMAND_PREFIX: &str = "/";

/// A registered command. `name` is stored without the prefix marker.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler,
        }
    }

    pub fn spec(&self) -> CommandSpec {
        CommandSpec {
            command: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Identity: same name, same description, same handler instance.
    fn is_same(&self, other: &Command) -> bool {
        self.name == other.name
            && self.description == other.description
            && std::ptr::eq(
                Arc::as_ptr(&self.handler) as *const (),
                Arc::as_ptr(&other.handler) as *const (),
            )
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

type LookupTable = HashMap<String, Arc<dyn CommandHandler>>;

struct RegexRule {
    pattern: String,
    regex: Regex,
    handler: Arc<dyn CommandHandler>,
}

pub struct CommandRegistry {
    platform: Arc<dyn ChatPlatform>,
    lang_codes: Vec<String>,
    commands: Mutex<Vec<Command>>,
    table: RwLock<Arc<LookupTable>>,
    regex_rules: RwLock<Vec<RegexRule>>,
}

impl CommandRegistry {
    /// Creates an empty registry that publishes its command list for every locale in `lang_codes`.
    pub fn new(platform: Arc<dyn ChatPlatform>, lang_codes: Vec<String>) -> Self {
        Self {
            platform,
            lang_codes,
            commands: Mutex::new(Vec::new()),
            table: RwLock::new(Arc::new(HashMap::new())),
            regex_rules: RwLock::new(Vec::new()),
        }
    }

    /// Appends `commands` (a command with an already registered name replaces it), pushes the full
    /// list to the platform for every locale, then swaps in a rebuilt lookup table.
    ///
    /// If the platform rejects the list, nothing changes locally.
    #[instrument(skip(self, commands), fields(count = commands.len()))]
    pub async fn add_commands(&self, commands: Vec<Command>) -> Result<()> {
        let mut current = self.commands.lock().await;
        let mut next = current.clone();
        for command in commands {
            match next.iter_mut().find(|c| c.name == command.name) {
                Some(existing) => {
                    debug!(command = %command.name, "Replacing registered command");
                    *existing = command;
                }
                None => next.push(command),
            }
        }

        self.push_to_platform(&next).await?;
        self.swap_table(&next);
        *current = next;
        Ok(())
    }

    /// Removes each of `commands` by identity; a command that is not registered is logged and
    /// skipped. The remaining list is pushed to the platform afterwards.
    #[instrument(skip(self, commands), fields(count = commands.len()))]
    pub async fn remove_commands(&self, commands: &[Command]) -> Result<()> {
        let mut current = self.commands.lock().await;
        let mut next = current.clone();
        for command in commands {
            match next.iter().position(|c| c.is_same(command)) {
                Some(index) => {
                    next.remove(index);
                }
                None => warn!(command = %command.name, "Command not found"),
            }
        }

        self.push_to_platform(&next).await?;
        self.swap_table(&next);
        *current = next;
        Ok(())
    }

    /// Exact match of the first whitespace-delimited token of `text`, prefix marker included.
    /// Case-sensitive.
    pub fn lookup(&self, text: &str) -> Option<Arc<dyn CommandHandler>> {
        let token = text.split_whitespace().next()?;
        let table = self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        table.get(token).cloned()
    }

    /// Registers `handler` for texts fully matching `pattern`. A rule with the same pattern is
    /// overwritten in place.
    pub fn add_regex_rule(&self, pattern: &str, handler: Arc<dyn CommandHandler>) -> Result<()> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| DispatchError::InvalidRule(e.to_string()))?;
        let mut rules = self
            .regex_rules
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(rule) => {
                rule.regex = regex;
                rule.handler = handler;
            }
            None => rules.push(RegexRule {
                pattern: pattern.to_string(),
                regex,
                handler,
            }),
        }
        Ok(())
    }

    pub fn get_regex_rules(&self) -> Vec<(String, Arc<dyn CommandHandler>)> {
        self.regex_rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| (r.pattern.clone(), r.handler.clone()))
            .collect()
    }

    /// First rule whose pattern matches the whole `text`. Rule priority beyond that is unspecified.
    pub fn match_regex(&self, text: &str) -> Option<Arc<dyn CommandHandler>> {
        self.regex_rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.regex.is_match(text))
            .map(|r| r.handler.clone())
    }

    /// Snapshot of the registered commands as published to the platform.
    pub async fn command_specs(&self) -> Vec<CommandSpec> {
        self.commands.lock().await.iter().map(Command::spec).collect()
    }

    async fn push_to_platform(&self, commands: &[Command]) -> Result<()> {
        let specs: Vec<CommandSpec> = commands.iter().map(Command::spec).collect();
        for lang_code in &self.lang_codes {
            self.platform.set_commands(&specs, lang_code).await?;
        }
        info!(
            commands = specs.len(),
            locales = ?self.lang_codes,
            "Command list pushed to platform"
        );
        Ok(())
    }

    fn swap_table(&self, commands: &[Command]) {
        let table: LookupTable = commands
            .iter()
            .map(|c| (format!("{COMMAND_PREFIX}{}", c.name), c.handler.clone()))
            .collect();
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
    }
}
