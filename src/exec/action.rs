// src/exec/action.rs

//! What a session runs when a watched file changes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::errors::{PausewatchError, Result};
use crate::exec::context::ActionContext;
use crate::exec::shell::split_background;

type ActionFn = dyn Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync;

/// A named in-process action.
#[derive(Clone)]
pub struct NativeAction {
    name: String,
    f: Arc<ActionFn>,
}

impl NativeAction {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, ctx: &ActionContext) -> anyhow::Result<()> {
        (self.f)(ctx)
    }
}

impl fmt::Debug for NativeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeAction").field(&self.name).finish()
    }
}

/// The action bound to a session. Immutable once the session starts.
#[derive(Debug, Clone)]
pub enum ActionSpec {
    /// Run through the platform shell. A trailing `&` runs it in the
    /// background.
    Shell(String),
    /// Call an in-process function directly.
    Callable(NativeAction),
    /// Invoke a named command from the [`ActionRegistry`] command table.
    Interactive(String),
}

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").expect("symbol pattern is valid")
});

impl ActionSpec {
    /// A shell action, rejected up front if there is nothing to run.
    pub fn shell(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        ensure_runnable_shell(&text)?;
        Ok(ActionSpec::Shell(text))
    }

    /// Interpret free text typed by the user.
    ///
    /// - `:name` is an interactive command,
    /// - `[ "prog", "arg" ]` is a structured argv, quoted into a shell command,
    /// - `"..."` is a quoted shell command,
    /// - a bare symbol naming a registered callable is that callable,
    /// - anything else is a shell command.
    pub fn parse(text: &str, registry: &ActionRegistry) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PausewatchError::InvalidActionSpec("empty action".to_string()));
        }

        if let Some(name) = text.strip_prefix(':') {
            let spec = ActionSpec::Interactive(name.trim().to_string());
            spec.validate(registry)?;
            return Ok(spec);
        }

        if text.starts_with('[') {
            let argv: Vec<String> = parse_value(text)?;
            if argv.is_empty() {
                return Err(PausewatchError::InvalidActionSpec(
                    "structured action needs at least a program name".to_string(),
                ));
            }
            let joined: Vec<Cow<'_, str>> = argv.iter().map(|a| quote_arg(a)).collect();
            return ActionSpec::shell(joined.join(" "));
        }

        if text.starts_with('"') {
            let command: String = parse_value(text)?;
            return ActionSpec::shell(command);
        }

        if SYMBOL.is_match(text) {
            if let Some(action) = registry.callable(text) {
                return Ok(ActionSpec::Callable(action.clone()));
            }
        }

        ActionSpec::shell(text)
    }

    /// Fail fast on actions that cannot possibly run.
    pub fn validate(&self, registry: &ActionRegistry) -> Result<()> {
        match self {
            ActionSpec::Shell(text) => ensure_runnable_shell(text),
            ActionSpec::Callable(_) => Ok(()),
            ActionSpec::Interactive(name) if registry.has_command(name) => Ok(()),
            ActionSpec::Interactive(name) => Err(PausewatchError::InvalidActionSpec(format!(
                "unknown interactive command ':{name}'"
            ))),
        }
    }

    /// Short human-readable label for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            ActionSpec::Shell(text) => text.clone(),
            ActionSpec::Callable(action) => action.name().to_string(),
            ActionSpec::Interactive(name) => format!(":{name}"),
        }
    }
}

fn ensure_runnable_shell(text: &str) -> Result<()> {
    let (command, _background) = split_background(text);
    if command.is_empty() {
        return Err(PausewatchError::InvalidActionSpec(format!(
            "shell action {text:?} has no command"
        )));
    }
    Ok(())
}

/// Parse a single TOML value (string or array) typed on the command line.
fn parse_value<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T> {
    #[derive(Deserialize)]
    struct Wrapper<T> {
        v: T,
    }

    toml::from_str::<Wrapper<T>>(&format!("v = {text}"))
        .map(|w| w.v)
        .map_err(|e| {
            PausewatchError::InvalidActionSpec(format!(
                "cannot read {text:?}: {}",
                e.message()
            ))
        })
}

/// Quote one argument for a POSIX shell, leaving plain words alone.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

/// Named callables and interactive commands an action can refer to.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    callables: BTreeMap<String, NativeAction>,
    commands: BTreeMap<String, NativeAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the actions the `pausewatch` binary ships:
    /// callable `log-event`, commands `:clear` and `:bell`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_callable("log-event", |ctx| {
            match ctx.trigger() {
                Some(event) => info!(
                    kind = ?event.kind,
                    path = ?event.path,
                    path2 = ?event.path2,
                    "change detected"
                ),
                None => info!("change detected"),
            }
            Ok(())
        });

        registry.register_command("clear", |_ctx| {
            let mut out = std::io::stdout().lock();
            out.write_all(b"\x1b[2J\x1b[H")?;
            out.flush()?;
            Ok(())
        });

        registry.register_command("bell", |_ctx| {
            let mut out = std::io::stdout().lock();
            out.write_all(b"\x07")?;
            out.flush()?;
            Ok(())
        });

        registry
    }

    pub fn register_callable<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.callables
            .insert(name.to_string(), NativeAction::new(name, f));
    }

    pub fn register_command<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.commands
            .insert(name.to_string(), NativeAction::new(name, f));
    }

    pub fn callable(&self, name: &str) -> Option<&NativeAction> {
        self.callables.get(name)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn callable_names(&self) -> impl Iterator<Item = &str> {
        self.callables.keys().map(String::as_str)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Run a named interactive command.
    pub fn invoke_command(&self, name: &str, ctx: &ActionContext) -> Result<()> {
        let command = self.commands.get(name).ok_or_else(|| {
            PausewatchError::InvalidActionSpec(format!("unknown interactive command ':{name}'"))
        })?;
        command
            .call(ctx)
            .map_err(|e| PausewatchError::action_failed(format!(":{name}"), e))
    }
}
