//! Config-driven listeners.
//!
//! Operations are declared in files under `<root>/<event name>/` and run
//! after the static listeners of that event. Each file (JSON, YAML or TOML)
//! holds a list of operations, either as a bare list or under an
//! `operations` key:
//!
//! ```yaml
//! - service: audit
//!   method: record
//!   args: ["{event}", "{data}"]
//! ```
//!
//! String arguments may contain `{event}`, `{data}` and `{dynamic_path}`
//! placeholders. An argument that is exactly `"{data}"` is replaced by the
//! payload itself rather than its text. An operation returning the string
//! [`STOP_PROPAGATION`] ends the dynamic phase for the current dispatch.
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::event::error::{EventSystemError, Result};
use crate::event::{EventPayload, EventResult};
use crate::kernel::component::ServiceContainer;
use crate::storage::config::ConfigFormat;
use crate::utils::fs::{files_with_extensions, subdirectory_names};

pub use crate::kernel::constants::STOP_PROPAGATION;

/// One service call declared in a dynamic definition file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DynamicOperation {
    pub service: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    List(Vec<DynamicOperation>),
    Table { operations: Vec<DynamicOperation> },
}

/// Placeholder values for one operation
struct Substitutions<'a> {
    event: &'a str,
    data: &'a Value,
    dynamic_path: String,
}

impl Substitutions<'_> {
    fn apply(&self, value: &Value) -> Value {
        match value {
            Value::String(text) if text == "{data}" => self.data.clone(),
            Value::String(text) => Value::String(self.expand(text)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.apply(item)).collect()),
            Value::Object(map) => Value::Object(
                map.iter().map(|(key, item)| (key.clone(), self.apply(item))).collect(),
            ),
            other => other.clone(),
        }
    }

    /// Replace placeholders in one left-to-right pass; inserted text is
    /// never scanned again.
    fn expand(&self, text: &str) -> String {
        let data = value_text(self.data);
        let placeholders = [
            ("{event}", self.event),
            ("{data}", data.as_str()),
            ("{dynamic_path}", self.dynamic_path.as_str()),
        ];

        let mut expanded = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('{') {
            expanded.push_str(&rest[..start]);
            let tail = &rest[start..];
            match placeholders.iter().find(|(token, _)| tail.starts_with(token)) {
                Some((token, value)) => {
                    expanded.push_str(value);
                    rest = &tail[token.len()..];
                }
                None => {
                    expanded.push('{');
                    rest = &tail[1..];
                }
            }
        }
        expanded.push_str(rest);
        expanded
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render a payload for placeholder substitution.
///
/// JSON values, strings, booleans and numbers are understood; any other
/// payload renders as `null`.
pub fn render_payload(data: Option<&EventPayload>) -> Value {
    let Some(data) = data else {
        return Value::Null;
    };
    if let Some(value) = data.downcast_ref::<Value>() {
        value.clone()
    } else if let Some(text) = data.downcast_ref::<String>() {
        Value::String(text.clone())
    } else if let Some(text) = data.downcast_ref::<&'static str>() {
        Value::String((*text).to_string())
    } else if let Some(flag) = data.downcast_ref::<bool>() {
        Value::Bool(*flag)
    } else if let Some(number) = data.downcast_ref::<i64>() {
        Value::from(*number)
    } else if let Some(number) = data.downcast_ref::<u64>() {
        Value::from(*number)
    } else if let Some(number) = data.downcast_ref::<f64>() {
        Value::from(*number)
    } else {
        Value::Null
    }
}

/// Runs the operations declared for an event against the service container
pub struct DynamicListenerLoader {
    root: PathBuf,
    container: Arc<ServiceContainer>,
}

impl fmt::Debug for DynamicListenerLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicListenerLoader")
         .field("root", &self.root)
         .finish_non_exhaustive()
    }
}

impl DynamicListenerLoader {
    pub fn new(root: impl Into<PathBuf>, container: Arc<ServiceContainer>) -> Self {
        Self { root: root.into(), container }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the definitions of `event`.
    ///
    /// `None` for names that are not a single plain path component, so an
    /// event name can never point outside the root.
    pub fn event_dir(&self, event: &str) -> Option<PathBuf> {
        let mut components = Path::new(event).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == event => Some(self.root.join(name)),
            _ => None,
        }
    }

    /// Definition files of `event`, in path order
    pub fn definition_files(&self, event: &str) -> Result<Vec<PathBuf>> {
        let Some(dir) = self.event_dir(event) else {
            log::warn!("Event name {:?} cannot name a dynamic listener directory; skipping", event);
            return Ok(Vec::new());
        };
        files_with_extensions(&dir, ConfigFormat::known_extensions()).map_err(|e| {
            EventSystemError::DynamicDefinition { path: dir.clone(), reason: e.to_string() }
        })
    }

    /// Parse one definition file
    pub fn load_definitions(path: &Path) -> Result<Vec<DynamicOperation>> {
        let file: DefinitionFile = ConfigFormat::read_file(path).map_err(|e| {
            EventSystemError::DynamicDefinition { path: path.to_path_buf(), reason: e.to_string() }
        })?;
        Ok(match file {
            DefinitionFile::List(operations) => operations,
            DefinitionFile::Table { operations } => operations,
        })
    }

    /// Events that have a definition directory, sorted
    pub fn events(&self) -> Result<Vec<String>> {
        subdirectory_names(&self.root).map_err(|e| EventSystemError::DynamicDefinition {
            path: self.root.clone(),
            reason: e.to_string(),
        })
    }

    /// Run every operation declared for `event`, file by file.
    ///
    /// Returns [`EventResult::Stop`] when an operation answered with
    /// [`STOP_PROPAGATION`]; nothing after it runs.
    pub fn dispatch(&self, event: &str, data: Option<&EventPayload>) -> Result<EventResult> {
        let files = self.definition_files(event)?;
        if files.is_empty() {
            return Ok(EventResult::Continue);
        }

        let data = render_payload(data);
        for path in files {
            let substitutions = Substitutions {
                event,
                data: &data,
                dynamic_path: path.display().to_string(),
            };
            for operation in Self::load_definitions(&path)? {
                let args: Vec<Value> = operation.args.iter().map(|arg| substitutions.apply(arg)).collect();
                log::debug!(
                    "Dynamic listener {} calls {}::{} for event {}",
                    path.display(), operation.service, operation.method, event
                );
                let result = self.container.call(&operation.service, &operation.method, &args)?;
                if result.as_str() == Some(STOP_PROPAGATION) {
                    log::debug!("Dynamic listener {} stopped propagation of {}", path.display(), event);
                    return Ok(EventResult::Stop);
                }
            }
        }
        Ok(EventResult::Continue)
    }
}
