use std::any::{Any, type_name};
use std::fmt;

use crate::event::error::EventSystemError;
use crate::event::{EventListener, EventPayload, EventResult, ListenerFn, ListenerResult};

/// A registered unit of behavior.
///
/// `Handler` and `Function` are the two invocable variants. `Unsupported`
/// holds any other value handed to [`Listener::from_any`]; it is accepted at
/// registration and rejected with [`EventSystemError::InvalidListener`] once a
/// dispatch reaches it.
pub enum Listener {
    Handler(Box<dyn EventListener>),
    Function {
        label: String,
        func: Box<ListenerFn>,
    },
    Unsupported {
        type_name: &'static str,
    },
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Handler(handler) => f.debug_tuple("Handler").field(&handler.label()).finish(),
            Listener::Function { label, .. } => f.debug_struct("Function").field("label", label).finish_non_exhaustive(),
            Listener::Unsupported { type_name } => f.debug_struct("Unsupported").field("type_name", type_name).finish(),
        }
    }
}

impl Listener {
    /// Wrap an object listener
    pub fn handler<L: EventListener + 'static>(listener: L) -> Self {
        Listener::Handler(Box::new(listener))
    }

    /// Wrap a plain function, labelled with its type name
    pub fn function<F>(func: F) -> Self
    where
        F: Fn(Option<&EventPayload>, &str) -> ListenerResult + Send + Sync + 'static,
    {
        Listener::Function { label: type_name::<F>().to_string(), func: Box::new(func) }
    }

    /// Wrap a plain function under an explicit label
    pub fn named_function<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(Option<&EventPayload>, &str) -> ListenerResult + Send + Sync + 'static,
    {
        Listener::Function { label: label.into(), func: Box::new(func) }
    }

    /// Wrap any [`EventListener`], including plain closures with the
    /// listener signature. Always invocable.
    pub fn from_value<L: EventListener + 'static>(value: L) -> Self {
        Self::handler(value)
    }

    /// Classify a value whose listener-ness is only known at runtime.
    ///
    /// Values that already are a `Listener`, a boxed [`EventListener`] or a
    /// boxed [`ListenerFn`] resolve to the matching variant. Anything else
    /// becomes [`Listener::Unsupported`]; no validation happens until dispatch.
    /// Unboxed listener types are not recognized here, use
    /// [`Listener::from_value`] for those.
    pub fn from_any<T: Any + Send + Sync>(value: T) -> Self {
        let value: Box<dyn Any> = Box::new(value);
        let value = match value.downcast::<Listener>() {
            Ok(listener) => return *listener,
            Err(other) => other,
        };
        let value = match value.downcast::<Box<dyn EventListener>>() {
            Ok(handler) => return Listener::Handler(*handler),
            Err(other) => other,
        };
        match value.downcast::<Box<ListenerFn>>() {
            Ok(func) => Listener::Function { label: type_name::<T>().to_string(), func: *func },
            Err(_) => Listener::Unsupported { type_name: type_name::<T>() },
        }
    }

    /// Name used in debug logging and error messages
    pub fn label(&self) -> &str {
        match self {
            Listener::Handler(handler) => handler.label(),
            Listener::Function { label, .. } => label.as_str(),
            Listener::Unsupported { type_name } => type_name,
        }
    }

    pub fn is_invocable(&self) -> bool {
        !matches!(self, Listener::Unsupported { .. })
    }

    /// Run the listener for `event`.
    ///
    /// Listener failures come back as [`EventSystemError::Listener`], which
    /// keeps the listener's own message.
    pub(crate) fn invoke(&self, data: Option<&EventPayload>, event: &str) -> Result<EventResult, EventSystemError> {
        let result = match self {
            Listener::Handler(handler) => handler.process(data, event),
            Listener::Function { func, .. } => func(data, event),
            Listener::Unsupported { type_name } => {
                return Err(EventSystemError::InvalidListener {
                    event_name: event.to_string(),
                    type_name: (*type_name).to_string(),
                });
            }
        };
        result.map_err(EventSystemError::Listener)
    }
}

/// One event name or a set of event names to register a listener under
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNames(Vec<String>);

impl EventNames {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for EventNames {
    fn from(name: &str) -> Self {
        EventNames(vec![name.to_string()])
    }
}

impl From<String> for EventNames {
    fn from(name: String) -> Self {
        EventNames(vec![name])
    }
}

impl From<&String> for EventNames {
    fn from(name: &String) -> Self {
        EventNames(vec![name.clone()])
    }
}

impl From<Vec<String>> for EventNames {
    fn from(names: Vec<String>) -> Self {
        EventNames(names)
    }
}

impl From<Vec<&str>> for EventNames {
    fn from(names: Vec<&str>) -> Self {
        EventNames(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EventNames {
    fn from(names: &[&str]) -> Self {
        EventNames(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for EventNames {
    fn from(names: [&str; N]) -> Self {
        EventNames(names.iter().map(|name| name.to_string()).collect())
    }
}
