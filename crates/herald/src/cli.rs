use herald_core::event::{BoxError, EventListener, EventPayload, EventResult, ListenerResult, STOP_PROPAGATION};
use herald_core::event::dynamic::render_payload;
use herald_core::Service;
use serde_json::Value;

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints its arguments to standard output.
///
/// `print` prints and continues; `stop` prints and then asks the dynamic
/// phase to stop.
#[derive(Debug, Default)]
pub struct EchoService;

impl Service for EchoService {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, BoxError> {
        match method {
            "print" => {
                println!("{}", join_args(args));
                Ok(Value::Null)
            }
            "stop" => {
                println!("{}", join_args(args));
                Ok(Value::String(STOP_PROPAGATION.to_string()))
            }
            other => Err(format!("unknown method '{}'", other).into()),
        }
    }
}

/// Writes its arguments to the log at info level
#[derive(Debug, Default)]
pub struct LoggerService;

impl Service for LoggerService {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, BoxError> {
        match method {
            "log" => {
                log::info!("{}", join_args(args));
                Ok(Value::Null)
            }
            other => Err(format!("unknown method '{}'", other).into()),
        }
    }
}

/// Static listener the CLI registers on the dispatched event
#[derive(Debug, Default)]
pub struct DispatchLogListener;

impl EventListener for DispatchLogListener {
    fn process(&self, data: Option<&EventPayload>, event: &str) -> ListenerResult {
        log::info!("Event {} received with payload {}", event, render_payload(data));
        Ok(EventResult::Continue)
    }

    fn label(&self) -> &str {
        "cli.dispatch-log"
    }
}
