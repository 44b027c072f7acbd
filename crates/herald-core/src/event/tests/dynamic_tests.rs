use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tempfile::tempdir;

use crate::event::dynamic::{DynamicListenerLoader, DynamicOperation, STOP_PROPAGATION, render_payload};
use crate::event::error::EventSystemError;
use crate::event::{BoxError, EventResult};
use crate::kernel::component::{Service, ServiceContainer};

/// Records every call; `stop` answers with the stop sentinel, `fail` errors
#[derive(Default)]
struct RecordingService {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingService {
    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Service for RecordingService {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, BoxError> {
        self.calls.lock().unwrap().push((method.to_string(), args.to_vec()));
        match method {
            "stop" => Ok(json!(STOP_PROPAGATION)),
            "fail" => Err("recorder unavailable".into()),
            _ => Ok(Value::Null),
        }
    }
}

fn loader(root: &Path) -> (DynamicListenerLoader, Arc<RecordingService>) {
    let service = Arc::new(RecordingService::default());
    let container = ServiceContainer::new(root).with_service("recorder", service.clone());
    (DynamicListenerLoader::new(root, Arc::new(container)), service)
}

fn write_definition(root: &Path, event: &str, file: &str, content: &str) {
    let dir = root.join(event);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

#[test]
fn test_missing_directory_is_noop() {
    let temp_dir = tempdir().unwrap();
    let (loader, service) = loader(temp_dir.path());

    let result = loader.dispatch("nothing.here", Some(&json!(1))).unwrap();

    assert_eq!(result, EventResult::Continue);
    assert!(service.calls().is_empty());
}

#[test]
fn test_placeholders_are_substituted() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "user.login", "01-audit.yaml", r#"
- service: recorder
  method: record
  args: ["hello {event}", "{data}", "{dynamic_path}", "user={data}", 5, {nested: "{event}"}]
"#);
    let (loader, service) = loader(root);

    let payload = json!({"user": "ana"});
    let result = loader.dispatch("user.login", Some(&payload)).unwrap();
    assert_eq!(result, EventResult::Continue);

    let path = root.join("user.login").join("01-audit.yaml");
    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "record");
    assert_eq!(
        calls[0].1,
        vec![
            json!("hello user.login"),
            payload.clone(),
            json!(path.display().to_string()),
            json!("user={\"user\":\"ana\"}"),
            json!(5),
            json!({"nested": "user.login"}),
        ]
    );
}

#[test]
fn test_substituted_text_is_not_expanded_again() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "{dynamic_path}", "01.json", r#"[{
        "service": "recorder",
        "method": "record",
        "args": ["{event}", "at {event} with {data}", "{unknown} {event"]
    }]"#);
    let (loader, service) = loader(root);

    loader.dispatch("{dynamic_path}", Some(&json!("{event}"))).unwrap();

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].1,
        vec![
            json!("{dynamic_path}"),
            json!("at {dynamic_path} with {event}"),
            json!("{unknown} {event"),
        ]
    );
}

#[test]
fn test_files_run_in_path_order_across_formats() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "app.start", "20-second.json", r#"[{"service": "recorder", "method": "second"}]"#);
    write_definition(root, "app.start", "10-first.yaml", "- service: recorder\n  method: first\n");
    write_definition(root, "app.start", "30-third.toml", "[[operations]]\nservice = \"recorder\"\nmethod = \"third\"\nargs = [\"{event}\"]\n");
    write_definition(root, "app.start", "notes.txt", "ignored");
    let (loader, service) = loader(root);

    loader.dispatch("app.start", None).unwrap();

    let methods: Vec<String> = service.calls().into_iter().map(|(method, _)| method).collect();
    assert_eq!(methods, vec!["first", "second", "third"]);
    assert_eq!(service.calls()[2].1, vec![json!("app.start")]);
}

#[test]
fn test_stop_sentinel_ends_dynamic_phase() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "order.placed", "10-a.yaml", r#"
- service: recorder
  method: before
- service: recorder
  method: stop
- service: recorder
  method: same_file_after
"#);
    write_definition(root, "order.placed", "20-b.yaml", "- service: recorder\n  method: next_file\n");
    let (loader, service) = loader(root);

    let result = loader.dispatch("order.placed", None).unwrap();

    assert_eq!(result, EventResult::Stop);
    let methods: Vec<String> = service.calls().into_iter().map(|(method, _)| method).collect();
    assert_eq!(methods, vec!["before", "stop"]);
}

#[test]
fn test_unknown_service_fails() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "e", "01.yaml", "- service: mailer\n  method: send\n");
    let (loader, _service) = loader(root);

    let err = loader.dispatch("e", None).expect_err("unknown service should fail");
    assert!(matches!(err, EventSystemError::ServiceNotFound { ref service } if service == "mailer"));
}

#[test]
fn test_service_failure_is_reported() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "e", "01.yaml", "- service: recorder\n  method: fail\n");
    let (loader, _service) = loader(root);

    let err = loader.dispatch("e", None).expect_err("failing service should fail");
    assert_eq!(err.to_string(), "Call to 'recorder::fail' failed: recorder unavailable");
}

#[test]
fn test_invalid_definition_file() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "e", "01.yaml", "service: [unterminated\n");
    let (loader, service) = loader(root);

    let err = loader.dispatch("e", None).expect_err("invalid yaml should fail");
    assert!(matches!(err, EventSystemError::DynamicDefinition { .. }));
    assert!(service.calls().is_empty());
}

#[test]
fn test_event_names_cannot_escape_root() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("events");
    fs::create_dir_all(&root).unwrap();
    write_definition(temp_dir.path(), "outside", "01.yaml", "- service: recorder\n  method: escaped\n");
    let (loader, service) = loader(&root);

    assert_eq!(loader.event_dir("../outside"), None);
    assert_eq!(loader.event_dir("a/b"), None);
    assert_eq!(loader.event_dir(".."), None);
    assert_eq!(loader.event_dir("user.login"), Some(root.join("user.login")));

    assert_eq!(loader.dispatch("../outside", None).unwrap(), EventResult::Continue);
    assert!(service.calls().is_empty());
}

#[test]
fn test_load_definitions_and_events() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_definition(root, "b.event", "01.json", r#"{"operations": [{"service": "recorder", "method": "m", "args": [1]}]}"#);
    write_definition(root, "a.event", "01.yaml", "[]");
    let (loader, _service) = loader(root);

    let operations = DynamicListenerLoader::load_definitions(&root.join("b.event").join("01.json")).unwrap();
    assert_eq!(
        operations,
        vec![DynamicOperation { service: "recorder".to_string(), method: "m".to_string(), args: vec![json!(1)] }]
    );
    assert_eq!(loader.events().unwrap(), vec!["a.event".to_string(), "b.event".to_string()]);
}

#[test]
fn test_render_payload() {
    assert_eq!(render_payload(None), Value::Null);
    assert_eq!(render_payload(Some(&json!([1, 2]))), json!([1, 2]));
    assert_eq!(render_payload(Some(&String::from("text"))), json!("text"));
    assert_eq!(render_payload(Some(&"static")), json!("static"));
    assert_eq!(render_payload(Some(&true)), json!(true));
    assert_eq!(render_payload(Some(&-3i64)), json!(-3));
    assert_eq!(render_payload(Some(&1.5f64)), json!(1.5));

    struct Opaque;
    assert_eq!(render_payload(Some(&Opaque)), Value::Null);
}
