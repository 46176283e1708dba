//! End-to-end adapter behaviour against stub hosts

mod common;

use std::rc::Rc;

use common::{adapter_on_window, capture_logs};
use elohim_scorm::host::mock::{MockContext, MockOp, MockRuntime};
use elohim_scorm::{AdapterConfig, ContextRef, ScormAdapter, ScormError, ScormValue, ScormVersion};

#[test]
fn test_version_inferred_from_2004_host() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm2004));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm2004, AdapterConfig::default());

    assert_eq!(scorm.version(), None);
    assert!(scorm.initialize());
    assert_eq!(scorm.version(), Some(ScormVersion::Scorm2004));
    assert!(scorm.is_connected());
    assert!(scorm.is_available());

    runtime.clear_calls();
    assert!(scorm.set_status("completed"));
    assert_eq!(scorm.get_status(), ScormValue::from("completed"));
    assert_eq!(
        runtime.calls()[0],
        "SetValue(cmi.completion_status, completed)".to_string()
    );
}

#[test]
fn test_1_2_completion_repair_on_initialize() {
    let runtime = Rc::new(
        MockRuntime::new(ScormVersion::Scorm12).with_value("cmi.core.lesson_status", "not attempted"),
    );
    let config = AdapterConfig::default().with_version(ScormVersion::Scorm12);
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm12, config);

    assert!(scorm.initialize());

    assert_eq!(runtime.value("cmi.core.lesson_status").as_deref(), Some("incomplete"));
    let calls = runtime.calls();
    let set = calls
        .iter()
        .position(|c| c == "LMSSetValue(cmi.core.lesson_status, incomplete)")
        .expect("status repaired");
    let commit = calls.iter().position(|c| c == "LMSCommit").expect("committed");
    assert!(set < commit);
    assert_eq!(
        scorm.cached_status().completion_status.as_deref(),
        Some("incomplete")
    );
}

#[test]
fn test_unknown_status_is_repaired_too() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm2004).with_value("cmi.completion_status", "unknown"));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm2004, AdapterConfig::default());

    assert!(scorm.initialize());
    assert_eq!(runtime.value("cmi.completion_status").as_deref(), Some("incomplete"));
    assert!(runtime.was_called("Commit"));
}

#[test]
fn test_2004_terminate_writes_logout_when_completed() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm2004));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm2004, AdapterConfig::default());

    assert!(scorm.initialize());
    assert!(scorm.set_status("completed"));
    runtime.clear_calls();
    assert!(scorm.terminate());

    let calls = runtime.calls();
    let exit = calls
        .iter()
        .position(|c| c == "SetValue(cmi.exit, logout)")
        .expect("exit written");
    let finish = calls.iter().position(|c| c == "Terminate").expect("terminated");
    assert!(exit < finish);
    assert!(!scorm.is_connected());
}

#[test]
fn test_initialize_false_positive_is_failure() {
    let runtime = Rc::new(
        MockRuntime::new(ScormVersion::Scorm2004).acknowledging_with_error(MockOp::Initialize, 101),
    );
    let mut scorm = adapter_on_window(runtime, ScormVersion::Scorm2004, AdapterConfig::default());

    let (ok, logs) = capture_logs(|| scorm.initialize());
    assert!(!ok);
    assert!(!scorm.is_connected());
    assert!(logs.contains("SCORM.connection.initialize failed"));
    assert!(logs.contains("101"));
    assert!(logs.contains("General Exception"));

    match scorm.connection().try_initialize() {
        Err(ScormError::HostRejection { code, info, .. }) => {
            assert_eq!(code, 101);
            assert_eq!(info, "General Exception");
        }
        other => panic!("expected host rejection, got {:?}", other),
    }
}

#[test]
fn test_1_2_terminate_stops_at_failed_commit() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm12).failing(MockOp::Commit, 391));
    let config = AdapterConfig::default()
        .with_completion_status_handling(false)
        .with_exit_mode_handling(false);
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm12, config);
    assert!(scorm.initialize());

    match scorm.connection().try_terminate() {
        Err(ScormError::HostRejection { code, .. }) => assert_eq!(code, 391),
        other => panic!("expected host rejection, got {:?}", other),
    }
    assert!(runtime.was_called("LMSCommit"));
    assert!(!runtime.was_called("LMSFinish"));
    assert!(scorm.is_connected());

    let (ok, logs) = capture_logs(|| scorm.terminate());
    assert!(!ok);
    assert!(logs.contains("SCORM.connection.terminate failed"));
    assert!(logs.contains("391"));
    assert!(!runtime.was_called("LMSFinish"));
    assert!(scorm.is_connected());
}

#[test]
fn test_terminate_while_inactive_touches_nothing() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm12));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm12, AdapterConfig::default());

    assert!(!scorm.terminate());
    assert_eq!(runtime.call_count(), 0);
}

#[test]
fn test_initialize_twice_touches_nothing_the_second_time() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm12));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm12, AdapterConfig::default());

    assert!(scorm.initialize());
    runtime.clear_calls();
    let (ok, logs) = capture_logs(|| scorm.initialize());
    assert!(!ok);
    assert!(logs.contains("already active"));
    assert_eq!(runtime.call_count(), 0);
    assert!(scorm.is_connected());
}

#[test]
fn test_data_operations_gated_while_inactive() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm2004));
    let config = AdapterConfig::default().with_version(ScormVersion::Scorm2004);
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm2004, config);

    assert_eq!(scorm.get_value("cmi.location"), ScormValue::from("null"));
    assert!(!scorm.set_value("cmi.location", "page-2"));
    assert!(!scorm.save());
    assert_eq!(scorm.get_status(), ScormValue::from("null"));
    assert!(!scorm.set_status("completed"));
    assert_eq!(runtime.call_count(), 0);
}

#[test]
fn test_round_trip_coercion() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm2004));
    let mut scorm = adapter_on_window(runtime, ScormVersion::Scorm2004, AdapterConfig::default());
    assert!(scorm.initialize());

    assert!(scorm.set_value("cmi.score.raw", "85"));
    assert_eq!(scorm.get_value("cmi.score.raw"), ScormValue::Number(85.0));

    assert!(scorm.set_value("cmi.suspend_data", true));
    assert_eq!(scorm.get_value("cmi.suspend_data"), ScormValue::Bool(true));

    assert!(scorm.set_value("cmi.score.scaled", 0.25));
    assert_eq!(scorm.get_value("cmi.score.scaled"), ScormValue::Number(0.25));

    assert!(scorm.set_value("cmi.location", "chapter-3"));
    assert_eq!(scorm.get_value("cmi.location"), ScormValue::from("chapter-3"));
}

#[test]
fn test_diagnostics_are_idempotent() {
    let runtime = Rc::new(
        MockRuntime::new(ScormVersion::Scorm12)
            .failing(MockOp::SetValue, 405)
            .with_error_text(405, "Incorrect Data Type")
            .with_diagnostic(405, "cmi.core.score.raw expects a decimal"),
    );
    let mut scorm = adapter_on_window(runtime, ScormVersion::Scorm12, AdapterConfig::default());
    assert!(scorm.initialize());
    assert!(!scorm.set_value("cmi.core.score.raw", "abc"));

    let code = scorm.last_error_code();
    assert_eq!(code, 405);
    assert_eq!(scorm.last_error_code(), code);
    assert_eq!(scorm.error_text(code), "Incorrect Data Type");
    assert_eq!(scorm.error_text(code), scorm.error_text(code));
    assert_eq!(scorm.diagnostic_text(code), "cmi.core.score.raw expects a decimal");
    assert_eq!(scorm.diagnostic_text(code), scorm.diagnostic_text(code));
}

#[test]
fn test_diagnostics_without_host() {
    let window: ContextRef = Rc::new(MockContext::new("window"));
    let mut scorm = ScormAdapter::new(window, AdapterConfig::default());

    assert_eq!(scorm.last_error_code(), 0);
    assert_eq!(scorm.error_text(101), "");
    assert_eq!(scorm.diagnostic_text(101), "");
    assert!(!scorm.is_available());
}

#[test]
fn test_status_without_resolved_version() {
    let window: ContextRef = Rc::new(MockContext::new("window"));
    let mut scorm = ScormAdapter::new(window, AdapterConfig::default());

    let (value, logs) = capture_logs(|| scorm.get_status());
    assert_eq!(value, ScormValue::Bool(false));
    assert!(logs.contains("No valid SCORM version"));
    assert_eq!(scorm.handle_status("toggle", None), ScormValue::Bool(false));
}

#[test]
fn test_full_session_1_2() {
    let runtime = Rc::new(MockRuntime::new(ScormVersion::Scorm12));
    let mut scorm = adapter_on_window(runtime.clone(), ScormVersion::Scorm12, AdapterConfig::default());

    assert!(scorm.initialize());
    assert!(scorm.set_value("cmi.core.score.raw", 72));
    assert!(scorm.set_status("passed"));
    assert!(scorm.save());
    assert!(scorm.terminate());

    assert_eq!(runtime.value("cmi.core.exit").as_deref(), Some("logout"));
    assert_eq!(runtime.value("cmi.core.score.raw").as_deref(), Some("72"));
    assert!(runtime.was_called("LMSFinish"));
    assert!(!scorm.is_connected());
}

#[test]
fn test_report_error_goes_to_log() {
    let window: ContextRef = Rc::new(MockContext::new("window"));
    let scorm = ScormAdapter::new(window, AdapterConfig::default());

    let (_, logs) = capture_logs(|| scorm.report_error("quiz.submit", "no answers selected"));
    assert!(logs.contains("quiz.submit failed: no answers selected"));
}
