//! Tests for #[derive(Action)] macro

use cadence_core::action::{Correlated, RequestId};
use cadence_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum TaskAction {
    #[command]
    CreateTask {
        request_id: RequestId,
        title: String,
    },

    #[command]
    ClearError,

    #[command]
    ToggleTask(i64),

    #[event]
    TaskCreated {
        request_id: RequestId,
        id: i64,
    },

    #[event]
    TaskCreationFailed {
        request_id: RequestId,
        message: String,
    },

    #[event]
    Reset,
}

#[test]
fn test_is_command() {
    let action = TaskAction::CreateTask {
        request_id: RequestId::new(),
        title: "Write report".to_string(),
    };
    assert!(action.is_command());
    assert!(!action.is_event());
    assert!(TaskAction::ToggleTask(3).is_command());
}

#[test]
fn test_is_event() {
    let action = TaskAction::TaskCreated {
        request_id: RequestId::new(),
        id: 7,
    };
    assert!(!action.is_command());
    assert!(action.is_event());
}

#[test]
fn test_event_type() {
    let action = TaskAction::TaskCreationFailed {
        request_id: RequestId::new(),
        message: "boom".to_string(),
    };
    assert_eq!(action.event_type(), "TaskCreationFailed.v1");
    assert_eq!(TaskAction::Reset.event_type(), "Reset.v1");
}

#[test]
fn test_command_event_type() {
    // Commands don't have event types
    assert_eq!(TaskAction::ClearError.event_type(), "unknown");
}

#[test]
fn test_request_id_is_read_from_named_field() {
    let id = RequestId::new();
    let command = TaskAction::CreateTask {
        request_id: id,
        title: "X".to_string(),
    };
    let result = TaskAction::TaskCreated { request_id: id, id: 7 };

    assert_eq!(command.request_id(), Some(id));
    assert!(result.answers(id));
    assert!(!result.answers(RequestId::new()));
}

#[test]
fn test_variants_without_request_id_report_none() {
    assert_eq!(TaskAction::ClearError.request_id(), None);
    assert_eq!(TaskAction::ToggleTask(1).request_id(), None);
    assert_eq!(TaskAction::Reset.request_id(), None);
}
