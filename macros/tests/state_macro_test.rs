//! Tests for #[derive(State)] macro

use cadence_macros::State;

#[derive(State, Clone, Debug, Default)]
struct CatalogState {
    pub titles: Vec<String>,
    #[loading]
    pub pending: usize,
    #[last_error]
    pub error: Option<String>,
}

#[derive(State, Clone, Debug, Default)]
struct LoadingOnly {
    #[loading]
    in_flight: usize,
}

#[derive(State, Clone, Debug)]
struct PlainState {
    pub count: i32,
}

#[test]
fn test_loading_counter_brackets_requests() {
    let mut state = CatalogState::default();
    assert!(!state.is_loading());

    state.begin_request();
    state.begin_request();
    assert!(state.is_loading());

    state.finish_request();
    assert!(state.is_loading(), "one request still in flight");

    state.finish_request();
    assert!(!state.is_loading());
}

#[test]
fn test_finish_request_never_underflows() {
    let mut state = LoadingOnly::default();
    state.finish_request();
    assert_eq!(state.in_flight, 0);
    assert!(!state.is_loading());
}

#[test]
fn test_error_bookkeeping() {
    let mut state = CatalogState::default();
    assert_eq!(state.last_error(), None);

    state.record_error("Erro ao carregar músicas");
    assert_eq!(state.last_error(), Some("Erro ao carregar músicas"));

    state.clear_error();
    assert_eq!(state.last_error(), None);
    assert!(state.titles.is_empty());
}

#[test]
fn test_state_without_markers() {
    // No marked fields: the derive compiles and generates nothing
    let state = PlainState { count: 3 };
    assert_eq!(state.count, 3);
}
