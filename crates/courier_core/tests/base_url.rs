use std::sync::Once;

use courier_core::{
    resolve_base_url, update, AppState, Effect, Msg, DEFAULT_BACKEND_URL,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

#[test]
fn resolution_priority_is_override_then_stored_then_default() {
    init_logging();
    assert_eq!(
        resolve_base_url(Some("http://o"), Some("http://s"), DEFAULT_BACKEND_URL),
        "http://o"
    );
    assert_eq!(
        resolve_base_url(None, Some("http://s"), DEFAULT_BACKEND_URL),
        "http://s"
    );
    assert_eq!(
        resolve_base_url(None, None, DEFAULT_BACKEND_URL),
        DEFAULT_BACKEND_URL
    );
}

#[test]
fn resolved_value_is_seeded_without_persisting() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::BaseUrlResolved("http://localhost:8000".to_string()),
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().base_url, "http://localhost:8000");
}

#[test]
fn edited_value_is_persisted() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::BaseUrlEdited("http://localhost:9000/".to_string()),
    );

    // The raw edit is stored as typed; normalization happens per request.
    assert_eq!(
        effects,
        vec![Effect::PersistBaseUrl {
            value: "http://localhost:9000/".to_string(),
        }]
    );
    assert_eq!(state.view().base_url, "http://localhost:9000/");
}

#[test]
fn requests_use_the_normalized_base() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::BaseUrlEdited("http://localhost:9000/".to_string()),
    );

    let (_state, effects) = update(state, Msg::HealthRequested);
    match &effects[0] {
        Effect::SendRequest { base_url, .. } => {
            assert_eq!(base_url, "http://localhost:9000");
        }
        other => panic!("unexpected effect {other:?}"),
    }
}
