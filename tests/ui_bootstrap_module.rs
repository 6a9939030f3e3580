use sidekick::agents::{AgentStore, DEFAULT_PRESET_ID};
use sidekick::ui::{
    apply_bootstrap, reconcile_default_agent, resolve_screen, BootstrapAction, Screen, StageView,
    UiVisibility,
};

#[test]
fn ui_bootstrap_module_reconciliation_matrix() {
    assert_eq!(
        reconcile_default_agent(false, false),
        Some(BootstrapAction::AssignDefaultAgent)
    );
    assert_eq!(reconcile_default_agent(false, true), None);
    assert_eq!(reconcile_default_agent(true, false), None);
    assert_eq!(reconcile_default_agent(true, true), None);
}

#[test]
fn ui_bootstrap_module_loading_stage_becomes_active_after_one_tick() {
    let mut store = AgentStore::from_presets();
    let visibility = UiVisibility::new();

    // First render pass observes the committed snapshot: no agent yet.
    let before = resolve_screen(&visibility, store.current().is_some());
    assert_eq!(
        before,
        Screen::MainShell {
            settings_overlay: false,
            edit_overlay: false,
            stage: StageView::Loading,
        }
    );

    // The deferred write runs between passes, so the next render is Active
    // with the default agent's identity.
    assert!(apply_bootstrap(&mut store, &visibility));
    let after = resolve_screen(&visibility, store.current().is_some());
    assert_eq!(
        after,
        Screen::MainShell {
            settings_overlay: false,
            edit_overlay: false,
            stage: StageView::Active,
        }
    );
    assert_eq!(
        store.current().map(|a| a.id.as_str()),
        Some(DEFAULT_PRESET_ID)
    );
}

#[test]
fn ui_bootstrap_module_no_write_while_persona_creation_is_active() {
    let mut store = AgentStore::from_presets();
    let mut visibility = UiVisibility::new();
    visibility.set_show_persona_creation(true);

    for _ in 0..3 {
        assert!(!apply_bootstrap(&mut store, &visibility));
    }
    assert!(store.current().is_none());

    // Clearing the flag triggers exactly one write on the next evaluation.
    visibility.set_show_persona_creation(false);
    assert!(apply_bootstrap(&mut store, &visibility));
    assert!(!apply_bootstrap(&mut store, &visibility));
}

#[test]
fn ui_bootstrap_module_rapid_toggling_applies_only_the_latest_decision() {
    let mut store = AgentStore::from_presets();
    let mut visibility = UiVisibility::new();

    // Toggle the flag several times between reconciliations; only the state
    // at evaluation time matters.
    visibility.set_show_persona_creation(true);
    visibility.set_show_persona_creation(false);
    visibility.set_show_persona_creation(true);
    assert!(!apply_bootstrap(&mut store, &visibility));

    visibility.set_show_persona_creation(false);
    assert!(apply_bootstrap(&mut store, &visibility));
    assert!(store.current().is_some());
}
