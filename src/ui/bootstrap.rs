use super::visibility::UiVisibility;
use crate::agents::AgentStore;

/// Deferred write requested by the reconciliation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapAction {
    AssignDefaultAgent,
}

/// The default-agent rule as a pure function of the committed
/// `(current agent, persona-creation flag)` pair: assign a default exactly
/// when no agent is current and the user is not mid-way through creating a
/// persona. Re-running with an agent present yields nothing, so repeated
/// reconciliation is idempotent.
pub fn reconcile_default_agent(
    has_current_agent: bool,
    persona_creation_active: bool,
) -> Option<BootstrapAction> {
    if !has_current_agent && !persona_creation_active {
        return Some(BootstrapAction::AssignDefaultAgent);
    }
    None
}

/// Applies the reconciliation outcome to the store. Called after every state
/// transition, never during a draw, so the write is observed by the next
/// render pass. Returns whether a write occurred.
pub fn apply_bootstrap(store: &mut AgentStore, visibility: &UiVisibility) -> bool {
    match reconcile_default_agent(
        store.current().is_some(),
        visibility.show_persona_creation,
    ) {
        Some(BootstrapAction::AssignDefaultAgent) => {
            let id = store.default_agent().id.clone();
            store.set_current(&id)
        }
        None => false,
    }
}
