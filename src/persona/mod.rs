pub mod navigation;
pub mod screens;
pub mod state;

pub use navigation::{
    parse_scripted_persona_keys, persona_action_from_key, persona_transition, PersonaAction,
    PersonaNavEffect, PersonaNavError, PersonaScreen, PersonaTransition, WizardNavState,
    ALL_PERSONA_SCREENS,
};
pub use screens::{project_wizard_view_model, WizardFieldRow, WizardViewModel};
pub use state::{
    unique_agent_id, validate_persona_name, validate_persona_personality, PersonaDraft,
    PERSONA_NAME_MAX_CHARS, PERSONA_PERSONALITY_MAX_CHARS,
};
