use super::visibility::UiVisibility;

/// The main stage's two sub-states: a neutral loading indicator until an
/// agent is current, then the live conversation surface with its control
/// tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageView {
    Loading,
    Active,
}

/// Exactly one top-level screen per render. Overlays are carried as data on
/// the main shell rather than as screens of their own: they stack over the
/// stage but never replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PersonaCreation,
    MainShell {
        settings_overlay: bool,
        edit_overlay: bool,
        stage: StageView,
    },
}

impl Screen {
    pub fn shows_header(self) -> bool {
        matches!(self, Screen::MainShell { .. })
    }
}

/// The screen precedence rules, evaluated top to bottom, first match wins:
///
/// 1. persona creation is exclusive — header and overlays suppressed;
/// 2. otherwise the main shell renders, with the settings and edit overlays
///    mirroring their flags and the stage keyed on agent presence.
///
/// Pure function of the two stores; never mutates state.
pub fn resolve_screen(visibility: &UiVisibility, has_current_agent: bool) -> Screen {
    if visibility.show_persona_creation {
        return Screen::PersonaCreation;
    }
    Screen::MainShell {
        settings_overlay: visibility.show_user_config,
        edit_overlay: visibility.show_agent_edit,
        stage: if has_current_agent {
            StageView::Active
        } else {
            StageView::Loading
        },
    }
}
