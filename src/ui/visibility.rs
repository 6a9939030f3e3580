/// Independent visibility flags for the auxiliary screens. No "current
/// screen" value is stored here; the router derives one from precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiVisibility {
    pub show_user_config: bool,
    pub show_agent_edit: bool,
    pub show_persona_creation: bool,
}

impl UiVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_show_user_config(&mut self, value: bool) {
        self.show_user_config = value;
    }

    pub fn set_show_agent_edit(&mut self, value: bool) {
        self.show_agent_edit = value;
    }

    pub fn set_show_persona_creation(&mut self, value: bool) {
        self.show_persona_creation = value;
    }

    pub fn toggle_user_config(&mut self) {
        self.show_user_config = !self.show_user_config;
    }

    pub fn toggle_agent_edit(&mut self) {
        self.show_agent_edit = !self.show_agent_edit;
    }

    pub fn any_overlay_open(&self) -> bool {
        self.show_user_config || self.show_agent_edit
    }

    /// Closes the topmost overlay and reports whether one was open. Edit
    /// draws above settings, so it closes first.
    pub fn close_top_overlay(&mut self) -> bool {
        if self.show_agent_edit {
            self.show_agent_edit = false;
            return true;
        }
        if self.show_user_config {
            self.show_user_config = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::UiVisibility;

    #[test]
    fn initial_state_has_all_flags_cleared() {
        let visibility = UiVisibility::new();
        assert!(!visibility.show_user_config);
        assert!(!visibility.show_agent_edit);
        assert!(!visibility.show_persona_creation);
        assert!(!visibility.any_overlay_open());
    }

    #[test]
    fn close_top_overlay_prefers_edit_then_settings() {
        let mut visibility = UiVisibility::new();
        visibility.set_show_user_config(true);
        visibility.set_show_agent_edit(true);

        assert!(visibility.close_top_overlay());
        assert!(visibility.show_user_config);
        assert!(!visibility.show_agent_edit);

        assert!(visibility.close_top_overlay());
        assert!(!visibility.any_overlay_open());
        assert!(!visibility.close_top_overlay());
    }
}
