use crate::agents::{AgentProfile, VoiceKind};
use crate::shared::ids::{slugify_identifier, AgentId};

pub const PERSONA_NAME_MAX_CHARS: usize = 48;
pub const PERSONA_PERSONALITY_MAX_CHARS: usize = 400;

const NEW_PERSONA_ACCENT_COLOR: &str = "#b58ae6";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaDraft {
    pub name: String,
    pub personality: String,
    pub voice: VoiceKind,
}

pub fn validate_persona_name(raw: &str) -> Result<(), String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("persona name must be non-empty".to_string());
    }
    if trimmed.chars().count() > PERSONA_NAME_MAX_CHARS {
        return Err(format!(
            "persona name must be at most {PERSONA_NAME_MAX_CHARS} characters"
        ));
    }
    if slugify_identifier(trimmed).is_empty() {
        return Err("persona name must contain at least one letter or digit".to_string());
    }
    Ok(())
}

pub fn validate_persona_personality(raw: &str) -> Result<(), String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("personality must be non-empty".to_string());
    }
    if trimmed.chars().count() > PERSONA_PERSONALITY_MAX_CHARS {
        return Err(format!(
            "personality must be at most {PERSONA_PERSONALITY_MAX_CHARS} characters"
        ));
    }
    Ok(())
}

impl PersonaDraft {
    pub fn validate(&self) -> Result<(), String> {
        validate_persona_name(&self.name)?;
        validate_persona_personality(&self.personality)
    }

    /// Builds the roster entry for a valid draft. The id is derived from the
    /// name and made unique against the existing roster.
    pub fn into_profile(self, existing: &[AgentProfile]) -> Result<AgentProfile, String> {
        self.validate()?;
        let base = slugify_identifier(&self.name);
        let id = AgentId::parse(&unique_agent_id(existing, &base))?;
        Ok(AgentProfile {
            id,
            name: self.name.trim().to_string(),
            personality: self.personality.trim().to_string(),
            voice: self.voice,
            accent_color: NEW_PERSONA_ACCENT_COLOR.to_string(),
        })
    }
}

pub fn unique_agent_id(existing: &[AgentProfile], base: &str) -> String {
    if !existing.iter().any(|agent| agent.id.as_str() == base) {
        return base.to_string();
    }
    let mut idx = 2usize;
    loop {
        let candidate = format!("{base}-{idx}");
        if !existing.iter().any(|agent| agent.id.as_str() == candidate) {
            return candidate;
        }
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        unique_agent_id, validate_persona_name, PersonaDraft, PERSONA_NAME_MAX_CHARS,
    };
    use crate::agents::{preset_profiles, VoiceKind};

    #[test]
    fn name_validation_rejects_blank_and_over_length_values() {
        assert!(validate_persona_name("Sage").is_ok());
        assert!(validate_persona_name("   ").is_err());
        assert!(validate_persona_name("!!!").is_err());
        let long = "x".repeat(PERSONA_NAME_MAX_CHARS + 1);
        assert!(validate_persona_name(&long).is_err());
    }

    #[test]
    fn draft_commit_builds_a_profile_with_a_unique_slug_id() {
        let existing = preset_profiles();
        let draft = PersonaDraft {
            name: "Nova".to_string(),
            personality: "Pensive and patient.".to_string(),
            voice: VoiceKind::Puck,
        };
        let profile = draft.into_profile(&existing).expect("commit draft");
        assert_eq!(profile.id.as_str(), "nova-2");
        assert_eq!(profile.voice, VoiceKind::Puck);
    }

    #[test]
    fn draft_commit_rejects_invalid_drafts() {
        let existing = preset_profiles();
        let draft = PersonaDraft {
            name: "Sage".to_string(),
            personality: "  ".to_string(),
            voice: VoiceKind::Aoede,
        };
        assert!(draft.into_profile(&existing).is_err());
    }

    #[test]
    fn unique_agent_id_appends_numeric_suffix_when_needed() {
        let existing = preset_profiles();
        assert_eq!(unique_agent_id(&existing, "fresh"), "fresh");
        assert_eq!(unique_agent_id(&existing, "nova"), "nova-2");
    }
}
