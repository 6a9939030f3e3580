use super::profile::{AgentProfile, VoiceKind};
use crate::shared::ids::AgentId;

pub const DEFAULT_PRESET_ID: &str = "nova";

pub const PRESET_IDS: [&str; 3] = ["nova", "atlas", "juniper"];

/// Built-in personas. These are re-seeded into the roster on every load, so
/// `default_agent()` always has something to return.
pub fn preset_profiles() -> Vec<AgentProfile> {
    vec![
        preset(
            "nova",
            "Nova",
            "Warm, curious and quick to make connections between ideas. \
             Asks short follow-up questions and celebrates small wins.",
            VoiceKind::Aoede,
            "#5a9cf8",
        ),
        preset(
            "atlas",
            "Atlas",
            "Calm and methodical. Prefers structured answers, summarizes \
             decisions back before moving on, never rushes.",
            VoiceKind::Charon,
            "#e0a43b",
        ),
        preset(
            "juniper",
            "Juniper",
            "Playful storyteller with a dry sense of humor. Uses vivid \
             imagery and keeps the mood light without losing the thread.",
            VoiceKind::Kore,
            "#64c28e",
        ),
    ]
}

fn preset(
    id: &str,
    name: &str,
    personality: &str,
    voice: VoiceKind,
    accent_color: &str,
) -> AgentProfile {
    let id = match AgentId::parse(id) {
        Ok(value) => value,
        Err(_) => unreachable!("preset ids are valid identifiers"),
    };
    AgentProfile {
        id,
        name: name.to_string(),
        personality: personality.to_string(),
        voice,
        accent_color: accent_color.to_string(),
    }
}

pub fn is_preset_id(id: &str) -> bool {
    PRESET_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::{is_preset_id, preset_profiles, DEFAULT_PRESET_ID, PRESET_IDS};

    #[test]
    fn presets_match_the_declared_id_list_and_default() {
        let profiles = preset_profiles();
        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, PRESET_IDS.to_vec());
        assert_eq!(ids[0], DEFAULT_PRESET_ID);
    }

    #[test]
    fn preset_membership_checks_by_id() {
        assert!(is_preset_id("nova"));
        assert!(is_preset_id("juniper"));
        assert!(!is_preset_id("custom-agent"));
    }
}
