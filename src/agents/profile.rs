use crate::config::UserSettings;
use crate::shared::ids::AgentId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    #[default]
    Aoede,
    Charon,
    Fenrir,
    Kore,
    Puck,
}

pub const ALL_VOICES: [VoiceKind; 5] = [
    VoiceKind::Aoede,
    VoiceKind::Charon,
    VoiceKind::Fenrir,
    VoiceKind::Kore,
    VoiceKind::Puck,
];

impl VoiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aoede => "aoede",
            Self::Charon => "charon",
            Self::Fenrir => "fenrir",
            Self::Kore => "kore",
            Self::Puck => "puck",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "aoede" => Ok(Self::Aoede),
            "charon" => Ok(Self::Charon),
            "fenrir" => Ok(Self::Fenrir),
            "kore" => Ok(Self::Kore),
            "puck" => Ok(Self::Puck),
            _ => Err("voice must be one of: aoede, charon, fenrir, kore, puck".to_string()),
        }
    }

    pub fn next(self) -> Self {
        let position = ALL_VOICES
            .iter()
            .position(|voice| *voice == self)
            .unwrap_or(0);
        ALL_VOICES[(position + 1) % ALL_VOICES.len()]
    }
}

impl std::fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    pub personality: String,
    #[serde(default)]
    pub voice: VoiceKind,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

fn default_accent_color() -> String {
    "#5a9cf8".to_string()
}

impl AgentProfile {
    /// Renders the system instruction the live session is set up with. The
    /// user identity block is appended only when settings carry one.
    pub fn system_instruction(&self, user: &UserSettings) -> String {
        let mut instruction = format!(
            "You are {name}, a live voice-and-text companion. {personality}\n\
             Keep replies conversational and concise; you are speaking in real time.",
            name = self.name,
            personality = self.personality.trim(),
        );
        if !user.name.trim().is_empty() {
            instruction.push_str(&format!(
                "\nYou are talking to {}.",
                user.name.trim()
            ));
        }
        if !user.info.trim().is_empty() {
            instruction.push_str(&format!(
                "\nWhat you know about them: {}",
                user.info.trim()
            ));
        }
        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentProfile, VoiceKind, ALL_VOICES};
    use crate::config::UserSettings;
    use crate::shared::ids::AgentId;

    fn profile() -> AgentProfile {
        AgentProfile {
            id: AgentId::parse("nova").expect("id"),
            name: "Nova".to_string(),
            personality: "Curious and upbeat.".to_string(),
            voice: VoiceKind::Aoede,
            accent_color: "#5a9cf8".to_string(),
        }
    }

    #[test]
    fn voice_cycle_visits_every_option_and_wraps() {
        let mut voice = VoiceKind::Aoede;
        let mut seen = Vec::new();
        for _ in 0..ALL_VOICES.len() {
            seen.push(voice);
            voice = voice.next();
        }
        assert_eq!(seen, ALL_VOICES.to_vec());
        assert_eq!(voice, VoiceKind::Aoede);
    }

    #[test]
    fn voice_round_trips_through_snake_case_yaml() {
        let encoded = serde_yaml::to_string(&VoiceKind::Kore).expect("encode");
        assert!(encoded.contains("kore"));
        let decoded: VoiceKind = serde_yaml::from_str("fenrir").expect("decode");
        assert_eq!(decoded, VoiceKind::Fenrir);
        assert!(serde_yaml::from_str::<VoiceKind>("tenor").is_err());
    }

    #[test]
    fn system_instruction_includes_user_identity_only_when_present() {
        let anonymous = profile().system_instruction(&UserSettings::default());
        assert!(anonymous.contains("You are Nova"));
        assert!(!anonymous.contains("You are talking to"));

        let user = UserSettings {
            name: "Ana".to_string(),
            info: "learning Rust".to_string(),
        };
        let named = profile().system_instruction(&user);
        assert!(named.contains("You are talking to Ana."));
        assert!(named.contains("learning Rust"));
    }
}
