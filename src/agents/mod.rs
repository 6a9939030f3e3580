pub mod presets;
pub mod profile;
pub mod store;

pub use presets::{is_preset_id, preset_profiles, DEFAULT_PRESET_ID, PRESET_IDS};
pub use profile::{AgentProfile, VoiceKind, ALL_VOICES};
pub use store::{AgentStore, RosterError};
