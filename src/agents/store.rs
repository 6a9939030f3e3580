use super::presets::{is_preset_id, preset_profiles};
use super::profile::AgentProfile;
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::ids::AgentId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in roster {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to encode roster {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write roster {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("roster has no agents after preset seeding")]
    NoPresets,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RosterFile {
    #[serde(default)]
    agents: Vec<AgentProfile>,
    #[serde(default)]
    current: Option<AgentId>,
}

/// Source of truth for "is there an agent selected". Owns the persisted
/// roster (presets plus user-created personas) and the current reference.
#[derive(Debug, Clone)]
pub struct AgentStore {
    agents: Vec<AgentProfile>,
    current: Option<AgentId>,
}

impl AgentStore {
    pub fn from_presets() -> Self {
        Self {
            agents: preset_profiles(),
            current: None,
        }
    }

    /// Loads the roster, re-seeding any preset that was removed from the
    /// file. A missing file is a first run, not an error.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        if !path.exists() {
            return Ok(Self::from_presets());
        }
        let raw = fs::read_to_string(path).map_err(|source| RosterError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: RosterFile = serde_yaml::from_str(&raw).map_err(|source| RosterError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let mut agents = preset_profiles();
        for stored in file.agents {
            if let Some(existing) = agents.iter_mut().find(|agent| agent.id == stored.id) {
                *existing = stored;
            } else {
                agents.push(stored);
            }
        }
        if agents.is_empty() {
            return Err(RosterError::NoPresets);
        }

        let current = file
            .current
            .filter(|id| agents.iter().any(|agent| &agent.id == id));
        Ok(Self { agents, current })
    }

    pub fn save(&self, path: &Path) -> Result<(), RosterError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RosterError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let file = RosterFile {
            agents: self.agents.clone(),
            current: self.current.clone(),
        };
        let body = serde_yaml::to_string(&file).map_err(|source| RosterError::Encode {
            path: path.display().to_string(),
            source,
        })?;
        atomic_write_file(path, body.as_bytes()).map_err(|source| RosterError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn current(&self) -> Option<&AgentProfile> {
        let id = self.current.as_ref()?;
        self.agents.iter().find(|agent| &agent.id == id)
    }

    pub fn current_id(&self) -> Option<&AgentId> {
        self.current.as_ref()
    }

    /// Returns false when the id is not in the roster; the current reference
    /// is left untouched in that case.
    pub fn set_current(&mut self, id: &AgentId) -> bool {
        if self.agents.iter().any(|agent| &agent.id == id) {
            self.current = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Total and synchronous: roster constructors seed presets, so there is
    /// always a first agent to fall back to.
    pub fn default_agent(&self) -> &AgentProfile {
        match self.agents.first() {
            Some(agent) => agent,
            None => unreachable!("roster constructors guarantee at least one preset"),
        }
    }

    /// Inserts a new profile or replaces the one with the same id.
    pub fn upsert(&mut self, profile: AgentProfile) {
        if let Some(existing) = self.agents.iter_mut().find(|agent| agent.id == profile.id) {
            *existing = profile;
        } else {
            self.agents.push(profile);
        }
    }

    /// Replaces the current agent's profile in place. No-op when nothing is
    /// current.
    pub fn update_current(&mut self, profile: AgentProfile) -> bool {
        let Some(current_id) = self.current.clone() else {
            return false;
        };
        if profile.id != current_id {
            return false;
        }
        self.upsert(profile);
        true
    }

    pub fn is_preset(&self, id: &AgentId) -> bool {
        is_preset_id(id.as_str())
    }
}
