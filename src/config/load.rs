use super::{default_global_config_path, ConfigError, Settings};

/// Loads `~/.sidekick/config.yaml`, falling back to defaults on first run
/// when the file does not exist yet.
pub fn load_global_settings() -> Result<Settings, ConfigError> {
    let path = default_global_config_path()?;
    if !path.exists() {
        let settings = Settings::default();
        settings.validate()?;
        return Ok(settings);
    }
    let settings = Settings::from_path(&path)?;
    settings.validate()?;
    Ok(settings)
}
