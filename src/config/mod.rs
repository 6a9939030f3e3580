pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use error::ConfigError;
pub use load::load_global_settings;
pub use paths::{
    default_agents_path, default_global_config_path, default_state_root,
    GLOBAL_AGENTS_FILE_NAME, GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR,
};
pub use save::save_settings;
pub use settings::{
    SessionSettings, Settings, UserSettings, DEFAULT_LIVE_ENDPOINT, DEFAULT_LIVE_MODEL,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn settings_defaults_apply_for_absent_blocks() {
        let settings: Settings = serde_yaml::from_str("user:\n  name: Ana\n").expect("parse");
        assert_eq!(settings.user.name, "Ana");
        assert_eq!(settings.session.endpoint, DEFAULT_LIVE_ENDPOINT);
        assert_eq!(settings.session.model, DEFAULT_LIVE_MODEL);
        assert_eq!(settings.session.reconnect_backoff_ms, 1000);
        settings.validate().expect("defaults validate");
    }

    #[test]
    fn settings_validation_rejects_non_websocket_endpoint() {
        let settings: Settings = serde_yaml::from_str(
            r#"
session:
  endpoint: https://example.invalid/live
"#,
        )
        .expect("parse");
        let err = settings.validate().expect_err("validation should fail");
        match err {
            ConfigError::Settings(message) => {
                assert!(message.contains("ws:// or wss://"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn settings_validation_rejects_zero_backoff() {
        let settings: Settings = serde_yaml::from_str(
            r#"
session:
  reconnect_backoff_ms: 0
"#,
        )
        .expect("parse");
        let err = settings.validate().expect_err("validation should fail");
        match err {
            ConfigError::Settings(message) => {
                assert!(message.contains("reconnect_backoff_ms"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn default_global_config_path_targets_home_sidekick_config_yaml() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", temp.path());

        let path = default_global_config_path().expect("resolve global config path");
        assert_eq!(path, temp.path().join(".sidekick/config.yaml"));

        if let Some(value) = old_home {
            std::env::set_var("HOME", value);
        } else {
            std::env::remove_var("HOME");
        }
    }

    #[test]
    fn load_global_settings_falls_back_to_defaults_when_file_missing() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", temp.path());

        let settings = load_global_settings().expect("load defaults");
        assert_eq!(settings.session.endpoint, DEFAULT_LIVE_ENDPOINT);
        assert!(settings.user.name.is_empty());

        if let Some(value) = old_home {
            std::env::set_var("HOME", value);
        } else {
            std::env::remove_var("HOME");
        }
    }

    #[test]
    fn save_settings_round_trips_through_yaml() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let temp = tempdir().expect("temp dir");
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", temp.path());

        let mut settings = Settings::default();
        settings.user.name = "Ana".to_string();
        settings.user.info = "prefers short answers".to_string();
        let path = save_settings(&settings).expect("save settings");
        assert!(path.exists());

        let loaded = load_global_settings().expect("load settings");
        assert_eq!(loaded.user.name, "Ana");
        assert_eq!(loaded.user.info, "prefers short answers");

        if let Some(value) = old_home {
            std::env::set_var("HOME", value);
        } else {
            std::env::remove_var("HOME");
        }
    }
}
