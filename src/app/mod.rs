pub mod cli;

use crate::agents::AgentStore;
use crate::config::{
    default_agents_path, default_global_config_path, default_state_root, load_global_settings,
    ConfigError, Settings,
};
use crate::credential::{render_fatal_notice, ApiCredential, PRIMARY_API_KEY_VAR};
use crate::shared::logging::append_session_log_line;
use crate::ui::{run_companion_tui, CompanionPaths};
use cli::{help_text, parse_cli_verb, CliVerb};
use std::fs;
use std::time::Duration;

const MODELS_PROBE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return cmd_companion();
    }
    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Companion => cmd_companion(),
        CliVerb::Agents => cmd_agents(),
        CliVerb::Doctor => cmd_doctor(),
        CliVerb::Version => Ok(format!("sidekick {}", env!("CARGO_PKG_VERSION"))),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}

pub(crate) fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

fn ensure_state_root() -> Result<CompanionPaths, String> {
    let state_root = default_state_root().map_err(map_config_err)?;
    fs::create_dir_all(&state_root)
        .map_err(|e| format!("failed to create {}: {e}", state_root.display()))?;
    let agents_path = default_agents_path().map_err(map_config_err)?;
    Ok(CompanionPaths {
        state_root,
        agents_path,
    })
}

fn load_settings_with_overrides() -> Result<Settings, String> {
    let mut settings = load_global_settings().map_err(map_config_err)?;
    if let Ok(endpoint) = std::env::var("SIDEKICK_LIVE_ENDPOINT") {
        if !endpoint.trim().is_empty() {
            settings.session.endpoint = endpoint.trim().to_string();
            settings.validate().map_err(map_config_err)?;
        }
    }
    Ok(settings)
}

/// The companion command. The credential gate runs first, before any
/// terminal-mode setup, and a failure prints the full-screen notice and stops
/// the launch.
fn cmd_companion() -> Result<String, String> {
    let credential = match ApiCredential::from_env() {
        Ok(credential) => credential,
        Err(err) => return Err(render_fatal_notice(&err)),
    };
    let paths = ensure_state_root()?;
    let settings = load_settings_with_overrides()?;
    let agents = AgentStore::load(&paths.agents_path).map_err(|e| e.to_string())?;
    let _ = append_session_log_line(&paths.state_root, "companion session started");
    let state_root = paths.state_root.clone();
    run_companion_tui(&credential, settings, agents, paths)?;
    let _ = append_session_log_line(&state_root, "companion session ended");
    Ok("companion session ended".to_string())
}

fn cmd_agents() -> Result<String, String> {
    let paths = ensure_state_root()?;
    let store = AgentStore::load(&paths.agents_path).map_err(|e| e.to_string())?;
    let mut lines = vec![format!("agents_total={}", store.agents().len())];
    for agent in store.agents() {
        let mut markers = Vec::new();
        if store.is_preset(&agent.id) {
            markers.push("preset");
        }
        if store.current_id() == Some(&agent.id) {
            markers.push("current");
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(","))
        };
        lines.push(format!(
            "  {} name={} voice={}{suffix}",
            agent.id, agent.name, agent.voice
        ));
    }
    Ok(lines.join("\n"))
}

#[derive(Debug, Clone)]
struct DoctorFinding {
    id: String,
    ok: bool,
    detail: String,
    remediation: String,
}

fn doctor_finding(
    id: impl Into<String>,
    ok: bool,
    detail: impl Into<String>,
    remediation: impl Into<String>,
) -> DoctorFinding {
    DoctorFinding {
        id: id.into(),
        ok,
        detail: detail.into(),
        remediation: remediation.into(),
    }
}

fn cmd_doctor() -> Result<String, String> {
    let mut findings = Vec::new();

    let credential = ApiCredential::from_env().ok();
    findings.push(match &credential {
        Some(credential) => doctor_finding(
            "env.api_key",
            true,
            format!("{PRIMARY_API_KEY_VAR}={}", credential.masked()),
            "none",
        ),
        None => doctor_finding(
            "env.api_key",
            false,
            "no realtime API key in the environment",
            format!("export {PRIMARY_API_KEY_VAR} before running `sidekick`"),
        ),
    });

    let config_path = default_global_config_path().map_err(map_config_err)?;
    findings.push(doctor_finding(
        "config.path",
        true,
        format!(
            "config={} ({})",
            config_path.display(),
            if config_path.exists() {
                "present"
            } else {
                "absent, defaults apply"
            }
        ),
        "none",
    ));

    match load_settings_with_overrides() {
        Ok(settings) => findings.push(doctor_finding(
            "config.parse",
            true,
            format!("settings validated, endpoint={}", settings.session.endpoint),
            "none",
        )),
        Err(err) => findings.push(doctor_finding(
            "config.parse",
            false,
            format!("settings load failed: {err}"),
            "fix ~/.sidekick/config.yaml and retry `sidekick doctor`",
        )),
    }

    match ensure_state_root().and_then(|paths| {
        AgentStore::load(&paths.agents_path).map_err(|e| e.to_string())
    }) {
        Ok(store) => findings.push(doctor_finding(
            "agents.roster",
            true,
            format!("{} agents, default={}", store.agents().len(), store.default_agent().id),
            "none",
        )),
        Err(err) => findings.push(doctor_finding(
            "agents.roster",
            false,
            format!("roster load failed: {err}"),
            "fix or remove ~/.sidekick/agents.yaml and retry",
        )),
    }

    if let Some(credential) = &credential {
        findings.push(match probe_models_endpoint(credential) {
            Ok(detail) => doctor_finding("api.reachable", true, detail, "none"),
            Err(err) => doctor_finding(
                "api.reachable",
                false,
                err,
                "check network access and that the API key is valid",
            ),
        });
    }

    let failed = findings.iter().filter(|f| !f.ok).count();
    let summary = if failed == 0 { "healthy" } else { "unhealthy" };
    let mut lines = vec![
        format!("summary={summary}"),
        format!("checks_total={}", findings.len()),
        format!("checks_failed={failed}"),
    ];
    for finding in findings {
        lines.push(format!(
            "check:{}={}",
            finding.id,
            if finding.ok { "ok" } else { "fail" }
        ));
        lines.push(format!("check:{}.detail={}", finding.id, finding.detail));
        if !finding.ok {
            lines.push(format!(
                "check:{}.remediation={}",
                finding.id, finding.remediation
            ));
        }
    }
    Ok(lines.join("\n"))
}

fn probe_models_endpoint(credential: &ApiCredential) -> Result<String, String> {
    let url = format!(
        "{MODELS_PROBE_URL}?key={}",
        urlencoding::encode(credential.expose())
    );
    let response = ureq::get(&url)
        .timeout(PROBE_TIMEOUT)
        .call()
        .map_err(|e| format!("models endpoint probe failed: {e}"))?;
    Ok(format!("models endpoint status={}", response.status()))
}
