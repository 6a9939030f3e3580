#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Companion,
    Agents,
    Doctor,
    Version,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "run" | "companion" => CliVerb::Companion,
        "agents" => CliVerb::Agents,
        "doctor" => CliVerb::Doctor,
        "version" | "--version" => CliVerb::Version,
        "help" | "--help" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  run                Start the live companion (default when no command is given)"
            .to_string(),
        "  agents             List the persona roster".to_string(),
        "  doctor             Run local environment and config checks".to_string(),
        "  version            Print the sidekick version".to_string(),
        "  help               Show this help".to_string(),
        String::new(),
        "Environment:".to_string(),
        "  SIDEKICK_API_KEY       Realtime API key (falls back to GEMINI_API_KEY); required"
            .to_string(),
        "  SIDEKICK_LIVE_ENDPOINT Optional websocket endpoint override".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}
