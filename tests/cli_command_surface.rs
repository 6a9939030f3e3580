use sidekick::app::cli::{cli_help_lines, parse_cli_verb, CliVerb};
use sidekick::app::run_cli;

#[test]
fn cli_command_surface_covers_the_documented_verbs() {
    let cases = [
        ("run", CliVerb::Companion),
        ("companion", CliVerb::Companion),
        ("agents", CliVerb::Agents),
        ("doctor", CliVerb::Doctor),
        ("version", CliVerb::Version),
        ("--version", CliVerb::Version),
        ("help", CliVerb::Help),
        ("--help", CliVerb::Help),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_cli_verb(input), expected, "verb `{input}`");
    }
    assert_eq!(parse_cli_verb("setup"), CliVerb::Unknown);
}

#[test]
fn cli_command_surface_help_documents_the_credential_contract() {
    let help = cli_help_lines().join("\n");
    assert!(help.contains("SIDEKICK_API_KEY"));
    assert!(help.contains("GEMINI_API_KEY"));
}

#[test]
fn cli_command_surface_rejects_unknown_commands() {
    let err = run_cli(vec!["start".to_string()]).expect_err("unknown command");
    assert_eq!(err, "unknown command `start`");
}
