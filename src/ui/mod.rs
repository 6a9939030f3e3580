pub mod bootstrap;
pub mod keymap;
pub mod router;
pub mod screens;
pub mod tui;
pub mod visibility;

pub use bootstrap::{apply_bootstrap, reconcile_default_agent, BootstrapAction};
pub use keymap::{shell_action_from_key, ShellAction, ShellKeyContext};
pub use router::{resolve_screen, Screen, StageView};
pub use tui::{run_companion_tui, CompanionPaths};
pub use visibility::UiVisibility;
