use super::bootstrap::apply_bootstrap;
use super::keymap::{shell_action_from_key, ShellAction, ShellKeyContext};
use super::router::{resolve_screen, Screen, StageView};
use super::screens::{
    accent_color_from_hex, draw_main_shell, field_row, FieldRow, MainShellView, OverlayView,
};
use super::visibility::UiVisibility;
use crate::agents::AgentStore;
use crate::config::{save_settings, Settings};
use crate::credential::ApiCredential;
use crate::persona::screens::{draw_wizard, project_wizard_view_model};
use crate::persona::{
    parse_scripted_persona_keys, persona_action_from_key, persona_transition,
    validate_persona_name, validate_persona_personality, PersonaDraft, PersonaNavEffect,
    WizardNavState,
};
use crate::session::{
    spawn_live_session, LiveSessionHandle, LiveSessionSpec, SessionEvent, SessionStatus,
    Transcript,
};
use crate::shared::ids::AgentId;
use crate::shared::logging::append_session_log_line;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const LOADING_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);
const SPINNER_TICK_INTERVAL: Duration = Duration::from_millis(120);
const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(500);

const SETTINGS_OVERLAY_HINT: &str = "Up/Down move | Enter edit | Esc close";
const EDIT_OVERLAY_HINT: &str = "Up/Down move | Enter edit/cycle | Esc close";

pub struct CompanionPaths {
    pub state_root: PathBuf,
    pub agents_path: PathBuf,
}

#[derive(Default)]
struct OverlayFocus {
    selected: usize,
    editing: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardEditTarget {
    Name,
    Personality,
}

struct WizardEdit {
    target: WizardEditTarget,
    buffer: String,
}

struct WizardState {
    nav: WizardNavState,
    draft: PersonaDraft,
    editing: Option<WizardEdit>,
}

impl WizardState {
    fn fresh() -> Self {
        Self {
            nav: WizardNavState::start(),
            draft: PersonaDraft::default(),
            editing: None,
        }
    }
}

struct ShellState {
    visibility: UiVisibility,
    agents: AgentStore,
    settings: Settings,
    paths: CompanionPaths,
    input: String,
    transcript: Transcript,
    session: Option<(AgentId, LiveSessionHandle)>,
    session_status: SessionStatus,
    session_enabled: bool,
    muted: bool,
    feedback: Option<String>,
    overlay_focus: OverlayFocus,
    wizard: WizardState,
    spinner_index: usize,
    last_spinner_tick: Instant,
    cursor_visible: bool,
    last_cursor_tick: Instant,
    should_quit: bool,
}

impl ShellState {
    fn new(settings: Settings, agents: AgentStore, paths: CompanionPaths) -> Self {
        Self {
            visibility: UiVisibility::new(),
            agents,
            settings,
            paths,
            input: String::new(),
            transcript: Transcript::new(),
            session: None,
            session_status: SessionStatus::Connecting,
            session_enabled: true,
            muted: false,
            feedback: None,
            overlay_focus: OverlayFocus::default(),
            wizard: WizardState::fresh(),
            spinner_index: 0,
            last_spinner_tick: Instant::now(),
            cursor_visible: true,
            last_cursor_tick: Instant::now(),
            should_quit: false,
        }
    }

    fn spinner_frame(&self) -> &'static str {
        LOADING_FRAMES[self.spinner_index % LOADING_FRAMES.len()]
    }

    fn advance_spinner_if_needed(&mut self) {
        if self.last_spinner_tick.elapsed() >= SPINNER_TICK_INTERVAL {
            self.spinner_index = (self.spinner_index + 1) % LOADING_FRAMES.len();
            self.last_spinner_tick = Instant::now();
        }
    }

    fn advance_cursor_blink_if_needed(&mut self) {
        if self.last_cursor_tick.elapsed() >= CURSOR_BLINK_INTERVAL {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_tick = Instant::now();
        }
    }

    fn cursor_suffix(&self) -> &'static str {
        if self.cursor_visible {
            "█"
        } else {
            " "
        }
    }

    fn tray_status(&self) -> String {
        let mic = if self.muted { "mic muted" } else { "mic live" };
        match self.agents.current() {
            Some(agent) => format!(
                "{} | voice {} | {mic}",
                self.session_status.label(),
                agent.voice
            ),
            None => self.session_status.label(),
        }
    }
}

pub fn run_companion_tui(
    credential: &ApiCredential,
    settings: Settings,
    agents: AgentStore,
    paths: CompanionPaths,
) -> Result<(), String> {
    let mut state = ShellState::new(settings, agents, paths);
    state
        .transcript
        .push_system("companion started; Esc quits, Ctrl+P creates a persona");

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut state, credential);
    if let Some((_, handle)) = state.session.take() {
        handle.close();
    }
    teardown_terminal(&mut terminal)?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut ShellState,
    credential: &ApiCredential,
) -> Result<(), String> {
    loop {
        state.advance_spinner_if_needed();
        state.advance_cursor_blink_if_needed();
        pump_session_events(state);
        sync_session(state, credential);
        draw_ui(terminal, state)?;

        // Deferred default-agent write: applied between draws, so the render
        // above saw the committed snapshot and the next one sees the result.
        if apply_bootstrap(&mut state.agents, &state.visibility) {
            persist_roster(state)?;
        }

        if state.should_quit {
            return Ok(());
        }
        if !event::poll(UI_POLL_INTERVAL).map_err(|e| format!("failed to poll events: {e}"))? {
            continue;
        }
        let Event::Key(key) = event::read().map_err(|e| format!("failed to read event: {e}"))?
        else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        state.feedback = None;
        match resolve_screen(&state.visibility, state.agents.current().is_some()) {
            Screen::PersonaCreation => handle_wizard_key(state, key)?,
            Screen::MainShell { .. } if state.overlay_focus.editing.is_some() => {
                handle_overlay_edit_key(state, key)?;
            }
            Screen::MainShell {
                settings_overlay,
                edit_overlay,
                ..
            } if settings_overlay || edit_overlay => handle_overlay_nav_key(state, key)?,
            Screen::MainShell { .. } => handle_shell_key(state, key)?,
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn draw_ui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &ShellState,
) -> Result<(), String> {
    let screen = resolve_screen(&state.visibility, state.agents.current().is_some());
    terminal
        .draw(|frame| match screen {
            Screen::PersonaCreation => {
                let view_model = project_wizard_view_model(&state.wizard.nav, &state.wizard.draft);
                let editing = state
                    .wizard
                    .editing
                    .as_ref()
                    .map(|edit| edit.buffer.as_str());
                draw_wizard(frame, &view_model, editing);
            }
            Screen::MainShell {
                settings_overlay,
                edit_overlay,
                stage,
            } => {
                let view = build_main_shell_view(state, settings_overlay, edit_overlay, stage);
                draw_main_shell(frame, &view);
            }
        })
        .map_err(|e| format!("failed to render companion UI: {e}"))?;
    Ok(())
}

fn build_main_shell_view<'a>(
    state: &'a ShellState,
    settings_overlay: bool,
    edit_overlay: bool,
    stage: StageView,
) -> MainShellView<'a> {
    let agent = state.agents.current();
    MainShellView {
        agent_name: agent.map(|a| a.name.as_str()),
        agent_accent: agent
            .map(|a| accent_color_from_hex(&a.accent_color))
            .unwrap_or(ratatui::style::Color::Cyan),
        user_name: &state.settings.user.name,
        stage,
        transcript: &state.transcript,
        spinner_frame: state.spinner_frame(),
        tray_status: state.tray_status(),
        feedback: state.feedback.as_deref(),
        input: &state.input,
        cursor_suffix: state.cursor_suffix(),
        settings_overlay: if settings_overlay && !edit_overlay {
            Some(build_settings_overlay(state))
        } else if settings_overlay {
            // Rendered below the edit overlay; row focus belongs to the top one.
            Some(OverlayView {
                title: "User Settings",
                rows: settings_rows(state),
                selected: usize::MAX,
                editing: None,
                hint: SETTINGS_OVERLAY_HINT,
            })
        } else {
            None
        },
        edit_overlay: if edit_overlay {
            Some(build_edit_overlay(state))
        } else {
            None
        },
    }
}

fn settings_rows(state: &ShellState) -> Vec<FieldRow> {
    vec![
        field_row("Display name", state.settings.user.name.clone()),
        field_row("About you", state.settings.user.info.clone()),
    ]
}

fn build_settings_overlay(state: &ShellState) -> OverlayView<'_> {
    OverlayView {
        title: "User Settings",
        rows: settings_rows(state),
        selected: state.overlay_focus.selected,
        editing: None,
        hint: SETTINGS_OVERLAY_HINT,
    }
}

fn build_edit_overlay(state: &ShellState) -> OverlayView<'_> {
    let rows = match state.agents.current() {
        Some(agent) => vec![
            field_row("Name", agent.name.clone()),
            field_row("Personality", agent.personality.clone()),
            field_row("Voice", agent.voice.as_str()),
        ],
        None => vec![field_row("No agent selected", "")],
    };
    OverlayView {
        title: "Edit Agent",
        rows,
        selected: state.overlay_focus.selected,
        editing: None,
        hint: EDIT_OVERLAY_HINT,
    }
}

fn handle_shell_key(state: &mut ShellState, key: KeyEvent) -> Result<(), String> {
    let context = ShellKeyContext {
        overlay_open: false,
    };
    let Some(action) = shell_action_from_key(key, context) else {
        return Ok(());
    };
    match action {
        ShellAction::Quit => state.should_quit = true,
        ShellAction::CloseTopOverlay => {}
        ShellAction::ToggleSettingsOverlay => {
            state.visibility.toggle_user_config();
            state.overlay_focus = OverlayFocus::default();
        }
        ShellAction::ToggleAgentEditOverlay => {
            state.visibility.toggle_agent_edit();
            state.overlay_focus = OverlayFocus::default();
        }
        ShellAction::OpenPersonaWizard => open_wizard(state)?,
        ShellAction::ToggleMute => {
            state.muted = !state.muted;
        }
        ShellAction::RequestReconnect => {
            restart_session(state);
            state.transcript.push_system("reconnect requested");
        }
        ShellAction::MovePrev | ShellAction::MoveNext => {}
        ShellAction::Submit => submit_input(state),
        ShellAction::Backspace => {
            state.input.pop();
        }
        ShellAction::Input(c) => state.input.push(c),
    }
    Ok(())
}

fn submit_input(state: &mut ShellState) {
    let message = state.input.trim().to_string();
    state.input.clear();
    if message.is_empty() {
        return;
    }
    if state.muted {
        state.feedback = Some("input muted; Ctrl+T to unmute".to_string());
        return;
    }
    let Some((_, handle)) = &state.session else {
        state.feedback = Some("no live session; Ctrl+R to reconnect".to_string());
        return;
    };
    state.transcript.push_user(message.clone());
    if let Err(err) = handle.send_text(&message) {
        state.feedback = Some(err);
    }
}

fn handle_overlay_nav_key(state: &mut ShellState, key: KeyEvent) -> Result<(), String> {
    let context = ShellKeyContext { overlay_open: true };
    let Some(action) = shell_action_from_key(key, context) else {
        return Ok(());
    };
    let editing_agent = state.visibility.show_agent_edit;
    let field_count = if editing_agent { 3 } else { 2 };
    match action {
        ShellAction::Quit => state.should_quit = true,
        ShellAction::CloseTopOverlay => {
            state.visibility.close_top_overlay();
            state.overlay_focus = OverlayFocus::default();
        }
        ShellAction::ToggleSettingsOverlay => {
            state.visibility.toggle_user_config();
            state.overlay_focus = OverlayFocus::default();
        }
        ShellAction::ToggleAgentEditOverlay => {
            state.visibility.toggle_agent_edit();
            state.overlay_focus = OverlayFocus::default();
        }
        ShellAction::OpenPersonaWizard => open_wizard(state)?,
        ShellAction::ToggleMute => state.muted = !state.muted,
        ShellAction::RequestReconnect => restart_session(state),
        ShellAction::MovePrev => {
            state.overlay_focus.selected = state.overlay_focus.selected.saturating_sub(1);
        }
        ShellAction::MoveNext => {
            state.overlay_focus.selected =
                std::cmp::min(state.overlay_focus.selected + 1, field_count - 1);
        }
        ShellAction::Submit => begin_overlay_edit(state)?,
        ShellAction::Backspace | ShellAction::Input(_) => {}
    }
    Ok(())
}

fn begin_overlay_edit(state: &mut ShellState) -> Result<(), String> {
    if state.visibility.show_agent_edit {
        let Some(agent) = state.agents.current().cloned() else {
            state.feedback = Some("no agent selected to edit".to_string());
            return Ok(());
        };
        match state.overlay_focus.selected {
            0 => state.overlay_focus.editing = Some(agent.name),
            1 => state.overlay_focus.editing = Some(agent.personality),
            _ => {
                let mut edited = agent;
                edited.voice = edited.voice.next();
                state.agents.update_current(edited);
                persist_roster(state)?;
                restart_session(state);
            }
        }
    } else {
        state.overlay_focus.editing = Some(match state.overlay_focus.selected {
            0 => state.settings.user.name.clone(),
            _ => state.settings.user.info.clone(),
        });
    }
    Ok(())
}

fn handle_overlay_edit_key(state: &mut ShellState, key: KeyEvent) -> Result<(), String> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return Ok(());
    }
    match key.code {
        KeyCode::Esc => {
            state.overlay_focus.editing = None;
        }
        KeyCode::Enter => commit_overlay_edit(state)?,
        KeyCode::Backspace => {
            if let Some(buffer) = &mut state.overlay_focus.editing {
                buffer.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(buffer) = &mut state.overlay_focus.editing {
                buffer.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

fn commit_overlay_edit(state: &mut ShellState) -> Result<(), String> {
    let Some(buffer) = state.overlay_focus.editing.take() else {
        return Ok(());
    };
    if state.visibility.show_agent_edit {
        let Some(mut agent) = state.agents.current().cloned() else {
            return Ok(());
        };
        match state.overlay_focus.selected {
            0 => {
                if let Err(err) = validate_persona_name(&buffer) {
                    state.feedback = Some(err);
                    state.overlay_focus.editing = Some(buffer);
                    return Ok(());
                }
                agent.name = buffer.trim().to_string();
            }
            1 => {
                if let Err(err) = validate_persona_personality(&buffer) {
                    state.feedback = Some(err);
                    state.overlay_focus.editing = Some(buffer);
                    return Ok(());
                }
                agent.personality = buffer.trim().to_string();
            }
            _ => return Ok(()),
        }
        state.agents.update_current(agent);
        persist_roster(state)?;
        restart_session(state);
    } else {
        match state.overlay_focus.selected {
            0 => state.settings.user.name = buffer.trim().to_string(),
            _ => state.settings.user.info = buffer.trim().to_string(),
        }
        save_settings(&state.settings).map_err(|e| format!("failed to save settings: {e}"))?;
        // The system instruction embeds the user identity, so refresh it.
        restart_session(state);
    }
    Ok(())
}

fn open_wizard(state: &mut ShellState) -> Result<(), String> {
    state.wizard = WizardState::fresh();
    state.visibility.set_show_persona_creation(true);
    if let Ok(raw) = std::env::var("SIDEKICK_PERSONA_SCRIPT_KEYS") {
        for key in parse_scripted_persona_keys(&raw)? {
            handle_wizard_key(state, key)?;
        }
    }
    Ok(())
}

fn handle_wizard_key(state: &mut ShellState, key: KeyEvent) -> Result<(), String> {
    if state.wizard.editing.is_some() {
        handle_wizard_edit_key(state, key);
        return Ok(());
    }
    let Some(action) = persona_action_from_key(state.wizard.nav.screen, key) else {
        return Ok(());
    };
    match persona_transition(&mut state.wizard.nav, action) {
        Ok(transition) => {
            if transition.feedback.is_some() {
                state.feedback = transition.feedback.clone();
            }
            apply_wizard_effect(state, transition.effect)?;
        }
        Err(err) => state.feedback = Some(err.to_string()),
    }
    Ok(())
}

fn handle_wizard_edit_key(state: &mut ShellState, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.visibility.set_show_persona_creation(false);
        state.wizard.editing = None;
        return;
    }
    let Some(edit) = &mut state.wizard.editing else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            state.wizard.editing = None;
        }
        KeyCode::Enter => {
            let value = edit.buffer.trim().to_string();
            match edit.target {
                WizardEditTarget::Name => state.wizard.draft.name = value,
                WizardEditTarget::Personality => state.wizard.draft.personality = value,
            }
            state.wizard.editing = None;
        }
        KeyCode::Backspace => {
            edit.buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            edit.buffer.push(c);
        }
        _ => {}
    }
}

fn apply_wizard_effect(state: &mut ShellState, effect: PersonaNavEffect) -> Result<(), String> {
    match effect {
        PersonaNavEffect::None => {}
        PersonaNavEffect::EditName => {
            state.wizard.editing = Some(WizardEdit {
                target: WizardEditTarget::Name,
                buffer: state.wizard.draft.name.clone(),
            });
        }
        PersonaNavEffect::EditPersonality => {
            state.wizard.editing = Some(WizardEdit {
                target: WizardEditTarget::Personality,
                buffer: state.wizard.draft.personality.clone(),
            });
        }
        PersonaNavEffect::CycleVoice => {
            state.wizard.draft.voice = state.wizard.draft.voice.next();
        }
        PersonaNavEffect::Commit => {
            match state
                .wizard
                .draft
                .clone()
                .into_profile(state.agents.agents())
            {
                Ok(profile) => {
                    let id = profile.id.clone();
                    let name = profile.name.clone();
                    state.agents.upsert(profile);
                    state.agents.set_current(&id);
                    persist_roster(state)?;
                    state.visibility.set_show_persona_creation(false);
                    state.session_enabled = true;
                    state
                        .transcript
                        .push_system(format!("persona {name} created"));
                }
                Err(message) => state.feedback = Some(message),
            }
        }
        PersonaNavEffect::CancelWizard => {
            state.visibility.set_show_persona_creation(false);
            state.feedback = Some("persona creation canceled".to_string());
        }
    }
    Ok(())
}

fn pump_session_events(state: &mut ShellState) {
    loop {
        let Some((_, handle)) = &state.session else {
            return;
        };
        let Some(event) = handle.try_event() else {
            return;
        };
        state.session_status.apply_event(&event);
        match event {
            SessionEvent::Connected => state.transcript.push_system("live session connected"),
            SessionEvent::Delta(delta) => state.transcript.push_agent_delta(&delta),
            SessionEvent::TurnComplete => state.transcript.complete_turn(),
            SessionEvent::Interrupted => state.transcript.mark_interrupted(),
            SessionEvent::Reconnecting { .. } => {}
            SessionEvent::Closed { reason, .. } => {
                state
                    .transcript
                    .push_system(format!("live session closed: {reason}"));
                if let Some((_, handle)) = state.session.take() {
                    handle.close();
                }
                state.session_enabled = false;
            }
        }
    }
}

/// Keeps the session worker in step with the current agent: tear down on
/// switch, spawn when the active stage needs one. A session closed by the
/// worker stays down until the user asks for a reconnect.
fn sync_session(state: &mut ShellState, credential: &ApiCredential) {
    let desired = if state.visibility.show_persona_creation {
        None
    } else {
        state.agents.current().map(|agent| agent.id.clone())
    };

    let Some(desired_id) = desired else {
        teardown_session(state);
        return;
    };

    let stale = state
        .session
        .as_ref()
        .map(|(id, _)| id != &desired_id)
        .unwrap_or(false);
    if stale {
        teardown_session(state);
        state.session_enabled = true;
    }

    if state.session.is_none() && state.session_enabled {
        let Some(agent) = state.agents.current() else {
            return;
        };
        let spec = LiveSessionSpec {
            endpoint: state.settings.session.endpoint.clone(),
            model: state.settings.session.model.clone(),
            voice: agent.voice.as_str().to_string(),
            system_instruction: agent.system_instruction(&state.settings.user),
            reconnect_backoff_ms: state.settings.session.reconnect_backoff_ms,
            max_reconnect_attempts: state.settings.session.max_reconnect_attempts,
        };
        let name = agent.name.clone();
        let handle = spawn_live_session(spec, credential);
        state.session = Some((desired_id, handle));
        state.session_status = SessionStatus::Connecting;
        state
            .transcript
            .push_system(format!("starting live session with {name}"));
        let _ = append_session_log_line(
            &state.paths.state_root,
            &format!("live session started agent={name}"),
        );
    }
}

fn teardown_session(state: &mut ShellState) {
    if let Some((_, handle)) = state.session.take() {
        handle.close();
    }
}

fn restart_session(state: &mut ShellState) {
    teardown_session(state);
    state.session_enabled = true;
    state.session_status = SessionStatus::Connecting;
}

fn persist_roster(state: &ShellState) -> Result<(), String> {
    state
        .agents
        .save(&state.paths.agents_path)
        .map_err(|e| format!("failed to save roster: {e}"))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, String> {
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)
        .map_err(|e| format!("failed to enter alternate screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| format!("failed to initialize terminal: {e}"))
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), String> {
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(|e| format!("failed to leave alternate screen: {e}"))?;
    terminal
        .show_cursor()
        .map_err(|e| format!("failed to restore cursor: {e}"))?;
    Ok(())
}
