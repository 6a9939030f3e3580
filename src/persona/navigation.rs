use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

const NAME_STATUS_TEXT: &str = "Name your persona. Enter edits the field.";
const NAME_HINT_TEXT: &str = "Enter edit | Down next | Esc cancel";
const PERSONALITY_STATUS_TEXT: &str = "Describe how the persona behaves. Enter edits.";
const PERSONALITY_HINT_TEXT: &str = "Enter edit | Up/Down move | Esc back";
const VOICE_STATUS_TEXT: &str = "Pick a voice. Enter cycles through the options.";
const VOICE_HINT_TEXT: &str = "Enter/t cycle | Up/Down move | Esc back";
const REVIEW_STATUS_TEXT: &str = "Review the persona. Enter creates it.";
const REVIEW_HINT_TEXT: &str = "Enter create | Up back | Esc back";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaScreen {
    Name,
    Personality,
    Voice,
    Review,
}

pub const ALL_PERSONA_SCREENS: [PersonaScreen; 4] = [
    PersonaScreen::Name,
    PersonaScreen::Personality,
    PersonaScreen::Voice,
    PersonaScreen::Review,
];

impl PersonaScreen {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonaScreen::Name => "name",
            PersonaScreen::Personality => "personality",
            PersonaScreen::Voice => "voice",
            PersonaScreen::Review => "review",
        }
    }

    pub fn step_index(self) -> usize {
        match self {
            PersonaScreen::Name => 0,
            PersonaScreen::Personality => 1,
            PersonaScreen::Voice => 2,
            PersonaScreen::Review => 3,
        }
    }

    fn status_text(self) -> &'static str {
        match self {
            PersonaScreen::Name => NAME_STATUS_TEXT,
            PersonaScreen::Personality => PERSONALITY_STATUS_TEXT,
            PersonaScreen::Voice => VOICE_STATUS_TEXT,
            PersonaScreen::Review => REVIEW_STATUS_TEXT,
        }
    }

    fn hint_text(self) -> &'static str {
        match self {
            PersonaScreen::Name => NAME_HINT_TEXT,
            PersonaScreen::Personality => PERSONALITY_HINT_TEXT,
            PersonaScreen::Voice => VOICE_HINT_TEXT,
            PersonaScreen::Review => REVIEW_HINT_TEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaAction {
    MovePrev,
    MoveNext,
    Enter,
    Back,
    Cancel,
    Toggle,
}

impl PersonaAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonaAction::MovePrev => "move_prev",
            PersonaAction::MoveNext => "move_next",
            PersonaAction::Enter => "enter",
            PersonaAction::Back => "back",
            PersonaAction::Cancel => "cancel",
            PersonaAction::Toggle => "toggle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardNavState {
    pub screen: PersonaScreen,
    pub status_text: String,
    pub hint_text: String,
}

impl WizardNavState {
    pub fn start() -> Self {
        Self {
            screen: PersonaScreen::Name,
            status_text: NAME_STATUS_TEXT.to_string(),
            hint_text: NAME_HINT_TEXT.to_string(),
        }
    }

    fn move_to(&mut self, screen: PersonaScreen) {
        self.screen = screen;
        self.status_text = screen.status_text().to_string();
        self.hint_text = screen.hint_text().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaNavEffect {
    None,
    EditName,
    EditPersonality,
    CycleVoice,
    Commit,
    CancelWizard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTransition {
    pub effect: PersonaNavEffect,
    pub feedback: Option<String>,
}

impl PersonaTransition {
    fn no_op(feedback: Option<String>) -> Self {
        Self {
            effect: PersonaNavEffect::None,
            feedback,
        }
    }

    fn effect(effect: PersonaNavEffect) -> Self {
        Self {
            effect,
            feedback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaNavError {
    InvalidTransition {
        screen: PersonaScreen,
        action: PersonaAction,
    },
}

impl std::fmt::Display for PersonaNavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonaNavError::InvalidTransition { screen, action } => {
                write!(
                    f,
                    "invalid persona wizard transition: screen={} action={}",
                    screen.as_str(),
                    action.as_str()
                )
            }
        }
    }
}

pub fn persona_action_from_key(
    screen: PersonaScreen,
    key: crossterm::event::KeyEvent,
) -> Option<PersonaAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(PersonaAction::Cancel);
    }
    match key.code {
        KeyCode::Up => Some(PersonaAction::MovePrev),
        KeyCode::Down => Some(PersonaAction::MoveNext),
        KeyCode::Esc => Some(if screen == PersonaScreen::Name {
            PersonaAction::Cancel
        } else {
            PersonaAction::Back
        }),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Some(PersonaAction::Enter),
        KeyCode::Char('t') => Some(PersonaAction::Toggle),
        _ => None,
    }
}

pub fn parse_scripted_persona_keys(raw: &str) -> Result<Vec<crossterm::event::KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let normalized = token.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        let key = match normalized.as_str() {
            "up" => crossterm::event::KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            "down" => crossterm::event::KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            "enter" => crossterm::event::KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            "esc" => crossterm::event::KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            "ctrl-c" => crossterm::event::KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            "t" => crossterm::event::KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE),
            other => {
                return Err(format!(
                    "invalid SIDEKICK_PERSONA_SCRIPT_KEYS token `{other}`; valid tokens: up,down,enter,esc,ctrl-c,t"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

/// Pure wizard transition. Field contents never change here; editing and the
/// commit itself are effects the caller applies.
pub fn persona_transition(
    state: &mut WizardNavState,
    action: PersonaAction,
) -> Result<PersonaTransition, PersonaNavError> {
    if action == PersonaAction::Cancel {
        return Ok(PersonaTransition::effect(PersonaNavEffect::CancelWizard));
    }

    match state.screen {
        PersonaScreen::Name => match action {
            PersonaAction::Enter => Ok(PersonaTransition::effect(PersonaNavEffect::EditName)),
            PersonaAction::MoveNext => {
                state.move_to(PersonaScreen::Personality);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::MovePrev => Ok(PersonaTransition::no_op(None)),
            PersonaAction::Back => Ok(PersonaTransition::effect(PersonaNavEffect::CancelWizard)),
            PersonaAction::Toggle => Err(PersonaNavError::InvalidTransition {
                screen: state.screen,
                action,
            }),
            PersonaAction::Cancel => unreachable!(),
        },
        PersonaScreen::Personality => match action {
            PersonaAction::Enter => {
                Ok(PersonaTransition::effect(PersonaNavEffect::EditPersonality))
            }
            PersonaAction::MoveNext => {
                state.move_to(PersonaScreen::Voice);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::MovePrev | PersonaAction::Back => {
                state.move_to(PersonaScreen::Name);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::Toggle => Err(PersonaNavError::InvalidTransition {
                screen: state.screen,
                action,
            }),
            PersonaAction::Cancel => unreachable!(),
        },
        PersonaScreen::Voice => match action {
            PersonaAction::Enter | PersonaAction::Toggle => {
                Ok(PersonaTransition::effect(PersonaNavEffect::CycleVoice))
            }
            PersonaAction::MoveNext => {
                state.move_to(PersonaScreen::Review);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::MovePrev | PersonaAction::Back => {
                state.move_to(PersonaScreen::Personality);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::Cancel => unreachable!(),
        },
        PersonaScreen::Review => match action {
            PersonaAction::Enter => Ok(PersonaTransition::effect(PersonaNavEffect::Commit)),
            PersonaAction::MovePrev | PersonaAction::Back => {
                state.move_to(PersonaScreen::Voice);
                Ok(PersonaTransition::no_op(None))
            }
            PersonaAction::MoveNext => Ok(PersonaTransition::no_op(Some(
                "Already on the last step.".to_string(),
            ))),
            PersonaAction::Toggle => Err(PersonaNavError::InvalidTransition {
                screen: state.screen,
                action,
            }),
            PersonaAction::Cancel => unreachable!(),
        },
    }
}
