use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sidekick::persona::{
    parse_scripted_persona_keys, persona_action_from_key, persona_transition, PersonaAction,
    PersonaNavEffect, PersonaScreen, WizardNavState,
};

fn key_event(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn persona_navigation_module_maps_escape_by_screen() {
    assert_eq!(
        persona_action_from_key(PersonaScreen::Name, key_event(KeyCode::Esc)),
        Some(PersonaAction::Cancel)
    );
    assert_eq!(
        persona_action_from_key(PersonaScreen::Review, key_event(KeyCode::Esc)),
        Some(PersonaAction::Back)
    );
}

#[test]
fn persona_navigation_module_walks_every_step_forward_and_back() {
    let mut nav = WizardNavState::start();
    assert_eq!(nav.screen, PersonaScreen::Name);

    persona_transition(&mut nav, PersonaAction::MoveNext).expect("forward");
    persona_transition(&mut nav, PersonaAction::MoveNext).expect("forward");
    persona_transition(&mut nav, PersonaAction::MoveNext).expect("forward");
    assert_eq!(nav.screen, PersonaScreen::Review);

    persona_transition(&mut nav, PersonaAction::Back).expect("back");
    assert_eq!(nav.screen, PersonaScreen::Voice);
    persona_transition(&mut nav, PersonaAction::Back).expect("back");
    assert_eq!(nav.screen, PersonaScreen::Personality);
    persona_transition(&mut nav, PersonaAction::Back).expect("back");
    assert_eq!(nav.screen, PersonaScreen::Name);
}

#[test]
fn persona_navigation_module_edit_effects_match_the_screen() {
    let mut nav = WizardNavState::start();
    let transition = persona_transition(&mut nav, PersonaAction::Enter).expect("edit name");
    assert_eq!(transition.effect, PersonaNavEffect::EditName);

    nav.screen = PersonaScreen::Personality;
    let transition = persona_transition(&mut nav, PersonaAction::Enter).expect("edit personality");
    assert_eq!(transition.effect, PersonaNavEffect::EditPersonality);

    nav.screen = PersonaScreen::Voice;
    let transition = persona_transition(&mut nav, PersonaAction::Toggle).expect("cycle voice");
    assert_eq!(transition.effect, PersonaNavEffect::CycleVoice);
}

#[test]
fn persona_navigation_module_cancel_works_from_any_screen() {
    for screen in [
        PersonaScreen::Name,
        PersonaScreen::Personality,
        PersonaScreen::Voice,
        PersonaScreen::Review,
    ] {
        let mut nav = WizardNavState::start();
        nav.screen = screen;
        let transition = persona_transition(&mut nav, PersonaAction::Cancel).expect("cancel");
        assert_eq!(transition.effect, PersonaNavEffect::CancelWizard);
    }
}

#[test]
fn persona_navigation_module_parses_scripted_keys() {
    let keys = parse_scripted_persona_keys("down,down,t,enter,esc,ctrl-c").expect("parse keys");
    let mapped = keys
        .iter()
        .map(|key| persona_action_from_key(PersonaScreen::Voice, *key))
        .collect::<Vec<_>>();
    assert_eq!(
        mapped,
        vec![
            Some(PersonaAction::MoveNext),
            Some(PersonaAction::MoveNext),
            Some(PersonaAction::Toggle),
            Some(PersonaAction::Enter),
            Some(PersonaAction::Back),
            Some(PersonaAction::Cancel),
        ]
    );

    let err = parse_scripted_persona_keys("up,sideways").expect_err("invalid token");
    assert!(err.contains("sideways"));
}
