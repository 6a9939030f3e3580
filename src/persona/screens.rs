use super::navigation::{PersonaScreen, WizardNavState, ALL_PERSONA_SCREENS};
use super::state::PersonaDraft;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardFieldRow {
    pub field: String,
    pub value: String,
    pub selected: bool,
}

pub struct WizardViewModel {
    pub step_line: String,
    pub rows: Vec<WizardFieldRow>,
    pub status_text: String,
    pub hint_text: String,
}

pub fn project_wizard_view_model(state: &WizardNavState, draft: &PersonaDraft) -> WizardViewModel {
    debug_assert!(ALL_PERSONA_SCREENS.contains(&state.screen));
    let rows = vec![
        WizardFieldRow {
            field: "Name".to_string(),
            value: placeholder_if_empty(&draft.name),
            selected: state.screen == PersonaScreen::Name,
        },
        WizardFieldRow {
            field: "Personality".to_string(),
            value: placeholder_if_empty(&draft.personality),
            selected: state.screen == PersonaScreen::Personality,
        },
        WizardFieldRow {
            field: "Voice".to_string(),
            value: draft.voice.as_str().to_string(),
            selected: state.screen == PersonaScreen::Voice,
        },
        WizardFieldRow {
            field: "Create persona".to_string(),
            value: String::new(),
            selected: state.screen == PersonaScreen::Review,
        },
    ];
    WizardViewModel {
        step_line: format!(
            "Step {} of {}",
            state.screen.step_index() + 1,
            ALL_PERSONA_SCREENS.len()
        ),
        rows,
        status_text: state.status_text.clone(),
        hint_text: state.hint_text.clone(),
    }
}

fn placeholder_if_empty(value: &str) -> String {
    if value.trim().is_empty() {
        "<unset>".to_string()
    } else {
        value.to_string()
    }
}

/// Exclusive top-level screen: takes over the whole frame, no header and no
/// overlays.
pub(crate) fn draw_wizard(
    frame: &mut Frame<'_>,
    view_model: &WizardViewModel,
    editing: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "New Persona",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(view_model.step_line.clone()),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    if let Some(buffer) = editing {
        let editor = Paragraph::new(format!("{buffer}█"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Editing (Enter apply, Esc discard)")
                    .borders(Borders::ALL)
                    .padding(Padding::new(2, 2, 1, 1)),
            );
        frame.render_widget(editor, chunks[1]);
    } else {
        let rows = view_model.rows.iter().map(|row| {
            let style = if row.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(row.field.clone()),
                Cell::from(row.value.clone()),
            ])
            .style(style)
        });
        let table = Table::new(
            rows,
            [Constraint::Percentage(30), Constraint::Percentage(70)],
        )
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::new(3, 3, 2, 2)),
        );
        frame.render_widget(table, chunks[1]);
    }

    let footer = Paragraph::new(vec![
        Line::from(view_model.hint_text.clone()),
        Line::from(format!("Status: {}", view_model.status_text)),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::project_wizard_view_model;
    use crate::persona::navigation::WizardNavState;
    use crate::persona::state::PersonaDraft;

    #[test]
    fn view_model_marks_the_active_step_and_placeholders_empty_fields() {
        let state = WizardNavState::start();
        let draft = PersonaDraft::default();
        let view_model = project_wizard_view_model(&state, &draft);

        assert_eq!(view_model.step_line, "Step 1 of 4");
        assert!(view_model.rows[0].selected);
        assert!(!view_model.rows[1].selected);
        assert_eq!(view_model.rows[0].value, "<unset>");
        assert_eq!(view_model.rows[2].value, "aoede");
    }
}
