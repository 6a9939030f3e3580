use super::router::StageView;
use crate::session::{Speaker, Transcript};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field: String,
    pub value: String,
}

pub fn field_row(field: &str, value: impl Into<String>) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        value: value.into(),
    }
}

pub struct OverlayView<'a> {
    pub title: &'a str,
    pub rows: Vec<FieldRow>,
    pub selected: usize,
    pub editing: Option<&'a str>,
    pub hint: &'a str,
}

pub struct MainShellView<'a> {
    pub agent_name: Option<&'a str>,
    pub agent_accent: Color,
    pub user_name: &'a str,
    pub stage: StageView,
    pub transcript: &'a Transcript,
    pub spinner_frame: &'static str,
    pub tray_status: String,
    pub feedback: Option<&'a str>,
    pub input: &'a str,
    pub cursor_suffix: &'static str,
    pub settings_overlay: Option<OverlayView<'a>>,
    pub edit_overlay: Option<OverlayView<'a>>,
}

const HEADER_HINTS: &str =
    "Ctrl+S settings | Ctrl+E edit agent | Ctrl+P new persona | Ctrl+T mute | Ctrl+R reconnect | Esc quit";

pub fn accent_color_from_hex(hex: &str) -> Color {
    let raw = hex.trim().trim_start_matches('#');
    if raw.len() != 6 || !raw.is_ascii() {
        return Color::Cyan;
    }
    match (
        u8::from_str_radix(&raw[0..2], 16),
        u8::from_str_radix(&raw[2..4], 16),
        u8::from_str_radix(&raw[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Cyan,
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// The standard shell: header always, stage + control tray + input, then any
/// overlays stacked over the stage (settings below edit).
pub(crate) fn draw_main_shell(frame: &mut Frame<'_>, view: &MainShellView<'_>) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, view, sections[0]);
    match view.stage {
        StageView::Loading => draw_loading_stage(frame, view, sections[1]),
        StageView::Active => draw_active_stage(frame, view, sections[1]),
    }
    draw_control_tray(frame, view, sections[2]);

    let input_widget = Paragraph::new(format!("you> {}{}", view.input, view.cursor_suffix))
        .block(Block::default().title("Input").borders(Borders::ALL));
    frame.render_widget(input_widget, sections[3]);

    if let Some(overlay) = &view.settings_overlay {
        draw_overlay(frame, overlay, frame.area());
    }
    if let Some(overlay) = &view.edit_overlay {
        draw_overlay(frame, overlay, frame.area());
    }
}

fn draw_header(frame: &mut Frame<'_>, view: &MainShellView<'_>, area: Rect) {
    let companion = match view.agent_name {
        Some(name) => format!("Sidekick — {name}"),
        None => "Sidekick".to_string(),
    };
    let mut title_line = vec![Span::styled(
        companion,
        Style::default()
            .fg(view.agent_accent)
            .add_modifier(Modifier::BOLD),
    )];
    if !view.user_name.trim().is_empty() {
        title_line.push(Span::raw(format!("  ({})", view.user_name.trim())));
    }
    let header = Paragraph::new(vec![Line::from(title_line), Line::raw(HEADER_HINTS)])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_loading_stage(frame: &mut Frame<'_>, view: &MainShellView<'_>, area: Rect) {
    let body = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::styled(
            view.spinner_frame,
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::raw("Loading agent or awaiting selection..."),
    ])
    .alignment(Alignment::Center)
    .block(main_panel_block());
    frame.render_widget(body, area);
}

fn draw_active_stage(frame: &mut Frame<'_>, view: &MainShellView<'_>, area: Rect) {
    let lines = view
        .transcript
        .lines()
        .iter()
        .map(|line| {
            let style = match line.speaker {
                Speaker::Agent => Style::default().fg(Color::Green),
                Speaker::You => Style::default().fg(Color::Yellow),
                Speaker::System => Style::default().fg(Color::Gray),
            };
            Line::styled(format!("{}> {}", line.speaker.as_str(), line.text), style)
        })
        .collect::<Vec<_>>();
    let transcript_widget = Paragraph::new(lines)
        .block(Block::default().title("Conversation").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(transcript_widget, area);
}

fn draw_control_tray(frame: &mut Frame<'_>, view: &MainShellView<'_>, area: Rect) {
    let text = match view.feedback {
        Some(feedback) => format!("{} | {}", view.tray_status, feedback),
        None => view.tray_status.clone(),
    };
    let tray = Paragraph::new(text).block(
        Block::default()
            .title("Tray")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(view.agent_accent)),
    );
    frame.render_widget(tray, area);
}

fn draw_overlay(frame: &mut Frame<'_>, overlay: &OverlayView<'_>, area: Rect) {
    let popup = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(popup);

    if let Some(buffer) = overlay.editing {
        let editor = Paragraph::new(format!("{buffer}█"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!("{} — editing", overlay.title))
                    .borders(Borders::ALL)
                    .padding(Padding::new(2, 2, 1, 1)),
            );
        frame.render_widget(editor, chunks[0]);
    } else {
        let rows = overlay.rows.iter().enumerate().map(|(idx, row)| {
            let style = if idx == overlay.selected {
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
            [Constraint::Percentage(35), Constraint::Percentage(65)],
        )
        .column_spacing(2)
        .block(
            Block::default()
                .title(overlay.title)
                .borders(Borders::ALL)
                .padding(Padding::new(2, 2, 1, 1)),
        );
        frame.render_widget(table, chunks[0]);
    }

    let footer =
        Paragraph::new(overlay.hint).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[1]);
}

fn main_panel_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(3, 3, 2, 2))
}
