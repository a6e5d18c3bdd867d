use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::app_state::AppState;
use crate::app_state::DraftField;
use crate::app_state::Focus;
use crate::app_state::GRID_COLS;

const CARD_HEIGHT: u16 = 3;

pub(crate) fn draw(frame: &mut Frame, state: &AppState) {
    let [header, grid, input, status, output] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(CARD_HEIGHT * 3),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Min(5),
    ])
    .areas(frame.area());

    draw_header(frame, header);
    draw_tone_grid(frame, grid, state);
    draw_input(frame, input, state);
    draw_status(frame, status, state);
    draw_output(frame, output, state);

    if let Some(draft) = &state.draft {
        draw_draft_modal(frame, draft);
    } else if let Some(name) = &state.confirm_delete {
        draw_confirm_modal(frame, name);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("toneshift", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  rewrite your text in any tone of voice"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_tone_grid(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = state.cursor / GRID_COLS;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);
    let card_width = area.width / GRID_COLS as u16;

    for (index, tone) in state.catalog.all().enumerate() {
        let row = index / GRID_COLS;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = index % GRID_COLS;
        let card = Rect {
            x: area.x + col as u16 * card_width,
            y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT,
        };

        let selected = state.selected.as_deref() == Some(tone.name.as_str());
        let highlighted = state.focus == Focus::Tones && index == state.cursor;
        let border_style = if selected {
            Style::default().fg(Color::Cyan)
        } else if highlighted {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let mut title = Line::from(tone.name.clone());
        if !state.catalog.is_built_in(&tone.name) {
            title.push_span(Span::styled(" *", Style::default().fg(Color::Magenta)));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        let description = Paragraph::new(tone.description.clone())
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(description, card);
    }
}

fn draw_input(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Editor && state.draft.is_none();
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Your text");
    let inner = block.inner(area);
    let paragraph = if state.input.is_empty() {
        Paragraph::new("Type or paste the text you want rewritten.")
            .style(Style::default().add_modifier(Modifier::DIM))
    } else {
        Paragraph::new(state.input.text())
    };
    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);

    if focused && state.confirm_delete.is_none() {
        let (row, col) = state.input.cursor_row_col();
        frame.set_cursor_position(Position {
            x: inner.x + col as u16,
            y: inner.y + row as u16,
        });
    }
}

fn draw_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(error) = &state.error {
        Line::from(error.as_str()).style(Style::default().fg(Color::Red))
    } else {
        let generate = if state.can_generate() {
            Span::styled("^G generate", Style::default().fg(Color::Green))
        } else {
            Span::styled("^G generate", Style::default().add_modifier(Modifier::DIM))
        };
        Line::from(vec![
            Span::raw("Tab focus  ·  Enter select  ·  n new tone  ·  d delete  ·  "),
            generate,
            Span::raw("  ·  ^Y copy  ·  q quit"),
        ])
        .style(Style::default().add_modifier(Modifier::DIM))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_output(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut title = Line::from("Rewritten text");
    if state.copied {
        title.push_span(Span::styled(
            "  Copied!",
            Style::default().fg(Color::Green),
        ));
    }
    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = if state.busy {
        Paragraph::new("Generating…").style(Style::default().fg(Color::Yellow))
    } else if let Some(output) = &state.output {
        Paragraph::new(output.as_str())
    } else {
        Paragraph::new("The rewritten version of your text will appear here.")
            .style(Style::default().add_modifier(Modifier::DIM))
    };
    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
}

fn draw_draft_modal(frame: &mut Frame, draft: &crate::app_state::ToneDraft) {
    let area = centered(frame.area(), 60, 10);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title("New tone");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_area, description_area, error_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let field_label = |label: &str, active: bool| {
        if active {
            Span::styled(label.to_string(), Style::default().fg(Color::Cyan))
        } else {
            Span::raw(label.to_string())
        }
    };
    let name = Line::from(vec![
        field_label("Name: ", draft.field == DraftField::Name),
        Span::raw(draft.name.text()),
    ]);
    frame.render_widget(Paragraph::new(name), name_area);
    let description = Line::from(vec![
        field_label("Description: ", draft.field == DraftField::Description),
        Span::raw(draft.description.text()),
    ]);
    frame.render_widget(
        Paragraph::new(description).wrap(Wrap { trim: false }),
        description_area,
    );
    if let Some(error) = &draft.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }
    frame.render_widget(
        Paragraph::new("Tab switch field  ·  Enter save  ·  Esc cancel").dim(),
        hint_area,
    );
}

fn draw_confirm_modal(frame: &mut Frame, name: &str) {
    let area = centered(frame.area(), 50, 3);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title("Delete tone");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(format!("Delete the custom tone `{name}`? (y/n)")),
        inner,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
