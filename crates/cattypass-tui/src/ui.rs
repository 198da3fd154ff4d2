//! UI rendering with Ratatui.

use crate::app::{App, EditField, EditForm, FormField, InputMode, Overlay, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

const MASKED_PASSWORD: &str = "••••••••";

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Page
            Constraint::Length(1), // Help line
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    match app.tab {
        Tab::Generate => render_generate(frame, app, chunks[1]),
        Tab::Manage => render_manage(frame, app, chunks[1]),
        Tab::Settings => render_settings(frame, app, chunks[1]),
        Tab::Credits => render_credits(frame, chunks[1]),
    }

    let help = Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Search {
        render_search_overlay(frame, app, area);
    }

    match &app.overlay {
        Overlay::None => {}
        Overlay::Message(message) => render_message(frame, message, area),
        Overlay::ConfirmDelete(site) => render_message(
            frame,
            &format!("Delete password for \"{site}\"? (y/n)"),
            area,
        ),
        Overlay::Edit(form) => render_edit_modal(frame, form, area),
    }
}

fn help_text(app: &App) -> &'static str {
    match (&app.input_mode, app.tab) {
        (InputMode::Editing, _) => "Type to edit | Tab: next field | Enter/Esc: done",
        (InputMode::ImportPath, _) => "Type CSV path | Enter: import | Esc: cancel",
        (InputMode::Search, _) => "Type to search | Enter: select | Esc: cancel",
        (_, Tab::Generate) => "g: generate | s: save | Enter: edit field | j/k: move | Tab: next page | q: quit",
        (_, Tab::Manage) => "e: edit | d: delete | /: search | p: show passwords | r: reload | q: quit",
        (_, Tab::Settings) => "x: export JSON | i: import CSV | q: quit",
        (_, Tab::Credits) => "Tab: next page | q: quit",
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" 🐾 CattyPass ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Render the Generate page form.
fn render_generate(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 🔑 Generate ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let editing = app.input_mode == InputMode::Editing;
    let form = &app.form;
    let fields = [
        (FormField::Site, "Site", form.site.as_str()),
        (FormField::Password, "Password", form.password.as_str()),
        (FormField::Username, "Username", form.username.as_str()),
        (FormField::Note, "Note", form.note.as_str()),
    ];

    for (i, (field, label, value)) in fields.into_iter().enumerate() {
        let focused = form.focus == field;
        render_input(frame, label, value, focused, focused && editing, chunks[i]);
    }
}

/// Render the saved passwords list with a detail pane.
fn render_manage(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let block = Block::default()
        .title(" 📁 Saved ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    if app.records.is_empty() {
        let message = Paragraph::new("No saved passwords yet.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(message, inner);
    } else {
        let items: Vec<ListItem> = app
            .records
            .iter()
            .enumerate()
            .map(|(i, (site, _))| {
                let style = if i == app.selected_index {
                    Style::default()
                        .bg(Color::Rgb(60, 60, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                ListItem::new(Line::from(format!("🔑 {site}"))).style(style)
            })
            .collect();
        frame.render_widget(List::new(items), inner);
    }

    render_record_detail(frame, app, chunks[1]);
}

fn render_record_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 📋 Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some((site, record)) = app.selected_record() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Site
            Constraint::Length(2), // Username
            Constraint::Length(2), // Password
            Constraint::Min(3),    // Note
        ])
        .split(inner);

    render_field(frame, "Site", site, chunks[0], Color::White);
    render_field(frame, "Username", &record.username, chunks[1], Color::Green);

    let password = if app.show_passwords {
        record.password.as_str()
    } else {
        MASKED_PASSWORD
    };
    render_field(frame, "Password", password, chunks[2], Color::Yellow);

    let note_block = Block::default().title(Span::styled(" Note ", Style::default().fg(Color::DarkGray)));
    let note_inner = note_block.inner(chunks[3]);
    frame.render_widget(note_block, chunks[3]);
    let note = Paragraph::new(record.note.as_str())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    frame.render_widget(note, note_inner);
}

fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" ⚙ Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    render_field(
        frame,
        "Storage",
        &app.config.storage_path.display().to_string(),
        chunks[0],
        Color::White,
    );
    render_field(
        frame,
        "Export to",
        &app.config.export_dir.display().to_string(),
        chunks[1],
        Color::White,
    );

    if app.input_mode == InputMode::ImportPath {
        render_input(frame, "Import CSV", &app.import_path, true, true, chunks[2]);
    } else {
        let hint = Paragraph::new("x: export passwords as JSON    i: import passwords from CSV")
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(hint, chunks[2]);
    }
}

fn render_credits(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" 🐾 Credits ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let text = vec![
        Line::from(Span::styled(
            "CattyPass",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Developed by the CattyMod Team"),
        Line::from("https://github.com/cattymod/pass"),
        Line::from(""),
        Line::from("License: MIT"),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_field(frame: &mut Frame, label: &str, value: &str, area: Rect, color: Color) {
    let line = Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ]);
    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, label: &str, value: &str, focused: bool, editing: bool, area: Rect) {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!("{marker}{label}: "), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ];
    if editing {
        spans.push(Span::styled(
            "_",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_message(frame: &mut Frame, message: &str, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, 7, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let paragraph = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, dialog_area);
}

fn render_edit_modal(frame: &mut Frame, form: &EditForm, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 11.min(area.height.saturating_sub(2));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" Edit: {} ", form.site))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(inner);

    let fields = [
        (EditField::Username, "Username", form.username.as_str()),
        (EditField::Password, "Password", form.password.as_str()),
        (EditField::Note, "Note", form.note.as_str()),
    ];
    for (i, (field, label, value)) in fields.into_iter().enumerate() {
        let focused = form.focus == field;
        render_input(frame, label, value, focused, focused, chunks[i]);
    }

    if let Some(ref error) = form.error {
        let error_msg = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error_msg, chunks[3]);
    }
}

/// Render the search overlay.
fn render_search_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the search dialog
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 15.min(area.height.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    // Clear background
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔍 Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let input_line = Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Magenta)),
        Span::styled(&app.search_query, Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !app.search_results.is_empty() {
        let items: Vec<ListItem> = app
            .search_results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let style = if i == app.search_selected_index {
                    Style::default()
                        .bg(Color::Rgb(60, 40, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled("🔑 ", Style::default()),
                    Span::styled(&result.site, style),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), chunks[1]);
    } else if !app.search_query.is_empty() {
        let no_results = Paragraph::new("No results found")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(no_results, chunks[1]);
    }
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
