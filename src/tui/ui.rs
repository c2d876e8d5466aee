use crate::tui::app::{App, Mode};
use crate::utils::token_spans;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(10),   // Results / Preview
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_main_area(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(f, f.area());
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.query.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search (Ctrl+P: preview, F5: reload, ?: help, Esc: quit) "),
        );

    f.render_widget(input, area);

    if app.mode == Mode::Search {
        let (x, y) = cursor_position(area, app.query.chars().count());
        f.set_cursor_position((x, y));
    }
}

/// Cursor cell after `query_chars` characters, kept inside the input border
fn cursor_position(area: Rect, query_chars: usize) -> (u16, u16) {
    let max = area.width.saturating_sub(2);
    let offset = u16::try_from(query_chars).unwrap_or(u16::MAX).min(max);
    (
        area.x.saturating_add(offset).saturating_add(1),
        area.y.saturating_add(1),
    )
}

fn draw_main_area(f: &mut Frame, app: &App, area: Rect) {
    let mode = if app.mode == Mode::Help { app.previous_mode } else { app.mode };
    match mode {
        Mode::Preview => draw_preview(f, app, area),
        _ => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);

            draw_results_list(f, app, chunks[0]);
            draw_preview(f, app, chunks[1]);
        }
    }
}

fn draw_results_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .results
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == app.selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let result = &row.display;
            let title = if result.title.is_empty() { &result.page } else { &result.title };

            let line = Line::from(vec![
                Span::styled(title.clone(), Style::default().fg(Color::Blue)),
                Span::raw("  "),
                Span::styled(result.category.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(format!("{:.2}", result.score), Style::default().fg(Color::Yellow)),
            ]);

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Results ({}) ", app.results.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_widget(list, area);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match (app.get_selected_result(), app.selected_entry()) {
        (Some(row), Some(entry)) => {
            let header_style = Style::default().fg(Color::DarkGray);
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{} {}", entry.page, entry.location),
                    header_style,
                )),
                Line::from(Span::styled(format!("category: {}", entry.category), header_style)),
                Line::raw(""),
            ];

            for line in entry.text.lines() {
                lines.push(highlight_terms(line, &row.display.matched_terms));
            }

            let lines: Vec<Line> = lines
                .into_iter()
                .skip(app.preview_scroll)
                .take(area.height.saturating_sub(2) as usize)
                .collect();

            (format!(" {} ", row.display.title), Text::from(lines))
        }
        _ => (" Preview ".to_string(), Text::raw("No preview available")),
    };

    let preview = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });

    f.render_widget(preview, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status_message.as_str())
        .style(Style::default().fg(Color::Cyan));

    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = [
        "Type            search as you type",
        "Up/Down, Tab    move selection",
        "Ctrl+J/Ctrl+K   move selection",
        "PgUp/PgDn       move by a page",
        "gg / G          first / last result",
        "Ctrl+W          delete word",
        "Ctrl+P          toggle full preview",
        "F5              reload index from disk",
        "Esc             clear query / quit",
        "",
        "Filters: category:function  page:Home*",
    ];

    let width = 50.min(area.width);
    let height = (help.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let text = Text::from(help.iter().map(|l| Line::raw(*l)).collect::<Vec<_>>());
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// Highlight matched query terms in a line of entry text
fn highlight_terms<'a>(text: &'a str, terms: &[String]) -> Line<'a> {
    let mut spans = Vec::new();
    let mut pos = 0;

    for span in token_spans(text) {
        if !terms.iter().any(|t| *t == span.token) {
            continue;
        }
        if span.range.start > pos {
            spans.push(Span::raw(&text[pos..span.range.start]));
        }
        spans.push(Span::styled(
            &text[span.range.clone()],
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        pos = span.range.end;
    }

    if pos < text.len() {
        spans.push(Span::raw(&text[pos..]));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_follows_query() {
        let area = Rect::new(0, 0, 40, 3);
        assert_eq!(cursor_position(area, 0), (1, 1));
        assert_eq!(cursor_position(area, 5), (6, 1));
    }

    #[test]
    fn test_cursor_clamped_to_input_box() {
        let area = Rect::new(2, 0, 40, 3);
        assert_eq!(cursor_position(area, 100), (41, 1));
        assert_eq!(cursor_position(area, 70_000), (41, 1));

        let edge = Rect::new(u16::MAX - 5, 0, 5, 3);
        assert_eq!(cursor_position(edge, 10), (u16::MAX - 1, 1));
    }
}
