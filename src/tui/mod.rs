mod app;
mod ui;

use crate::utils::AppConfig;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub fn run(index_path: PathBuf, config: AppConfig, initial_query: Option<String>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Index loads in background; the query runs once it is ready
    let mut app = App::new(index_path, config);
    if let Some(query) = initial_query {
        app.set_query(&query);
    }

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        app.poll_index_load();
        app.refresh();

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        // Only handle key press events, not release or repeat
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(()),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Ok(()),
            _ => {}
        }

        match app.mode {
            // Any key closes help
            app::Mode::Help => app.hide_help(),
            app::Mode::Search => {
                if app.pending_key == Some('g') {
                    app.clear_pending_key();
                    if key.code == KeyCode::Char('g') {
                        app.select_first();
                        continue;
                    }
                }

                match (key.modifiers, key.code) {
                    (KeyModifiers::CONTROL, KeyCode::Char('j'))
                    | (KeyModifiers::CONTROL, KeyCode::Char('n')) => app.select_next(),
                    (KeyModifiers::CONTROL, KeyCode::Char('k')) => app.select_prev(),
                    (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.select_page_down(),
                    (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.select_page_up(),
                    (KeyModifiers::CONTROL, KeyCode::Char('w')) => app.delete_word(),
                    (KeyModifiers::CONTROL, KeyCode::Char('h')) => {
                        app.query.pop();
                    }
                    (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.toggle_preview(),
                    (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                        KeyCode::Esc => {
                            if app.query.is_empty() {
                                return Ok(());
                            }
                            app.clear_query();
                        }
                        KeyCode::Enter => app.toggle_preview(),
                        KeyCode::Down | KeyCode::Tab => app.select_next(),
                        KeyCode::Up | KeyCode::BackTab => app.select_prev(),
                        KeyCode::PageDown => app.select_page_down(),
                        KeyCode::PageUp => app.select_page_up(),
                        // Letters go to the query; gg/G only work on an empty query
                        KeyCode::Char('g') if app.query.is_empty() => app.pending_key = Some('g'),
                        KeyCode::Char('G') if app.query.is_empty() => app.select_last(),
                        KeyCode::Char('?') => app.show_help(),
                        KeyCode::Char(c) => app.query.push(c),
                        KeyCode::Backspace => {
                            app.query.pop();
                        }
                        KeyCode::F(1) => app.show_help(),
                        KeyCode::F(5) => app.reload(),
                        _ => {}
                    },
                    _ => {}
                }
            }
            app::Mode::Preview => match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.scroll_preview_page_down(),
                (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.scroll_preview_page_up(),
                (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.toggle_preview(),
                (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.toggle_preview(),
                    KeyCode::Down | KeyCode::Char('j') => app.scroll_preview_down(),
                    KeyCode::Up | KeyCode::Char('k') => app.scroll_preview_up(),
                    KeyCode::PageDown => app.scroll_preview_page_down(),
                    KeyCode::PageUp => app.scroll_preview_page_up(),
                    KeyCode::Char('g') => app.scroll_preview_to_top(),
                    KeyCode::Char('n') => app.select_next(),
                    KeyCode::Char('N') | KeyCode::Char('p') => app.select_prev(),
                    KeyCode::Char('?') | KeyCode::F(1) => app.show_help(),
                    _ => {}
                },
                _ => {}
            },
        }
    }
}
