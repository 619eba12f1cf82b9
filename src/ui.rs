use crate::app::{App, AppScreen};
use crate::chat_view::{draw_chat, handle_chat_input};
use crate::constants::UI_TICK_MS;
use crate::evidence_view::{self, draw_evidence, handle_evidence_input};
use crate::jury_view::{self, draw_jury, handle_jury_input};
use crate::service_view::{draw_service, handle_service_input};
use crate::splash_screen::SplashScreenAction;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode, KeyEvent,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, Mutex};

enum Event {
    Input(CEvent),
    Tick,
}

/// Sets up the terminal, runs the main loop and restores the terminal on the
/// way out, whatever happened inside.
pub async fn run_ui(app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app_arc = Arc::new(Mutex::new(app));
    let res = run_app(&mut terminal, app_arc).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app_arc: Arc<Mutex<App>>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            let timeout = Duration::from_millis(UI_TICK_MS);
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if tx.send(Event::Input(ev)).await.is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(UI_TICK_MS) {
                if tx.send(Event::Tick).await.is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        {
            let mut guard = app_arc.lock().await;
            terminal.draw(|f| ui(f, &mut guard))?;
            if guard.screen == AppScreen::Quit {
                break;
            }
        }

        match rx.recv().await {
            Some(Event::Input(CEvent::Key(key))) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let mut guard = app_arc.lock().await;
                match guard.screen {
                    AppScreen::Splash => handle_splash_input(&mut guard, key, app_arc.clone()),
                    AppScreen::Chat => handle_chat_input(&mut guard, key, app_arc.clone()),
                    AppScreen::Evidence => handle_evidence_input(&mut guard, key, app_arc.clone()),
                    AppScreen::Jury => handle_jury_input(&mut guard, key, app_arc.clone()),
                    AppScreen::Service => handle_service_input(&mut guard, key),
                    AppScreen::QuitConfirm => handle_quit_confirm_input(&mut guard, key),
                    AppScreen::Quit => {}
                }
            }
            Some(Event::Input(_)) => {}
            Some(Event::Tick) => {
                let mut guard = app_arc.lock().await;
                guard.tick();
            }
            None => break,
        }
    }

    Ok(())
}

fn handle_splash_input(app: &mut App, key: KeyEvent, app_arc: Arc<Mutex<App>>) {
    if let Some(action) = app.splash.handle_input(key) {
        match action {
            SplashScreenAction::OpenChat => {
                app.screen = AppScreen::Chat;
            }
            SplashScreenAction::OpenEvidence => {
                app.screen = AppScreen::Evidence;
                if app.evidence.documents.is_empty() && !app.evidence.loading {
                    app.evidence.loading = true;
                    tokio::spawn(evidence_view::load_documents(app_arc));
                }
            }
            SplashScreenAction::OpenJury => {
                app.screen = AppScreen::Jury;
                if app.jury.pulse.is_none() && !app.jury.loading {
                    app.jury.loading = true;
                    tokio::spawn(jury_view::load_sentiment(app_arc));
                }
            }
            SplashScreenAction::OpenService => {
                app.screen = AppScreen::Service;
            }
            SplashScreenAction::Quit => {
                app.screen = AppScreen::Quit;
            }
        }
    }
}

fn handle_quit_confirm_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.screen = AppScreen::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.screen = AppScreen::Splash;
        }
        _ => {}
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    match app.screen {
        AppScreen::Splash => app.splash.draw(f, area),
        AppScreen::Chat => draw_chat(f, app),
        AppScreen::Evidence => draw_evidence(f, app),
        AppScreen::Jury => draw_jury(f, app),
        AppScreen::Service => draw_service(f, app),
        AppScreen::QuitConfirm => draw_quit_confirm(f),
        AppScreen::Quit => {}
    }
}

fn draw_quit_confirm(f: &mut Frame) {
    let area = f.area();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(5),
            Constraint::Percentage(40),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(vertical[1]);

    let box_area = horizontal[1];
    f.render_widget(Clear, box_area);

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "leave docket?",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "y / enter to quit   n / esc to stay",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(para, box_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoints;
    use crossterm::event::KeyModifiers;

    #[tokio::test]
    async fn test_first_evidence_open_marks_load_in_flight() {
        let endpoints =
            Endpoints::new("http://127.0.0.1:9".to_string(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));

        let mut guard = app.lock().await;
        handle_splash_input(
            &mut guard,
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            app.clone(),
        );
        handle_splash_input(
            &mut guard,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            app.clone(),
        );

        assert_eq!(guard.screen, AppScreen::Evidence);
        assert!(guard.evidence.loading);
    }
}
