use crate::app::{App, AppScreen};
use crate::models::JuryPulse;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use tokio::sync::Mutex;

const GAUGE_WIDTH: usize = 21;

#[derive(Debug, Default)]
pub struct JuryState {
    pub pulse: Option<JuryPulse>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Renders a juror's leaning on a fixed-width gauge. -1.0 pins the marker to
/// the left (defense), 1.0 to the right (prosecution), 0.0 to the center tick.
fn leaning_gauge(leaning: f32, width: usize) -> String {
    let width = width.max(3);
    let clamped = leaning.clamp(-1.0, 1.0);
    let pos = (((clamped + 1.0) / 2.0) * (width - 1) as f32).round() as usize;
    let center = (width - 1) / 2;

    (0..width)
        .map(|i| {
            if i == pos {
                '●'
            } else if i == center {
                '┼'
            } else {
                '·'
            }
        })
        .collect()
}

pub fn draw_jury(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .margin(1)
        .split(area);

    draw_jury_header(f, app, chunks[0]);
    draw_juror_list(f, app, chunks[1]);
    draw_summary(f, app, chunks[2]);
    app.status_indicator.render(f, chunks[3]);

    let hints = Paragraph::new(Line::from(Span::styled(
        "r refresh   esc back",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(hints, chunks[4]);
}

fn draw_jury_header(f: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(pulse) = &app.jury.pulse {
        format!(
            "{} jurors, generated {}",
            pulse.jurors.len(),
            pulse.generated_at.format("%Y-%m-%d %H:%M")
        )
    } else if app.jury.loading {
        String::new()
    } else {
        "press r to load".to_string()
    };

    let header = Paragraph::new(format!("case: {}   {}", app.case_id, status))
        .block(Block::default().title(" jury sentiment ").borders(Borders::ALL))
        .style(Style::default().fg(Color::White));
    f.render_widget(header, area);
}

fn draw_juror_list(f: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(err) = &app.jury.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(pulse) = &app.jury.pulse {
        lines.push(Line::from(Span::styled(
            format!("{:>26}defense {:^7} prosecution", "", ""),
            dim,
        )));
        for juror in &pulse.jurors {
            let gauge_style = if juror.leaning < -0.15 {
                Style::default().fg(Color::Blue)
            } else if juror.leaning > 0.15 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Gray)
            };

            lines.push(Line::from(vec![
                Span::styled(format!("seat {:>2}  ", juror.seat), dim),
                Span::styled(
                    format!("{:<16}", juror.name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(leaning_gauge(juror.leaning, GAUGE_WIDTH), gauge_style),
                Span::styled(format!("  {:>3.0}%", juror.confidence * 100.0), dim),
            ]));

            if let Some(note) = &juror.note {
                lines.push(Line::from(Span::styled(
                    format!("         {}", note),
                    dim.add_modifier(Modifier::ITALIC),
                )));
            }
        }
    } else if !app.jury.loading {
        lines.push(Line::from(Span::styled("no sentiment data yet", dim)));
    }

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect) {
    let text = app
        .jury
        .pulse
        .as_ref()
        .map(|p| p.summary.as_str())
        .unwrap_or("");

    let para = Paragraph::new(text)
        .block(Block::default().title(" read ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

pub fn handle_jury_input(app: &mut App, key: KeyEvent, app_arc: Arc<Mutex<App>>) {
    match key.code {
        KeyCode::Esc => {
            app.screen = AppScreen::Splash;
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if c == 'c' {
                    app.screen = AppScreen::QuitConfirm;
                }
                return;
            }
            if c == 'r' && !app.jury.loading {
                app.jury.loading = true;
                tokio::spawn(load_sentiment(app_arc));
            }
        }
        _ => {}
    }
}

pub async fn load_sentiment(app: Arc<Mutex<App>>) {
    let (endpoints, case_id) = {
        let mut guard = app.lock().await;
        guard.jury.error = None;
        guard.status_indicator.set_thinking(true);
        guard.status_indicator.set_status("reading the room...");
        guard.logs.add("jury: loading sentiment".to_string());
        (guard.endpoints.clone(), guard.case_id.clone())
    };

    match endpoints.jury_sentiment(&case_id).await {
        Ok(pulse) => {
            let mut guard = app.lock().await;
            guard
                .logs
                .add(format!("jury: sentiment for {} jurors", pulse.jurors.len()));
            guard.jury.pulse = Some(pulse);
            guard.jury.loading = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();
        }
        Err(e) => {
            log::error!("jury sentiment load failed: {}", e);
            let mut guard = app.lock().await;
            guard.logs.add(format!("jury: load failed: {}", e));
            guard.jury.error = Some(e.to_string());
            guard.jury.loading = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();
        }
    }
}
