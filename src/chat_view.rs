use crate::app::{App, AppScreen};
use crate::chat::{self, ChatMessage, MessageRole};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use textwrap::wrap;
use tokio::sync::Mutex;
use unicode_width::UnicodeWidthStr;

pub fn draw_chat(f: &mut Frame, app: &App) {
    let size = f.area();
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .margin(1)
        .split(size);

    let chat_vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(horizontal_chunks[0]);

    draw_messages(f, app, chat_vertical_chunks[0]);
    app.status_indicator.render(f, chat_vertical_chunks[1]);
    draw_input(f, app, chat_vertical_chunks[2]);
    draw_logs(f, app, horizontal_chunks[1], size);
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for message in app.chat.log.messages() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(render_message(message, area));
    }

    // scroll counts lines up from the bottom; 0 stays pinned to the newest
    // text so an in-progress reveal remains visible.
    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    let from_bottom = app.chat.scroll.min(max_scroll);
    let top = max_scroll - from_bottom;

    let msgs_para = Paragraph::new(lines)
        .block(Block::default())
        .wrap(Wrap { trim: true });
    f.render_widget(msgs_para.scroll((top, 0)), area);
}

fn render_message(message: &ChatMessage, area: Rect) -> Vec<Line<'static>> {
    let (style, who, indent) = match message.role {
        MessageRole::User => (
            Style::default().fg(Color::Rgb(230, 200, 120)),
            "you",
            "  ",
        ),
        MessageRole::System => (
            Style::default().fg(Color::Rgb(140, 220, 170)),
            "agent",
            "",
        ),
    };

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("{}┌─ ", indent), style),
        Span::styled(
            message.timestamp.format("%H:%M").to_string(),
            style.add_modifier(Modifier::DIM),
        ),
        Span::styled(format!(" {}", who), style.add_modifier(Modifier::DIM)),
    ]));

    let wrap_width = (area.width as usize).saturating_sub(4).max(1);
    let mut pieces: Vec<String> = Vec::new();
    for source_line in message.content.lines() {
        if source_line.is_empty() {
            pieces.push(String::new());
        } else {
            for piece in wrap(source_line, wrap_width) {
                pieces.push(piece.to_string());
            }
        }
    }
    if pieces.is_empty() {
        pieces.push(String::new());
    }

    let last = pieces.len() - 1;
    for (i, piece) in pieces.into_iter().enumerate() {
        let mut spans = vec![
            Span::styled(format!("{}│ ", indent), style),
            Span::styled(piece, style),
        ];
        if message.is_typing && i == last {
            spans.push(Span::styled(
                "▌",
                style.add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(format!("{}╰─", indent), style)));
    lines
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    // On short terminals the layout can squeeze this pane below its three rows.
    if area.height == 0 {
        return;
    }

    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator.clone(),
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let prefix_style = if app.chat.busy {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Line::from(vec![
        Span::styled("→ ", prefix_style),
        Span::styled(app.chat.input.as_str(), Style::default().fg(Color::White)),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = app.chat.input.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        },
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: (area.y + area.height).saturating_sub(1),
            width: area.width,
            height: 1,
        },
    );

    if area.height >= 3 {
        let cursor_x = area.x + 2 + text_width - scroll_offset;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect, size: Rect) {
    let log_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(area);

    let vsep = "│".repeat(size.height.saturating_sub(2) as usize);
    f.render_widget(
        Paragraph::new(Span::raw(vsep)).style(Style::default().fg(Color::DarkGray)),
        Rect {
            x: area.x.saturating_sub(1),
            y: 1,
            width: 1,
            height: size.height.saturating_sub(2),
        },
    );

    let log_lines: Vec<Line> = app
        .logs
        .entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::DarkGray)),
                Span::raw(entry.as_str()),
            ])
        })
        .collect();

    let total_log_lines = log_lines.len() as u16;
    let log_available_height = log_chunks[0].height;
    let max_log_scroll = total_log_lines.saturating_sub(log_available_height);
    let logs_scroll = app.logs.scroll_offset.min(max_log_scroll);

    let logs_para = Paragraph::new(log_lines)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    f.render_widget(logs_para.scroll((logs_scroll, 0)), log_chunks[0]);
}

pub fn handle_chat_input(app: &mut App, key: KeyEvent, app_arc: Arc<Mutex<App>>) {
    match key.code {
        KeyCode::Esc => {
            app.screen = AppScreen::Splash;
        }
        KeyCode::Enter => {
            if let Some(text) = app.chat.begin_submit() {
                tokio::spawn(chat::send_chat_message(app_arc, text));
            }
        }
        KeyCode::PageUp => {
            app.chat.scroll = app.chat.scroll.saturating_add(5);
        }
        KeyCode::PageDown => {
            app.chat.scroll = app.chat.scroll.saturating_sub(5);
        }
        KeyCode::Backspace => {
            app.chat.input.pop();
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.screen = AppScreen::QuitConfirm,
                    'u' => app.chat.scroll = app.chat.scroll.saturating_add(5),
                    'd' => app.chat.scroll = app.chat.scroll.saturating_sub(5),
                    _ => {}
                }
            } else {
                app.chat.input.push(c);
            }
        }
        _ => {}
    }
}
