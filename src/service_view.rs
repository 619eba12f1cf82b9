use crate::app::{App, AppScreen};
use chrono::{DateTime, Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Pending,
    Attempted,
    Served,
    Evading,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::Attempted => "attempted",
            ServiceStatus::Served => "served",
            ServiceStatus::Evading => "evading",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "○",
            ServiceStatus::Attempted => "◐",
            ServiceStatus::Served => "●",
            ServiceStatus::Evading => "✗",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ServiceStatus::Pending => Color::Yellow,
            ServiceStatus::Attempted => Color::Cyan,
            ServiceStatus::Served => Color::Green,
            ServiceStatus::Evading => Color::Red,
        }
    }
}

/// One person who must be served with process for this case.
#[derive(Debug, Clone)]
pub struct ServiceTarget {
    pub name: String,
    pub role: String,
    pub address: String,
    pub status: ServiceStatus,
    pub attempts: u8,
    pub last_attempt: Option<DateTime<Utc>>,
    pub process_server: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ServiceStatus),
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(ServiceStatus::Pending),
            StatusFilter::Only(ServiceStatus::Pending) => {
                StatusFilter::Only(ServiceStatus::Attempted)
            }
            StatusFilter::Only(ServiceStatus::Attempted) => {
                StatusFilter::Only(ServiceStatus::Served)
            }
            StatusFilter::Only(ServiceStatus::Served) => StatusFilter::Only(ServiceStatus::Evading),
            StatusFilter::Only(ServiceStatus::Evading) => StatusFilter::All,
        }
    }

    pub fn matches(&self, status: ServiceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

#[derive(Debug)]
pub struct ServiceState {
    pub targets: Vec<ServiceTarget>,
    pub filter: StatusFilter,
    pub selected: usize,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            targets: sample_service_targets(),
            filter: StatusFilter::All,
            selected: 0,
        }
    }

    pub fn filtered(&self) -> Vec<&ServiceTarget> {
        self.targets
            .iter()
            .filter(|t| self.filter.matches(t.status))
            .collect()
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn selected_target(&self) -> Option<&ServiceTarget> {
        self.filtered().get(self.selected).copied()
    }
}

/// Seed roster while the service-tracking backend is still on paper. Served
/// locally so the tracker works without any case backend at all.
fn sample_service_targets() -> Vec<ServiceTarget> {
    let now = Utc::now();
    vec![
        ServiceTarget {
            name: "Marcus Webb".to_string(),
            role: "defendant".to_string(),
            address: "114 Harrow Court, Apt 3B".to_string(),
            status: ServiceStatus::Served,
            attempts: 2,
            last_attempt: Some(now - Duration::days(12)),
            process_server: "D. Okafor".to_string(),
            notes: Some("personal service at residence, signed receipt".to_string()),
        },
        ServiceTarget {
            name: "Lena Webb".to_string(),
            role: "co-defendant".to_string(),
            address: "114 Harrow Court, Apt 3B".to_string(),
            status: ServiceStatus::Evading,
            attempts: 5,
            last_attempt: Some(now - Duration::days(2)),
            process_server: "D. Okafor".to_string(),
            notes: Some("lights on, no answer; neighbor says she works nights".to_string()),
        },
        ServiceTarget {
            name: "Prentiss Storage LLC".to_string(),
            role: "corporate defendant".to_string(),
            address: "c/o registered agent, 900 Pike St Ste 400".to_string(),
            status: ServiceStatus::Served,
            attempts: 1,
            last_attempt: Some(now - Duration::days(20)),
            process_server: "Cascade Legal Couriers".to_string(),
            notes: None,
        },
        ServiceTarget {
            name: "Dr. Imani Reyes".to_string(),
            role: "expert witness".to_string(),
            address: "County Medical Examiner's Office".to_string(),
            status: ServiceStatus::Attempted,
            attempts: 1,
            last_attempt: Some(now - Duration::days(4)),
            process_server: "D. Okafor".to_string(),
            notes: Some("out of office until the 28th per front desk".to_string()),
        },
        ServiceTarget {
            name: "Tomas Gutierrez".to_string(),
            role: "witness".to_string(),
            address: "last known: 47 Alder Row".to_string(),
            status: ServiceStatus::Pending,
            attempts: 0,
            last_attempt: None,
            process_server: "unassigned".to_string(),
            notes: Some("skip trace ordered".to_string()),
        },
        ServiceTarget {
            name: "First Meridian Bank".to_string(),
            role: "records custodian".to_string(),
            address: "legal dept, 1 Meridian Plaza".to_string(),
            status: ServiceStatus::Pending,
            attempts: 0,
            last_attempt: None,
            process_server: "Cascade Legal Couriers".to_string(),
            notes: None,
        },
    ]
}

pub fn draw_service(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(6),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .margin(1)
        .split(area);

    draw_service_header(f, app, chunks[0]);
    draw_target_list(f, app, chunks[1]);
    draw_target_detail(f, app, chunks[2]);

    let hints = Paragraph::new(Line::from(Span::styled(
        "↑/↓ select   f filter   esc back",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(hints, chunks[3]);
}

fn draw_service_header(f: &mut Frame, app: &App, area: Rect) {
    let served = app
        .service
        .targets
        .iter()
        .filter(|t| t.status == ServiceStatus::Served)
        .count();

    let header = Paragraph::new(format!(
        "case: {}   {}/{} served   filter: {}",
        app.case_id,
        served,
        app.service.targets.len(),
        app.service.filter.label(),
    ))
    .block(
        Block::default()
            .title(" service of process ")
            .borders(Borders::ALL),
    )
    .style(Style::default().fg(Color::White));
    f.render_widget(header, area);
}

fn draw_target_list(f: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let filtered = app.service.filtered();

    let mut lines: Vec<Line> = Vec::new();
    if filtered.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("no targets with status '{}'", app.service.filter.label()),
            dim,
        )));
    }
    for (i, target) in filtered.iter().enumerate() {
        let selected = i == app.service.selected;
        let marker = if selected { "▶ " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let last = target
            .last_attempt
            .map(|t| t.format("%m-%d").to_string())
            .unwrap_or_else(|| "--".to_string());

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Magenta)),
            Span::styled(
                target.status.icon(),
                Style::default().fg(target.status.color()),
            ),
            Span::raw(" "),
            Span::styled(format!("{:<22}", target.name), name_style),
            Span::styled(format!("{:<20}", target.role), dim),
            Span::styled(
                format!("{:<10}", target.status.as_str()),
                Style::default().fg(target.status.color()),
            ),
            Span::styled(
                format!("attempts {:>2}  last {}", target.attempts, last),
                dim,
            ),
        ]));
    }

    let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_target_detail(f: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let lines: Vec<Line> = match app.service.selected_target() {
        Some(target) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("address: ", dim),
                    Span::raw(target.address.as_str()),
                ]),
                Line::from(vec![
                    Span::styled("process server: ", dim),
                    Span::raw(target.process_server.as_str()),
                ]),
            ];
            if let Some(notes) = &target.notes {
                lines.push(Line::from(vec![
                    Span::styled("notes: ", dim),
                    Span::raw(notes.as_str()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled("nothing selected", dim))],
    };

    let para = Paragraph::new(lines)
        .block(Block::default().title(" detail ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

pub fn handle_service_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.screen = AppScreen::Splash;
        }
        KeyCode::Up => app.service.select_prev(),
        KeyCode::Down => app.service.select_next(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if c == 'c' {
                    app.screen = AppScreen::QuitConfirm;
                }
                return;
            }
            if c == 'f' {
                app.service.cycle_filter();
            }
        }
        _ => {}
    }
}
