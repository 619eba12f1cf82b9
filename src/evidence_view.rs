use crate::app::{App, AppScreen};
use crate::models::{CaseDocument, ForensicReport, IntegrityVerdict};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Evidence locker state: the document list plus the latest forensic report.
#[derive(Debug, Default)]
pub struct EvidenceState {
    pub documents: Vec<CaseDocument>,
    pub table: TableState,
    /// Both flags are set at the spawn site, before the task runs, and
    /// cleared by the task when it settles.
    pub loading: bool,
    pub analyzing: bool,
    pub report: Option<ForensicReport>,
    pub error: Option<String>,
}

impl EvidenceState {
    pub fn select_next(&mut self) {
        if self.documents.is_empty() {
            return;
        }
        let next = match self.table.selected() {
            Some(i) => (i + 1) % self.documents.len(),
            None => 0,
        };
        self.table.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.documents.is_empty() {
            return;
        }
        let prev = match self.table.selected() {
            Some(0) | None => self.documents.len() - 1,
            Some(i) => i - 1,
        };
        self.table.select(Some(prev));
    }

    pub fn selected_document(&self) -> Option<&CaseDocument> {
        self.table.selected().and_then(|i| self.documents.get(i))
    }
}

pub fn draw_evidence(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(9),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .margin(1)
        .split(area);

    draw_header(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);
    draw_report(f, app, chunks[2]);
    app.status_indicator.render(f, chunks[3]);

    let hints = Paragraph::new(Line::from(Span::styled(
        "↑/↓ select   r refresh   a analyze   esc back",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(hints, chunks[4]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "case: {}   {} documents on file",
        app.case_id,
        app.evidence.documents.len()
    ))
    .block(Block::default().title(" evidence locker ").borders(Borders::ALL))
    .style(Style::default().fg(Color::White));
    f.render_widget(header, area);
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .evidence
        .documents
        .iter()
        .map(|doc| {
            let sha = doc
                .sha256
                .as_deref()
                .map(|s| s.get(..8).unwrap_or(s))
                .unwrap_or("-");
            Row::new(vec![
                doc.added_at.format("%m-%d").to_string(),
                doc.title.clone(),
                doc.kind.clone(),
                doc.custodian.clone(),
                sha.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Percentage(25),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["added", "title", "kind", "custodian", "sha256"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.evidence.table);
}

fn draw_report(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" forensics ").borders(Borders::ALL);

    let lines: Vec<Line> = if let Some(err) = &app.evidence.error {
        vec![Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        ))]
    } else if app.evidence.analyzing {
        vec![Line::from(Span::styled(
            "analyzing document...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else if let Some(report) = &app.evidence.report {
        let verdict_style = match report.integrity {
            IntegrityVerdict::Verified => Style::default().fg(Color::Green),
            IntegrityVerdict::Altered => Style::default().fg(Color::Red),
            IntegrityVerdict::Inconclusive => Style::default().fg(Color::Yellow),
        };
        let mut lines = vec![
            Line::from(vec![
                Span::raw(format!("{}  ", report.document_id)),
                Span::styled(
                    report.integrity.as_str(),
                    verdict_style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  examined {}", report.examined_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(Span::styled(
                format!("sha256: {}", report.sha256),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if report.findings.is_empty() {
            lines.push(Line::from(Span::raw("no findings")));
        } else {
            for finding in &report.findings {
                lines.push(Line::from(vec![
                    Span::styled("• ", Style::default().fg(Color::DarkGray)),
                    Span::raw(finding.as_str()),
                ]));
            }
        }
        lines
    } else {
        vec![Line::from(Span::styled(
            "press a to run forensic analysis on the selected document",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, area);
}

pub fn handle_evidence_input(app: &mut App, key: KeyEvent, app_arc: Arc<Mutex<App>>) {
    match key.code {
        KeyCode::Esc => {
            app.screen = AppScreen::Splash;
        }
        KeyCode::Up => app.evidence.select_prev(),
        KeyCode::Down => app.evidence.select_next(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if c == 'c' {
                    app.screen = AppScreen::QuitConfirm;
                }
                return;
            }
            match c {
                'r' => {
                    if !app.evidence.loading {
                        app.evidence.loading = true;
                        tokio::spawn(load_documents(app_arc));
                    }
                }
                'a' => {
                    if app.evidence.analyzing {
                        return;
                    }
                    if let Some(doc) = app.evidence.selected_document() {
                        let document_id = doc.id.clone();
                        app.evidence.analyzing = true;
                        tokio::spawn(run_analysis(app_arc, document_id));
                    }
                }
                _ => {}
            }
        }
        _ => {}
    }
}

pub async fn load_documents(app: Arc<Mutex<App>>) {
    let (endpoints, case_id) = {
        let mut guard = app.lock().await;
        guard.evidence.error = None;
        guard.status_indicator.set_thinking(true);
        guard.status_indicator.set_status("loading case documents...");
        guard.logs.add("evidence: loading documents".to_string());
        (guard.endpoints.clone(), guard.case_id.clone())
    };

    match endpoints.list_documents(&case_id).await {
        Ok(documents) => {
            let mut guard = app.lock().await;
            guard
                .logs
                .add(format!("evidence: loaded {} documents", documents.len()));
            guard.evidence.documents = documents;
            guard.evidence.loading = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();

            let len = guard.evidence.documents.len();
            match guard.evidence.table.selected() {
                None if len > 0 => guard.evidence.table.select(Some(0)),
                Some(sel) if sel >= len => {
                    guard
                        .evidence
                        .table
                        .select(if len == 0 { None } else { Some(len - 1) });
                }
                _ => {}
            }
        }
        Err(e) => {
            log::error!("document load failed: {}", e);
            let mut guard = app.lock().await;
            guard.logs.add(format!("evidence: load failed: {}", e));
            guard.evidence.error = Some(e.to_string());
            guard.evidence.loading = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();
        }
    }
}

pub async fn run_analysis(app: Arc<Mutex<App>>, document_id: String) {
    let endpoints = {
        let mut guard = app.lock().await;
        guard.evidence.error = None;
        guard.status_indicator.set_thinking(true);
        guard.status_indicator.set_status("running forensic analysis...");
        guard
            .logs
            .add(format!("forensics: analyzing {}", document_id));
        guard.endpoints.clone()
    };

    match endpoints.analyze_document(&document_id).await {
        Ok(report) => {
            let mut guard = app.lock().await;
            guard.logs.add(format!(
                "forensics: {} is {}",
                report.document_id,
                report.integrity.as_str()
            ));
            guard.evidence.report = Some(report);
            guard.evidence.analyzing = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();
        }
        Err(e) => {
            log::error!("forensic analysis failed: {}", e);
            let mut guard = app.lock().await;
            guard.logs.add(format!("forensics: analysis failed: {}", e));
            guard.evidence.error = Some(e.to_string());
            guard.evidence.analyzing = false;
            guard.status_indicator.set_thinking(false);
            guard.status_indicator.clear_status();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoints;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn doc(id: &str) -> CaseDocument {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("document {}", id),
            "kind": "exhibit",
            "custodian": "clerk",
            "added_at": "2026-06-20T10:00:00Z",
            "sha256": null
        }))
        .unwrap()
    }

    fn screen_text(app: &mut App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_evidence(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_selection_wraps_both_directions() {
        let mut state = EvidenceState::default();
        state.documents = vec![doc("a"), doc("b"), doc("c")];

        state.select_next();
        assert_eq!(state.selected_document().unwrap().id, "a");
        state.select_prev();
        assert_eq!(state.selected_document().unwrap().id, "c");
        state.select_next();
        assert_eq!(state.selected_document().unwrap().id, "a");
    }

    #[test]
    fn test_selection_noop_on_empty_list() {
        let mut state = EvidenceState::default();
        state.select_next();
        state.select_prev();
        assert!(state.selected_document().is_none());
    }

    #[tokio::test]
    async fn test_load_documents_selects_first_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {
                        "id": "doc-1",
                        "title": "Chain of custody form",
                        "kind": "form",
                        "custodian": "clerk",
                        "added_at": "2026-06-20T10:00:00Z",
                        "sha256": "aa11bb22"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));

        load_documents(app.clone()).await;

        let guard = app.lock().await;
        assert_eq!(guard.evidence.documents.len(), 1);
        assert_eq!(guard.evidence.table.selected(), Some(0));
        assert!(!guard.evidence.loading);
        assert!(guard.evidence.error.is_none());
    }

    #[tokio::test]
    async fn test_load_documents_failure_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/documents"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));

        load_documents(app.clone()).await;

        let guard = app.lock().await;
        assert!(guard.evidence.documents.is_empty());
        assert!(!guard.evidence.loading);
        assert!(guard.evidence.error.is_some());
    }

    #[tokio::test]
    async fn test_load_drives_shared_status_strip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/documents"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "documents": [] }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));
        let task = tokio::spawn(load_documents(app.clone()));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            {
                let mut guard = app.lock().await;
                if screen_text(&mut guard).contains("loading case documents") {
                    break;
                }
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "status strip never showed the load"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        task.await.unwrap();
        let mut guard = app.lock().await;
        assert!(!screen_text(&mut guard).contains("loading case documents"));
    }

    #[tokio::test]
    async fn test_second_refresh_while_loading_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));

        {
            let mut guard = app.lock().await;
            let press = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
            handle_evidence_input(&mut guard, press, app.clone());
            assert!(guard.evidence.loading);
            handle_evidence_input(&mut guard, press, app.clone());
        }

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            {
                let guard = app.lock().await;
                if !guard.evidence.loading {
                    break;
                }
            }
            assert!(tokio::time::Instant::now() < deadline, "load never settled");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        server.verify().await;
    }

    #[tokio::test]
    async fn test_analyze_key_marks_analysis_in_flight_immediately() {
        let endpoints =
            Endpoints::new("http://127.0.0.1:9".to_string(), String::new(), 5).unwrap();
        let app = Arc::new(Mutex::new(App::new(endpoints, "case-0001".to_string())));

        let mut guard = app.lock().await;
        guard.evidence.documents = vec![doc("a")];
        guard.evidence.table.select(Some(0));
        handle_evidence_input(
            &mut guard,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE),
            app.clone(),
        );
        assert!(guard.evidence.analyzing);
    }
}
