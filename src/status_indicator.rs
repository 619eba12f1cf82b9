use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One-line status strip: a spinner while the agent is working, plus an
/// optional short status message set by whichever view is active.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    thinking: bool,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn clear_status(&mut self) {
        self.status_text.clear();
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spinner = if self.thinking {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        };

        let text = if !self.status_text.is_empty() {
            self.status_text.as_str()
        } else if self.thinking {
            "consulting case agent..."
        } else {
            ""
        };

        let color = if self.thinking {
            Color::DarkGray
        } else {
            Color::Yellow
        };

        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(text, Style::default().fg(color)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
