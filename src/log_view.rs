use crate::constants::MAX_LOG_ENTRIES;
use chrono::Local;

/// Rolling buffer of activity lines shown in the side pane.
#[derive(Debug, Default)]
pub struct LogView {
    pub entries: Vec<String>,
    pub scroll_offset: u16,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: String) {
        let stamped = format!("[{}] {}", Local::now().format("%H:%M:%S"), entry);
        self.entries.push(stamped);
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_view_caps_entries() {
        let mut logs = LogView::new();
        for i in 0..(MAX_LOG_ENTRIES + 25) {
            logs.add(format!("entry {}", i));
        }

        assert_eq!(logs.entries.len(), MAX_LOG_ENTRIES);
        // Oldest entries fall off the front.
        assert!(logs.entries[0].ends_with("entry 25"));
        assert!(logs.entries.last().unwrap().ends_with(&format!(
            "entry {}",
            MAX_LOG_ENTRIES + 24
        )));
    }
}
