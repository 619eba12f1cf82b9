// UI constants
pub const UI_TICK_MS: u64 = 50;
pub const MAX_LOG_ENTRIES: usize = 200;

// Chat constants
pub const TYPING_TICK_MS: u64 = 20;
pub const CHAT_ERROR_MESSAGE: &str =
    "I couldn't reach the case agent just now. Please try again in a moment.";

// Backend defaults
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CASE_ID: &str = "case-0001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
