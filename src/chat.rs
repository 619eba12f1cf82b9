use crate::app::App;
use crate::constants::{CHAT_ERROR_MESSAGE, TYPING_TICK_MS};
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    System,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    pub is_typing: bool,
    pub timestamp: DateTime<Local>,
}

/// What a single reveal tick did to its target message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Advanced,
    Finished,
    /// The message is gone or no longer under reveal; the timer should stop.
    Orphaned,
}

/// Append-only transcript. Messages are never edited or removed except by
/// `advance_reveal`, which grows a typing message one character at a time.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    last_id: MessageId,
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Millisecond timestamps collide when messages land in the same tick,
    /// so bump past the previous id to keep ids strictly increasing.
    fn allocate_id(&mut self) -> MessageId {
        let now = Utc::now().timestamp_millis() as u64;
        let id = now.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    pub fn push_user(&mut self, content: String) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage {
            id,
            role: MessageRole::User,
            content,
            is_typing: false,
            timestamp: Local::now(),
        });
        id
    }

    pub fn push_system(&mut self, content: String) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage {
            id,
            role: MessageRole::System,
            content,
            is_typing: false,
            timestamp: Local::now(),
        });
        id
    }

    /// Appends an empty system message that a reveal task will fill in.
    pub fn push_system_typing(&mut self) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage {
            id,
            role: MessageRole::System,
            content: String::new(),
            is_typing: true,
            timestamp: Local::now(),
        });
        id
    }

    /// Moves the reveal of message `id` forward by one character of
    /// `full_text`. The message content is always a prefix of `full_text`;
    /// once they are equal the typing flag is cleared and the reveal is done.
    pub fn advance_reveal(&mut self, id: MessageId, full_text: &str) -> RevealStep {
        let msg = match self.messages.iter_mut().find(|m| m.id == id) {
            Some(msg) => msg,
            None => return RevealStep::Orphaned,
        };

        if !msg.is_typing {
            return RevealStep::Orphaned;
        }

        let rest = match full_text.get(msg.content.len()..) {
            Some(rest) => rest,
            None => {
                // Content no longer lines up with the reveal text.
                msg.is_typing = false;
                return RevealStep::Orphaned;
            }
        };

        match rest.chars().next() {
            Some(next_char) => {
                msg.content.push(next_char);
                if msg.content.len() == full_text.len() {
                    msg.is_typing = false;
                    RevealStep::Finished
                } else {
                    RevealStep::Advanced
                }
            }
            None => {
                msg.is_typing = false;
                RevealStep::Finished
            }
        }
    }
}

/// Conversation panel state: the transcript plus the input line and the
/// in-flight flag that serializes requests.
#[derive(Debug, Default)]
pub struct ChatState {
    pub log: ChatLog,
    pub input: String,
    pub scroll: u16,
    pub busy: bool,
}

impl ChatState {
    /// Validates and commits the current input line. Returns the text to send,
    /// or `None` when the input is blank or a request is already in flight.
    /// On success the user message is already in the transcript.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }

        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }

        self.log.push_user(trimmed.clone());
        self.input.clear();
        self.scroll = 0;
        self.busy = true;
        Some(trimmed)
    }
}

/// Sends one chat message to the case agent and settles the busy flag when
/// the request finishes, success or not. On success the reply is revealed
/// incrementally by a background task.
pub async fn send_chat_message(app: Arc<Mutex<App>>, text: String) {
    let (endpoints, case_id) = {
        let mut guard = app.lock().await;
        guard.status_indicator.set_thinking(true);
        guard
            .logs
            .add(format!("chat: sending message ({} chars)", text.chars().count()));
        (guard.endpoints.clone(), guard.case_id.clone())
    };

    match endpoints.send_chat_message(&text, &case_id).await {
        Ok(reply) => {
            let id = {
                let mut guard = app.lock().await;
                guard
                    .logs
                    .add(format!("chat: reply received ({} chars)", reply.chars().count()));
                guard.status_indicator.set_thinking(false);
                let id = guard.chat.log.push_system_typing();
                guard.chat.busy = false;
                id
            };
            spawn_reveal(app.clone(), id, reply);
        }
        Err(e) => {
            log::error!("chat request failed: {}", e);
            let mut guard = app.lock().await;
            guard.logs.add(format!("chat: request failed: {}", e));
            guard.status_indicator.set_thinking(false);
            guard.chat.log.push_system(CHAT_ERROR_MESSAGE.to_string());
            guard.chat.busy = false;
        }
    }
}

/// Drives the reveal of message `id` at a fixed cadence until it finishes.
/// Each message gets its own task, so overlapping reveals do not interfere.
pub fn spawn_reveal(app: Arc<Mutex<App>>, id: MessageId, full_text: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(Duration::from_millis(TYPING_TICK_MS)).await;

            let step = {
                let mut guard = app.lock().await;
                guard.chat.log.advance_reveal(id, &full_text)
            };

            match step {
                RevealStep::Advanced => {}
                RevealStep::Finished => {
                    log::debug!("reveal finished for message {}", id);
                    break;
                }
                RevealStep::Orphaned => {
                    log::warn!("reveal stopped: message {} missing or no longer typing", id);
                    break;
                }
            }
        }
    })
}
