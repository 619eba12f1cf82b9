use crate::chat::ChatState;
use crate::endpoints::Endpoints;
use crate::evidence_view::EvidenceState;
use crate::jury_view::JuryState;
use crate::log_view::LogView;
use crate::service_view::ServiceState;
use crate::splash_screen::SplashScreen;
use crate::status_indicator::StatusIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Splash,
    Chat,
    Evidence,
    Jury,
    Service,
    QuitConfirm,
    Quit,
}

/// Everything the UI loop and the background tasks share. Wrapped in an
/// `Arc<Mutex<_>>` at startup; tasks take the lock briefly to mutate state
/// and the draw pass reads it once per frame.
#[derive(Debug)]
pub struct App {
    pub screen: AppScreen,
    pub splash: SplashScreen,
    pub chat: ChatState,
    pub evidence: EvidenceState,
    pub jury: JuryState,
    pub service: ServiceState,
    pub logs: LogView,
    pub status_indicator: StatusIndicator,
    pub endpoints: Endpoints,
    pub case_id: String,
}

impl App {
    pub fn new(endpoints: Endpoints, case_id: String) -> Self {
        Self {
            screen: AppScreen::Splash,
            splash: SplashScreen::new(),
            chat: ChatState::default(),
            evidence: EvidenceState::default(),
            jury: JuryState::default(),
            service: ServiceState::new(),
            logs: LogView::new(),
            status_indicator: StatusIndicator::new(),
            endpoints,
            case_id,
        }
    }

    /// Called on every UI tick.
    pub fn tick(&mut self) {
        self.status_indicator.update_spinner();
    }
}
