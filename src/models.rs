use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One document in the case evidence locker.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseDocument {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub custodian: String,
    pub added_at: DateTime<Utc>,
    pub sha256: Option<String>,
}

/// Integrity verdict returned by the forensics service for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityVerdict {
    Verified,
    Altered,
    Inconclusive,
}

impl IntegrityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityVerdict::Verified => "verified",
            IntegrityVerdict::Altered => "altered",
            IntegrityVerdict::Inconclusive => "inconclusive",
        }
    }
}

/// Forensic analysis result for a single document.
#[derive(Debug, Clone, Deserialize)]
pub struct ForensicReport {
    pub document_id: String,
    pub sha256: String,
    pub integrity: IntegrityVerdict,
    pub examined_at: DateTime<Utc>,
    pub findings: Vec<String>,
}

/// Sentiment reading for one seated juror.
#[derive(Debug, Clone, Deserialize)]
pub struct JurorSentiment {
    pub seat: u8,
    pub name: String,
    /// -1.0 leans defense, 1.0 leans prosecution.
    pub leaning: f32,
    pub confidence: f32,
    pub note: Option<String>,
}

/// Full jury sentiment snapshot for a case.
#[derive(Debug, Clone, Deserialize)]
pub struct JuryPulse {
    pub jurors: Vec<JurorSentiment>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}
