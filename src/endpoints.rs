use crate::config::Config;
use crate::errors::{DocketError, DocketResult};
use crate::models::{CaseDocument, ForensicReport, JuryPulse};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP client for the case backend. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct Endpoints {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct DocumentsResponse {
    documents: Vec<CaseDocument>,
}

impl Endpoints {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> DocketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DocketError::api_error(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> DocketResult<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout_secs,
        )
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.header("x-api-key", &self.api_key)
        }
    }

    async fn check_status(response: Response, what: &str) -> DocketResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DocketError::api_error(format!(
            "{} returned {}: {}",
            what, status, body
        )))
    }

    /// Asks the case agent a question and returns its reply text.
    pub async fn send_chat_message(&self, message: &str, case_id: &str) -> DocketResult<String> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = json!({
            "case_id": case_id,
            "message": message,
        });

        let response = self
            .with_key(self.client.post(&url).json(&payload))
            .send()
            .await
            .map_err(|e| DocketError::api_error(format!("chat request failed: {}", e)))?;
        let response = Self::check_status(response, "chat request").await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DocketError::api_error(format!("failed to decode chat response: {}", e)))?;

        body["reply"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DocketError::api_error("chat response missing 'reply' field"))
    }

    pub async fn list_documents(&self, case_id: &str) -> DocketResult<Vec<CaseDocument>> {
        let url = format!("{}/api/cases/{}/documents", self.base_url, case_id);

        let response = self
            .with_key(self.client.get(&url))
            .send()
            .await
            .map_err(|e| DocketError::api_error(format!("documents request failed: {}", e)))?;
        let response = Self::check_status(response, "documents request").await?;

        let body: DocumentsResponse = response.json().await.map_err(|e| {
            DocketError::api_error(format!("failed to decode documents response: {}", e))
        })?;

        Ok(body.documents)
    }

    pub async fn analyze_document(&self, document_id: &str) -> DocketResult<ForensicReport> {
        let url = format!("{}/api/forensics/analyze", self.base_url);
        let payload = json!({ "document_id": document_id });

        let response = self
            .with_key(self.client.post(&url).json(&payload))
            .send()
            .await
            .map_err(|e| DocketError::api_error(format!("forensics request failed: {}", e)))?;
        let response = Self::check_status(response, "forensics request").await?;

        response.json().await.map_err(|e| {
            DocketError::api_error(format!("failed to decode forensic report: {}", e))
        })
    }

    pub async fn jury_sentiment(&self, case_id: &str) -> DocketResult<JuryPulse> {
        let url = format!("{}/api/cases/{}/jury/sentiment", self.base_url, case_id);

        let response = self
            .with_key(self.client.get(&url))
            .send()
            .await
            .map_err(|e| DocketError::api_error(format!("jury sentiment request failed: {}", e)))?;
        let response = Self::check_status(response, "jury sentiment request").await?;

        response.json().await.map_err(|e| {
            DocketError::api_error(format!("failed to decode jury sentiment: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntegrityVerdict;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoints_for(server: &MockServer, api_key: &str) -> Endpoints {
        Endpoints::new(server.uri(), api_key.to_string(), 5).unwrap()
    }

    #[tokio::test]
    async fn test_send_chat_message_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "case_id": "case-0001",
                "message": "who served the subpoena?",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": "Deputy Alvarez, on the 14th."
            })))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "");
        let reply = endpoints
            .send_chat_message("who served the subpoena?", "case-0001")
            .await
            .unwrap();
        assert_eq!(reply, "Deputy Alvarez, on the 14th.");
    }

    #[tokio::test]
    async fn test_send_chat_message_propagates_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "");
        let err = endpoints
            .send_chat_message("hello", "case-0001")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_send_chat_message_rejects_missing_reply_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "");
        let err = endpoints
            .send_chat_message("hello", "case-0001")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reply"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_list_documents_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {
                        "id": "doc-1",
                        "title": "Security footage log",
                        "kind": "log",
                        "custodian": "building manager",
                        "added_at": "2026-06-20T10:00:00Z",
                        "sha256": "ff00aa11"
                    },
                    {
                        "id": "doc-2",
                        "title": "Signed affidavit",
                        "kind": "affidavit",
                        "custodian": "notary",
                        "added_at": "2026-06-21T08:15:00Z",
                        "sha256": null
                    }
                ]
            })))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "");
        let docs = endpoints.list_documents("case-0001").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "doc-1");
        assert!(docs[1].sha256.is_none());
    }

    #[tokio::test]
    async fn test_analyze_document_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/forensics/analyze"))
            .and(header("x-api-key", "sealed-key"))
            .and(body_json(json!({ "document_id": "doc-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "document_id": "doc-1",
                "sha256": "ff00aa11",
                "integrity": "verified",
                "examined_at": "2026-06-22T12:00:00Z",
                "findings": []
            })))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "sealed-key");
        let report = endpoints.analyze_document("doc-1").await.unwrap();
        assert_eq!(report.integrity, IntegrityVerdict::Verified);
        assert!(report.findings.is_empty());
    }

    #[tokio::test]
    async fn test_jury_sentiment_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cases/case-0001/jury/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jurors": [
                    {"seat": 1, "name": "Juror 1", "leaning": 0.2, "confidence": 0.9, "note": null}
                ],
                "summary": "Leaning slightly toward the prosecution.",
                "generated_at": "2026-06-22T18:30:00Z"
            })))
            .mount(&server)
            .await;

        let endpoints = endpoints_for(&server, "");
        let pulse = endpoints.jury_sentiment("case-0001").await.unwrap();
        assert_eq!(pulse.jurors.len(), 1);
        assert_eq!(pulse.summary, "Leaning slightly toward the prosecution.");
    }
}
