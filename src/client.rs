use crate::config::Config;
use crate::types::{Classification, ClassifyRequest, ClassifyResponse, HealthReport};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

/// What went wrong talking to the classification service. The display
/// strings are shown to the user verbatim, so they stay free of
/// transport-level detail; that detail goes to the logs instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(
        "cannot connect to the classification service; make sure the backend is running on {base_url}"
    )]
    Connect {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned HTTP {status}")]
    Status { status: StatusCode },

    #[error("{message}")]
    Api { message: String },

    #[error("failed to classify the comment; please try again")]
    Unexpected { detail: String },
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, comment: &str) -> Result<Classification, ClientError>;
    async fn health(&self) -> Result<HealthReport, ClientError>;
}

pub struct HttpClassifier {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Timeouts, refused connections, and DNS failures all land here.
    fn transport_error(&self, source: reqwest::Error) -> ClientError {
        ClientError::Connect {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    #[tracing::instrument(skip(self, comment), fields(request_id = %Uuid::new_v4().simple(), chars = comment.len()))]
    async fn classify(&self, comment: &str) -> Result<Classification, ClientError> {
        let response = self
            .http
            .post(self.url("classify"))
            .json(&ClassifyRequest {
                comment: comment.to_string(),
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "classify request rejected");
            return Err(ClientError::Status { status });
        }

        let payload: ClassifyResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "classify response was not valid JSON");
            ClientError::Unexpected {
                detail: e.to_string(),
            }
        })?;

        into_classification(payload)
    }

    #[tracing::instrument(skip(self))]
    async fn health(&self) -> Result<HealthReport, ClientError> {
        let response = self
            .http
            .get(self.url("health"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "health request rejected");
            return Err(ClientError::Status { status });
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "health response was not valid JSON");
            ClientError::Unexpected {
                detail: e.to_string(),
            }
        })
    }
}

/// An `error` field inside a 2xx body takes priority over whatever else
/// the body carries, and its message is surfaced untouched.
fn into_classification(payload: ClassifyResponse) -> Result<Classification, ClientError> {
    if let Some(message) = payload.error {
        return Err(ClientError::Api { message });
    }
    match (payload.category, payload.confidence) {
        (Some(category), Some(confidence)) => Ok(Classification {
            category,
            confidence,
            all_predictions: payload.all_predictions,
        }),
        _ => {
            tracing::error!("classify response missing category or confidence");
            Err(ClientError::Unexpected {
                detail: "missing category or confidence".to_string(),
            })
        }
    }
}

/// Outcome of a background request, delivered to the UI loop.
#[derive(Debug)]
pub enum ClientEvent {
    Classified(Result<Classification, ClientError>),
    HealthChecked(Result<HealthReport, ClientError>),
}

pub fn spawn_classify(
    classifier: Arc<dyn Classifier>,
    comment: String,
    events: flume::Sender<ClientEvent>,
) {
    tokio::spawn(async move {
        let outcome = classifier.classify(&comment).await;
        let _ = events.send(ClientEvent::Classified(outcome));
    });
}

pub fn spawn_health_check(classifier: Arc<dyn Classifier>, events: flume::Sender<ClientEvent>) {
    tokio::spawn(async move {
        let outcome = classifier.health().await;
        let _ = events.send(ClientEvent::HealthChecked(outcome));
    });
}
