//! Classification service HTTP client.

use std::future::Future;
use std::time::Instant;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use leafscan_models::{ImageUpload, PredictionResult};

use crate::config::ClientConfig;
use crate::error::{ClientResult, PredictionError};
use crate::metrics::{record_ping, record_prediction};
use crate::types::{ErrorBody, FILE_FIELD, PING_PATH, PREDICT_PATH};

/// Anything that can classify an image and report liveness.
///
/// Sessions are generic over this so the screen flow can be driven without
/// a live service.
pub trait Predictor {
    /// Submit one image for classification.
    fn predict(
        &self,
        upload: &ImageUpload,
    ) -> impl Future<Output = ClientResult<PredictionResult>> + Send;

    /// Report whether the service is up. Never fails.
    fn ping(&self) -> impl Future<Output = bool> + Send;

    /// Base URL used in user-facing messages.
    fn base_url(&self) -> &str;
}

/// Client for the classification service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    config: ClientConfig,
}

impl PredictionClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let config = config.validate()?;
        let http = Client::builder()
            .build()
            .map_err(|e| PredictionError::invalid_config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Classify an image.
    ///
    /// Returns exactly one of a validated result or a typed error. Nothing
    /// is retried.
    pub async fn predict(&self, upload: &ImageUpload) -> ClientResult<PredictionResult> {
        let started = Instant::now();
        let outcome = self.send_predict(upload).await;

        let label = match &outcome {
            Ok(_) => "success",
            Err(e) => {
                warn!("Prediction for {} failed: {}", upload.filename, e);
                match e {
                    PredictionError::Timeout(_) => "timeout",
                    PredictionError::Http { .. } => "http_error",
                    PredictionError::MalformedResponse(_) => "malformed",
                    _ => "network_error",
                }
            }
        };
        record_prediction(label, started.elapsed().as_secs_f64());

        outcome
    }

    async fn send_predict(&self, upload: &ImageUpload) -> ClientResult<PredictionResult> {
        let url = self.config.endpoint(PREDICT_PATH);
        let timeout = self.config.predict_timeout;

        debug!(
            "Sending {} ({}, {} bytes) to {}",
            upload.filename,
            upload.content_type,
            upload.len(),
            url
        );

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| {
                PredictionError::invalid_config(format!(
                    "Invalid content type '{}': {}",
                    upload.content_type, e
                ))
            })?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| PredictionError::from_transport(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::from_transport(e, timeout))?;

        if !status.is_success() {
            return Err(PredictionError::Http {
                status: status.as_u16(),
                detail: ErrorBody::parse(&body).detail_message(),
            });
        }

        let result: PredictionResult = serde_json::from_str(&body)?;
        result
            .validate()
            .map_err(|e| PredictionError::malformed(e.to_string()))?;

        debug!(
            "Prediction for {}: {} ({})",
            upload.filename,
            result.class,
            result.confidence_percent()
        );
        Ok(result)
    }

    /// Check if the service is running.
    ///
    /// True only on HTTP 200; every failure, including a timeout, is false.
    pub async fn ping(&self) -> bool {
        let url = self.config.endpoint(PING_PATH);

        let healthy = match self
            .http
            .get(&url)
            .timeout(self.config.ping_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!("Service ping failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Service ping error: {}", e);
                false
            }
        };

        record_ping(healthy);
        healthy
    }
}

impl Predictor for PredictionClient {
    fn predict(
        &self,
        upload: &ImageUpload,
    ) -> impl Future<Output = ClientResult<PredictionResult>> + Send {
        PredictionClient::predict(self, upload)
    }

    fn ping(&self) -> impl Future<Output = bool> + Send {
        PredictionClient::ping(self)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_base_url() {
        let client =
            PredictionClient::new(ClientConfig::default().with_base_url("http://10.0.2.2:8000/"))
                .unwrap();
        assert_eq!(Predictor::base_url(&client), "http://10.0.2.2:8000");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = PredictionClient::new(ClientConfig::default().with_base_url("localhost"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }
}
