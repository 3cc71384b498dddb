//! Remote classifier over HTTP.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, info};

use skinscan_models::EncodedPayload;

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, ClassifierResult};
use crate::retry::with_retry;

/// Sends an encoded image to a classification endpoint.
///
/// The session controller uploads through this trait; anything that
/// can answer it (the HTTP implementation below, or an in-memory
/// double) can terminate the workflow.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// One classification round trip.
    ///
    /// Returns the endpoint's response body as the result label.
    async fn classify(&self, payload: &EncodedPayload) -> ClassifierResult<String>;
}

/// Reqwest-backed classifier.
///
/// POSTs the payload body with its own content type to the configured
/// endpoint and reads the response body as UTF-8. Retries, when
/// enabled in the config, apply only to transient failures.
pub struct RemoteClassifier {
    config: ClassifierConfig,
    client: Client,
}

impl RemoteClassifier {
    /// Create a classifier, validating the endpoint URL.
    pub fn new(config: ClassifierConfig) -> ClassifierResult<Self> {
        Url::parse(&config.endpoint)
            .map_err(|e| ClassifierError::invalid_endpoint(format!("{}: {}", config.endpoint, e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClassifierError::network_unreachable(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    async fn send_once(&self, payload: &EncodedPayload) -> ClassifierResult<String> {
        debug!(
            endpoint = %self.config.endpoint,
            content_type = payload.content_type(),
            bytes = payload.len(),
            "posting payload"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, payload.content_type())
            .body(payload.data().to_vec())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        let label = String::from_utf8(body.to_vec())
            .map_err(|_| ClassifierError::malformed_response("response body is not valid UTF-8"))?;

        info!(label = %label, "classification received");
        Ok(label)
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, payload: &EncodedPayload) -> ClassifierResult<String> {
        with_retry(&self.config, "classify", || self.send_once(payload)).await
    }
}

fn map_transport_error(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else {
        ClassifierError::network_unreachable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio_test::assert_ok;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use skinscan_codec::ImageCodec;
    use skinscan_models::{PixelFormat, RawImage};

    fn payload() -> EncodedPayload {
        let image = RawImage::filled(4, 4, PixelFormat::Rgba8, &[255, 0, 0, 255]).unwrap();
        ImageCodec::default().encode(&image).unwrap()
    }

    fn classifier(endpoint: String) -> RemoteClassifier {
        RemoteClassifier::new(
            ClassifierConfig::new(endpoint).with_timeout(Duration::from_millis(250)),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = RemoteClassifier::new(ClassifierConfig::new("not a url"));
        assert!(matches!(result, Err(ClassifierError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_success_returns_body_as_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
            .expect(1)
            .mount(&server)
            .await;

        let classifier = classifier(format!("{}/classify", server.uri()));
        let label = assert_ok!(classifier.classify(&payload()).await);
        assert_eq!(label, "healthy");
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let classifier = classifier(format!("{}/classify", server.uri()));
        match classifier.classify(&payload()).await {
            Err(ClassifierError::ServerError(500)) => {}
            other => panic!("expected ServerError(500), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let classifier = classifier(format!("{}/classify", server.uri()));
        match classifier.classify(&payload()).await {
            Err(ClassifierError::Timeout) => {}
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // A pooled MockServer keeps its listener alive after drop; use a
        // dedicated server so dropping it actually closes the port.
        let server = MockServer::builder().start().await;
        let endpoint = format!("{}/classify", server.uri());
        drop(server);

        let classifier = classifier(endpoint);
        match classifier.classify(&payload()).await {
            Err(ClassifierError::NetworkUnreachable(_)) => {}
            other => panic!("expected NetworkUnreachable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_utf8_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xC3, 0x28, 0xFF]))
            .mount(&server)
            .await;

        let classifier = classifier(format!("{}/classify", server.uri()));
        match classifier.classify(&payload()).await {
            Err(ClassifierError::MalformedResponse(_)) => {}
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_configured_retry_recovers_from_transient_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
            .mount(&server)
            .await;

        let mut config = ClassifierConfig::new(format!("{}/classify", server.uri()))
            .with_timeout(Duration::from_millis(250))
            .with_retries(2);
        config.retry_base_delay_ms = 1;
        config.retry_max_delay_ms = 2;

        let classifier = RemoteClassifier::new(config).unwrap();
        assert_eq!(classifier.classify(&payload()).await.unwrap(), "healthy");
    }

    #[tokio::test]
    async fn test_default_config_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let classifier = classifier(format!("{}/classify", server.uri()));
        assert!(classifier.classify(&payload()).await.is_err());
        // expect(1) verifies on drop that exactly one request was made
    }
}
