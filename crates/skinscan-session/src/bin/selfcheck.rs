//! Pipeline selfcheck binary.
//!
//! Drives one full capture attempt through the fake hardware doubles
//! and the real HTTP client against the configured endpoint. Useful
//! for verifying a deployment's classification endpoint without a
//! device camera.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skinscan_capture::{FakeCamera, FixedGate};
use skinscan_client::{ClassifierConfig, RemoteClassifier};
use skinscan_codec::ImageCodec;
use skinscan_models::{PixelFormat, RawImage, WorkflowState};
use skinscan_session::{SessionConfig, SessionController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::from_default_env()
        .add_directive("skinscan=info".parse().unwrap());
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_target(true))
        .with(env_filter)
        .init();

    let config = ClassifierConfig::from_env()
        .ok_or_else(|| anyhow::anyhow!("SKINSCAN_ENDPOINT is not set"))?;
    info!(endpoint = %config.endpoint, "selfcheck starting");

    let camera = Arc::new(FakeCamera::new("selfcheck-cam"));
    camera.push_frame(
        RawImage::filled(4, 4, PixelFormat::Rgba8, &[255, 0, 0, 255])
            .expect("valid synthetic frame"),
    );

    let classifier = RemoteClassifier::new(config)?;
    let controller = SessionController::new(
        SessionConfig::from_env(),
        Arc::new(FixedGate::granted()),
        camera,
        ImageCodec::default(),
        Arc::new(classifier),
    );

    let mut rx = controller.subscribe();
    anyhow::ensure!(controller.request_capture(), "capture request rejected");

    let state = tokio::time::timeout(Duration::from_secs(90), async {
        loop {
            let state = rx.borrow().state.clone();
            if state.is_terminal() {
                return Ok::<_, tokio::sync::watch::error::RecvError>(state);
            }
            rx.changed().await?;
        }
    })
    .await??;

    controller.shutdown().await;

    match state {
        WorkflowState::ResultReady(result) => {
            println!("selfcheck: ok, result = {:?}", result.label());
            Ok(())
        }
        WorkflowState::Failed(kind) => {
            anyhow::bail!("selfcheck failed: {}", kind.user_message())
        }
        other => anyhow::bail!("unexpected terminal state: {}", other),
    }
}
