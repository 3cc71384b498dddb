//! End-to-end workflow tests: fake hardware, real codec, real HTTP
//! client against a local mock endpoint.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skinscan_capture::{FakeCamera, FixedGate, ImageCapture};
use skinscan_client::{ClassifierConfig, RemoteClassifier};
use skinscan_codec::ImageCodec;
use skinscan_models::{
    ClassificationResult, ErrorKind, PixelFormat, RawImage, WorkflowState,
};
use skinscan_session::{SessionConfig, SessionController};

fn red_frame() -> RawImage {
    RawImage::filled(4, 4, PixelFormat::Rgba8, &[255, 0, 0, 255]).unwrap()
}

fn controller(gate: FixedGate, camera: Arc<FakeCamera>, endpoint: String) -> SessionController {
    let classifier = RemoteClassifier::new(
        ClassifierConfig::new(endpoint).with_timeout(Duration::from_millis(250)),
    )
    .unwrap();
    SessionController::new(
        SessionConfig::default(),
        Arc::new(gate),
        camera,
        ImageCodec::default(),
        Arc::new(classifier),
    )
}

async fn terminal_state(controller: &SessionController) -> WorkflowState {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = rx.borrow().state.clone();
            if state.is_terminal() {
                return state;
            }
            rx.changed().await.expect("controller dropped");
        }
    })
    .await
    .expect("workflow did not reach a terminal state")
}

#[tokio::test]
async fn granted_capture_uploads_and_reports_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
        .expect(1)
        .mount(&server)
        .await;

    let camera = Arc::new(FakeCamera::new("cam0"));
    camera.push_frame(red_frame());
    let controller = controller(
        FixedGate::granted(),
        camera.clone(),
        format!("{}/classify", server.uri()),
    );

    assert!(controller.request_capture());
    assert_eq!(
        terminal_state(&controller).await,
        WorkflowState::ResultReady(ClassificationResult::Success("healthy".into()))
    );
    assert_eq!(camera.captures(), 1);
}

#[tokio::test]
async fn denied_permission_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
        .expect(0)
        .mount(&server)
        .await;

    let camera = Arc::new(FakeCamera::new("cam0"));
    let controller = controller(
        FixedGate::denied(),
        camera.clone(),
        format!("{}/classify", server.uri()),
    );

    assert!(controller.request_capture());
    assert_eq!(
        terminal_state(&controller).await,
        WorkflowState::Failed(ErrorKind::PermissionDenied)
    );
    assert_eq!(camera.captures(), 0);
}

#[tokio::test]
async fn server_failure_surfaces_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let camera = Arc::new(FakeCamera::new("cam0"));
    camera.push_frame(red_frame());
    let controller = controller(
        FixedGate::granted(),
        camera,
        format!("{}/classify", server.uri()),
    );

    assert!(controller.request_capture());
    assert_eq!(
        terminal_state(&controller).await,
        WorkflowState::Failed(ErrorKind::ServerError(500))
    );
}

#[tokio::test]
async fn slow_endpoint_surfaces_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let camera = Arc::new(FakeCamera::new("cam0"));
    camera.push_frame(red_frame());
    let controller = controller(
        FixedGate::granted(),
        camera,
        format!("{}/classify", server.uri()),
    );

    assert!(controller.request_capture());
    assert_eq!(
        terminal_state(&controller).await,
        WorkflowState::Failed(ErrorKind::Timeout)
    );
}

#[tokio::test]
async fn full_cycle_capture_reset_capture() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
        .expect(2)
        .mount(&server)
        .await;

    let camera = Arc::new(FakeCamera::new("cam0"));
    camera.push_frame(red_frame());
    camera.push_frame(red_frame());
    let controller = controller(
        FixedGate::granted(),
        camera.clone(),
        format!("{}/classify", server.uri()),
    );

    assert!(controller.request_capture());
    assert!(terminal_state(&controller).await.is_terminal());

    controller.reset();
    assert_eq!(controller.state(), WorkflowState::Idle);

    assert!(controller.request_capture());
    assert!(matches!(
        terminal_state(&controller).await,
        WorkflowState::ResultReady(_)
    ));

    // one session across both attempts, then released on shutdown
    assert_eq!(camera.opens(), 2);
    assert!(camera.session().is_some());
    controller.shutdown().await;
    assert!(camera.session().is_none());
}
