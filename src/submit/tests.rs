//! Unit tests for the controller state machine and the HTTP transport.

use super::controller::{SubmissionController, SubmissionState};
use super::transport::{HttpTransport, Transport};
use super::SubmitError;

fn controller() -> SubmissionController {
    SubmissionController::new("信息提交成功！")
}

#[test]
fn begin_refuses_while_submitting() {
    let mut ctl = controller();
    let first = ctl.begin();
    assert_eq!(first, Some(1));
    assert!(ctl.is_submitting());

    // second submit action while in flight is a no-op
    assert_eq!(ctl.begin(), None);
    assert_eq!(ctl.state(), SubmissionState::Submitting);
}

#[test]
fn success_path_sets_response_and_message() {
    let mut ctl = controller();
    let attempt = ctl.begin().unwrap();
    assert!(ctl.complete(attempt, Ok("诊断：肝郁气滞".to_string())));

    assert_eq!(ctl.state(), SubmissionState::Succeeded);
    assert_eq!(ctl.response(), Some("诊断：肝郁气滞"));
    assert_eq!(ctl.success(), Some("信息提交成功！"));
    assert_eq!(ctl.error(), None);
}

#[test]
fn failure_path_sets_error_only() {
    let mut ctl = controller();
    let attempt = ctl.begin().unwrap();
    assert!(ctl.complete(attempt, Err(SubmitError::Status(500))));

    assert_eq!(ctl.state(), SubmissionState::Failed);
    assert_eq!(ctl.error(), Some("提交数据失败"));
    assert_eq!(ctl.response(), None);
    assert_eq!(ctl.success(), None);
}

#[test]
fn resubmit_after_failure_reenters_submitting() {
    let mut ctl = controller();
    let a1 = ctl.begin().unwrap();
    ctl.complete(a1, Err(SubmitError::Timeout));
    assert_eq!(ctl.state(), SubmissionState::Failed);

    let a2 = ctl.begin().unwrap();
    assert_eq!(a2, 2);
    assert_eq!(ctl.state(), SubmissionState::Submitting);
    // messages from the failed attempt are gone
    assert_eq!(ctl.error(), None);
}

#[test]
fn stale_completion_is_dropped() {
    let mut ctl = controller();
    let abandoned = ctl.begin().unwrap();
    ctl.reset();
    let current = ctl.begin().unwrap();

    // the abandoned call finally lands; it must not apply
    assert!(!ctl.complete(abandoned, Ok("旧结果".to_string())));
    assert_eq!(ctl.state(), SubmissionState::Submitting);
    assert_eq!(ctl.response(), None);

    assert!(ctl.complete(current, Ok("新结果".to_string())));
    assert_eq!(ctl.response(), Some("新结果"));
}

#[test]
fn completion_after_reset_is_dropped() {
    let mut ctl = controller();
    let attempt = ctl.begin().unwrap();
    ctl.reset();
    assert!(!ctl.complete(attempt, Ok("迟到".to_string())));
    assert_eq!(ctl.state(), SubmissionState::Idle);
}

#[test]
fn reject_surfaces_missing_fields_without_entering_submitting() {
    let mut ctl = controller();
    ctl.reject(SubmitError::MissingRequired(vec![
        "name", "age", "gender", "height", "weight",
    ]));
    assert_eq!(ctl.state(), SubmissionState::Idle);
    assert_eq!(ctl.error(), Some("请填写所有必填项"));
    assert_eq!(ctl.missing(), ["name", "age", "gender", "height", "weight"]);
}

#[tokio::test]
async fn transport_returns_report_on_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"诊断：肝郁气滞，建议疏肝解郁。"}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/api", server.url())).unwrap();
    let report = transport.post_text("姓名：张三").await.unwrap();
    assert_eq!(report, "诊断：肝郁气滞，建议疏肝解郁。");
    mock.assert_async().await;
}

#[tokio::test]
async fn transport_maps_server_error_to_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api")
        .with_status(500)
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/api", server.url())).unwrap();
    let err = transport.post_text("姓名：张三").await.unwrap_err();
    assert!(matches!(err, SubmitError::Status(500)));
}

#[tokio::test]
async fn transport_rejects_body_without_response_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"wrong shape"}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/api", server.url())).unwrap();
    let err = transport.post_text("姓名：张三").await.unwrap_err();
    assert!(matches!(err, SubmitError::MalformedBody));
}

#[tokio::test]
async fn transport_rejects_empty_response_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":""}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(format!("{}/api", server.url())).unwrap();
    let err = transport.post_text("姓名：张三").await.unwrap_err();
    assert!(matches!(err, SubmitError::MalformedBody));
}

#[tokio::test]
async fn transport_posts_image_as_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tongue-analysis")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"舌质淡红，苔薄白。"}"#)
        .create_async()
        .await;

    let transport =
        HttpTransport::new(format!("{}/api/tongue-analysis", server.url())).unwrap();
    let report = transport
        .post_image(vec![0xFF, 0xD8, 0xFF], "tongue.jpg", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(report, "舌质淡红，苔薄白。");
    mock.assert_async().await;
}
