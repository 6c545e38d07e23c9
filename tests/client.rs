mod common;

use arena::client::{Anonymous, ApiError, ContestApiClient, Identity, StaticIdentity};
use arena::config::ApiConfig;
use arena::contest::{
    run_registration, ContestPhase, ContestView, ErrorKind, GateError, Notice, RegistrationAction,
    RegistrationApi,
};
use common::{contest, contest_json, StubServer};

fn client<I: Identity>(server: &StubServer, identity: I) -> ContestApiClient<I> {
    let cfg = ApiConfig {
        base_url: server.base_url.clone(),
        timeout_ms: 2_000,
    };
    ContestApiClient::from_config(&cfg, identity).expect("client")
}

#[tokio::test]
async fn fetches_contest_with_bearer_token() {
    let server = StubServer::start(vec![(200, contest_json(true))]).await;
    let api = client(&server, StaticIdentity::new("u1", "secret-token"));
    let contest = api.get_contest("weekly-42").await.expect("contest");
    assert_eq!(contest.id, "weekly-42");
    assert!(contest.is_registered);
    assert_eq!(contest.eligible_to, vec![2, 3]);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/contests/weekly-42");
    assert_eq!(
        requests[0].header("authorization"),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn lists_contests_by_page() {
    let mut later = contest(false);
    later.id = "weekly-43".into();
    later.registration_start_time = 6_000_000;
    later.registration_end_time = 7_000_000;
    later.start_time = 7_000_000;
    later.end_time = 9_000_000;
    let body = serde_json::to_string(&vec![contest(true), later]).expect("encode list");
    let server = StubServer::start(vec![(200, body)]).await;
    let api = client(&server, StaticIdentity::new("u1", "secret-token"));

    let contests = api.list_contests(2).await.expect("contest list");
    assert_eq!(contests.len(), 2);
    let now = 3_000_000;
    let phases: Vec<_> = contests
        .iter()
        .map(|c| {
            let windows = c.windows().expect("valid windows");
            (windows.registration.phase(now), windows.contest.phase(now))
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            (ContestPhase::Closed, ContestPhase::Open),
            (ContestPhase::Upcoming, ContestPhase::Upcoming),
        ]
    );

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/contests/list?page=2");
    assert_eq!(
        requests[0].header("authorization"),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn empty_contest_page_decodes_to_empty_list() {
    let server = StubServer::start(vec![(200, "[]".into())]).await;
    let api = client(&server, Anonymous);
    assert!(api.list_contests(0).await.expect("list").is_empty());
    assert_eq!(server.requests()[0].path, "/contests/list?page=0");
}

#[tokio::test]
async fn anonymous_requests_carry_no_credentials() {
    let server = StubServer::start(vec![(200, contest_json(false))]).await;
    let api = client(&server, Anonymous);
    api.get_contest("weekly-42").await.expect("contest");
    assert_eq!(server.requests()[0].header("authorization"), None);
}

#[tokio::test]
async fn missing_contest_is_not_found() {
    let server = StubServer::start(vec![(404, r#"{"message":"Contest not found"}"#.into())]).await;
    let api = client(&server, Anonymous);
    let err = api.get_contest("nope").await.expect_err("404");
    assert_eq!(err, ApiError::NotFound("Contest not found".into()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn malformed_contest_payload_is_decode_error() {
    let server = StubServer::start(vec![(200, r#"{"id":"weekly-42"}"#.into())]).await;
    let api = client(&server, Anonymous);
    let err = api.get_contest("weekly-42").await.expect_err("decode");
    assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::ServerFault);
}

#[tokio::test]
async fn registration_posts_action_body() {
    let server = StubServer::start(vec![(200, "{}".into())]).await;
    let api = client(&server, StaticIdentity::new("u1", "t"));
    api.submit("weekly-42", RegistrationAction::Unregister)
        .await
        .expect("accepted");
    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/contests/weekly-42/registration");
    let body: serde_json::Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(body, serde_json::json!({"action": "unregister"}));
}

#[tokio::test]
async fn forbidden_message_is_extracted_for_classification() {
    let server = StubServer::start(vec![(
        403,
        r#"{"message":"Registration window has closed"}"#.into(),
    )])
    .await;
    let api = client(&server, StaticIdentity::new("u1", "t"));
    let err = api
        .set_registration("weekly-42", RegistrationAction::Register)
        .await
        .expect_err("403");
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.display_message(), Some("Registration window has closed"));
    assert_eq!(err.kind(), ErrorKind::WindowClosed);
}

#[tokio::test]
async fn plain_text_server_error_is_server_fault() {
    let server = StubServer::start(vec![(500, "Internal Server Error".into())]).await;
    let api = client(&server, Anonymous);
    let err = api
        .set_registration("weekly-42", RegistrationAction::Register)
        .await
        .expect_err("500");
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "Internal Server Error".into()
        }
    );
    assert!(err.kind().is_retryable());
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let server = StubServer::start(vec![]).await;
    let base = server.base_url.clone();
    drop(server);
    // Give the aborted listener task a chance to release the port.
    tokio::task::yield_now().await;
    let cfg = ApiConfig {
        base_url: base,
        timeout_ms: 500,
    };
    let api = ContestApiClient::from_config(&cfg, Anonymous).expect("client");
    let err = api.get_contest("weekly-42").await.expect_err("unreachable");
    assert_eq!(err.kind(), ErrorKind::Unreachable);
}

#[tokio::test]
async fn end_to_end_conflict_through_view() {
    let server = StubServer::start(vec![(409, r#"{"message":"Already registered"}"#.into())]).await;
    let api = client(&server, StaticIdentity::new("u1", "t"));
    let contest = common::contest(false);
    let view = ContestView::new(&contest, api.identity().is_authenticated())
        .expect("valid windows")
        .shared();
    let outcome = run_registration(&view, &api, RegistrationAction::Register, 1_500_000)
        .await
        .expect("live view")
        .expect("conflict recovers");
    assert_eq!(outcome.notice, Some(Notice::AlreadyRegistered));
    assert!(view.lock().status().is_registered);

    // Now registered: a second register is refused locally.
    let again = run_registration(&view, &api, RegistrationAction::Register, 1_500_000)
        .await
        .expect("live view");
    assert_eq!(again, Err(GateError::NotPermitted("register")));
    assert_eq!(server.requests().len(), 1);
}
