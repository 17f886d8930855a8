//! Integration tests for the quest engine
//!
//! These tests run the engine against a wiremock search server and a
//! scripted remote status, covering the full burst/refresh/rotate cycle.

mod common;

use common::{
    all_notices, build_engine, build_engine_with_trends, done, pending, FixedTrends,
    ScriptedStatus, Snapshot, StubIdentity, DESKTOP_UA, MOBILE_UA,
};
use search_quest::config::DeveloperConfig;
use search_quest::quest::{DeveloperNotice, FORM_CODES};
use search_quest::state::{QuestJobStatus, SearchSurface};
use search_quest::{QuestError, RotationTarget};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a search endpoint answering 200 for one User-Agent
async fn mount_search(server: &MockServer, user_agent: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", user_agent))
        .and(header("accept", "*/*"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_completed_status_issues_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(done(50), done(30)), vec![]);

    engine
        .do_work(&mut status)
        .await
        .expect("Completed status should end cleanly");

    assert_eq!(engine.job_status(), QuestJobStatus::Done);
    assert_eq!(status.update_count(), 0);
    assert!(probes.rotations().is_empty());
    assert!(probes.notices().is_empty());
}

#[tokio::test]
async fn test_required_searches_per_surface() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, DESKTOP_UA, 2).await;
    mount_search(&mock_server, MOBILE_UA, 1).await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(
        Snapshot::new(pending(0, 2), pending(0, 1)),
        vec![Snapshot::new(done(10), done(5))],
    );

    engine.do_work(&mut status).await.expect("Run should succeed");

    assert_eq!(engine.job_status(), QuestJobStatus::Done);
    assert_eq!(engine.current_surface(), None);
    assert_eq!(status.update_count(), 1);
    assert!(probes.rotations().is_empty());

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording should be enabled");
    assert_eq!(requests.len(), 3);
    // desktop burst runs before mobile
    let terms: Vec<String> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(
        terms,
        vec![
            "desktop_weather_today",
            "desktop_weather_today",
            "mobile_weather_today"
        ]
    );
}

#[tokio::test]
async fn test_search_urls_carry_term_and_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "desktop_weather_today"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (mut engine, _probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        DeveloperConfig::default(),
    );
    let mut status = ScriptedStatus::new(
        Snapshot::new(pending(0, 1), done(30)),
        vec![Snapshot::new(done(5), done(30))],
    );

    engine.do_work(&mut status).await.expect("Run should succeed");

    let requests = mock_server.received_requests().await.unwrap();
    let url = &requests[0].url;
    let form = url
        .query_pairs()
        .find(|(k, _)| k == "form")
        .map(|(_, v)| v.into_owned())
        .expect("Every search carries a form code");
    assert!(FORM_CODES.contains(&form.as_str()));
}

#[tokio::test]
async fn test_completed_surface_issues_no_requests() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, DESKTOP_UA, 0).await;
    mount_search(&mock_server, MOBILE_UA, 2).await;

    let (mut engine, _probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(
        Snapshot::new(done(50), pending(10, 2)),
        vec![Snapshot::new(done(50), done(20))],
    );

    engine.do_work(&mut status).await.expect("Run should succeed");

    assert_eq!(engine.job_status(), QuestJobStatus::Done);
}

#[tokio::test]
async fn test_desktop_stall_rotates_desktop_identity() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, DESKTOP_UA, 1).await;
    mount_search(&mock_server, MOBILE_UA, 1).await;
    let rotated = format!("{}-rotated", DESKTOP_UA);
    mount_search(&mock_server, &rotated, 1).await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(
        Snapshot::new(pending(0, 1), pending(0, 1)),
        vec![
            // mobile credited, desktop did not move
            Snapshot::new(pending(0, 1), done(5)),
            Snapshot::new(done(5), done(5)),
        ],
    );

    engine.do_work(&mut status).await.expect("Run should succeed");

    assert_eq!(engine.job_status(), QuestJobStatus::Done);
    assert_eq!(probes.rotations(), vec![RotationTarget::Desktop]);
    assert_eq!(
        probes.notices(),
        vec![DeveloperNotice::StableIdentityOutdated(
            RotationTarget::Desktop
        )]
    );
    assert!(engine.identity().is_updated(SearchSurface::Desktop));
    assert!(!engine.identity().is_updated(SearchSurface::Mobile));
    assert_eq!(status.update_count(), 2);
}

#[tokio::test]
async fn test_stall_on_updated_identities_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(true, true),
        all_notices(),
    );
    // nothing required, progress never moves
    let mut status = ScriptedStatus::new(Snapshot::new(pending(10, 0), pending(10, 0)), vec![]);

    let result = engine.do_work(&mut status).await;

    assert!(matches!(
        result,
        Err(QuestError::IdentityInvalid {
            target: RotationTarget::Both
        })
    ));
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert_eq!(engine.current_surface(), None);
    assert!(probes.rotations().is_empty());
    assert_eq!(
        probes.notices(),
        vec![DeveloperNotice::UpdatedIdentityOutdated]
    );
}

#[tokio::test]
async fn test_notices_respect_developer_switches() {
    let mock_server = MockServer::start().await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(true, true),
        DeveloperConfig::default(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(10, 0), pending(10, 0)), vec![]);

    let result = engine.do_work(&mut status).await;

    assert!(result.unwrap_err().is_identity_invalid());
    assert!(probes.notices().is_empty());
}

#[tokio::test]
async fn test_non_200_search_is_an_anomaly() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(0, 3), pending(0, 3)), vec![]);

    let result = engine.do_work(&mut status).await;

    assert!(matches!(
        result,
        Err(QuestError::ResponseAnomaly { status: 503, .. })
    ));
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert_eq!(engine.current_surface(), None);
    assert_eq!(engine.search_count(SearchSurface::Desktop), 0);
    assert_eq!(status.update_count(), 0);
    assert!(probes.notices().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_fails_fetch() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let (mut engine, _probes) = build_engine(
        &base_url,
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(0, 1), pending(0, 1)), vec![]);

    let result = engine.do_work(&mut status).await;

    let err = result.unwrap_err();
    assert!(matches!(err, QuestError::FetchFailed { .. }));
    assert!(err.is_transport());
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
}

#[tokio::test]
async fn test_invalid_status_stops_without_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(
        Snapshot::new(pending(0, 2), pending(0, 2)).invalid(),
        vec![],
    );

    engine
        .do_work(&mut status)
        .await
        .expect("Invalid status is not an error result");

    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert!(probes.rotations().is_empty());
}

#[tokio::test]
async fn test_remote_job_error_stops_loop() {
    let mock_server = MockServer::start().await;

    let (mut engine, _probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(0, 2), pending(0, 2)), vec![])
        .with_job_status(QuestJobStatus::Error);

    engine.do_work(&mut status).await.unwrap();

    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_engine_can_run_again_after_reset() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, DESKTOP_UA, 2).await;

    let (mut engine, _probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );

    for _ in 0..2 {
        let mut status = ScriptedStatus::new(
            Snapshot::new(pending(0, 1), done(30)),
            vec![Snapshot::new(done(5), done(30))],
        );
        engine.do_work(&mut status).await.expect("Run should succeed");
        assert_eq!(engine.job_status(), QuestJobStatus::Done);
        engine.reset();
        assert_eq!(engine.job_status(), QuestJobStatus::None);
    }
}

#[tokio::test]
async fn test_identity_failure_at_start_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false).unavailable(),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(0, 2), pending(0, 2)), vec![]);

    let result = engine.do_work(&mut status).await;

    assert!(matches!(result, Err(QuestError::IdentityUnavailable(_))));
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert_eq!(status.update_count(), 0);
    assert!(probes.notices().is_empty());
}

#[tokio::test]
async fn test_trends_failure_at_start_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut engine, _probes) = build_engine_with_trends(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        FixedTrends::new().unavailable(),
        all_notices(),
    );
    let mut status = ScriptedStatus::new(Snapshot::new(pending(0, 2), pending(0, 2)), vec![]);

    let result = engine.do_work(&mut status).await;

    assert!(matches!(result, Err(QuestError::Trends(_))));
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert_eq!(status.update_count(), 0);
}

#[tokio::test]
async fn test_status_refresh_failure_ends_run() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, DESKTOP_UA, 1).await;
    mount_search(&mock_server, MOBILE_UA, 1).await;

    let (mut engine, probes) = build_engine(
        &mock_server.uri(),
        StubIdentity::new(false, false),
        all_notices(),
    );
    let mut status =
        ScriptedStatus::new(Snapshot::new(pending(0, 1), pending(0, 1)), vec![]).failing();

    let result = engine.do_work(&mut status).await;

    assert!(matches!(result, Err(QuestError::Status(_))));
    assert_eq!(engine.job_status(), QuestJobStatus::Error);
    assert_eq!(engine.current_surface(), None);
    assert!(engine.header_override().is_none());
    assert_eq!(status.update_count(), 1);
    assert!(probes.rotations().is_empty());
}
