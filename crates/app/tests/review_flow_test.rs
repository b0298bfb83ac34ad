//! End-to-end review flows through the console with a scripted backend.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use powershare::Console;
use powershare::cli::{Commands, execute};
use powershare_application::{
    ApplicationError, HttpClient, HttpClientError, SessionEvent, SessionEvents, TokenStore,
};
use powershare_domain::{ApiEndpoints, CredentialPair, ProposalStatus, RequestSpec, ResponseSpec};
use powershare_infrastructure::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

const LOGIN_URL: &str = "http://localhost:8081/auth/login";
const REFRESH_URL: &str = "http://localhost:8081/auth/refresh";
const PENDING_URL: &str = "http://localhost:8086/admin/producers?status=PENDING";

/// A registry that knows two pending proposals and accepts the token it
/// last issued.
#[derive(Default)]
struct FakeBackend {
    offline: AtomicBool,
    generation: AtomicUsize,
    refreshes: AtomicUsize,
    transitions: AtomicUsize,
}

impl FakeBackend {
    fn current_token(&self) -> String {
        format!("access-{}", self.generation.load(Ordering::SeqCst))
    }

    fn issue(&self) -> ResponseSpec {
        let next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseSpec::json_body(
            200,
            &json!({"accessToken": format!("access-{next}"), "refreshToken": format!("refresh-{next}")}),
        )
    }

    fn respond(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(HttpClientError::ConnectionRefused {
                host: "localhost".to_string(),
                port: 8086,
            });
        }
        if request.url == LOGIN_URL {
            return Ok(self.issue());
        }
        if request.url == REFRESH_URL {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            return Ok(self.issue());
        }

        let expected = format!("Bearer {}", self.current_token());
        if request.headers.get("Authorization") != Some(expected.as_str()) {
            return Ok(ResponseSpec::with_status(401));
        }
        if request.url == PENDING_URL {
            return Ok(ResponseSpec::json_body(
                200,
                &json!([
                    {"userId": "u-1", "userName": "Fazenda Sol", "email": "sol@x.com", "sentAt": "01/01/2024"},
                    {"userId": "u-2", "userName": "Usina Vento", "email": "vento@x.com", "sentAt": "15/06/2024"}
                ]),
            ));
        }
        self.transitions.fetch_add(1, Ordering::SeqCst);
        Ok(ResponseSpec::with_status(204))
    }
}

struct Transport(Arc<FakeBackend>);

impl HttpClient for Transport {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.0.respond(request)
    }
}

fn console(backend: &Arc<FakeBackend>) -> (Console<Transport>, SessionEvents) {
    let events = SessionEvents::new();
    let console = Console::new(
        Arc::new(Transport(backend.clone())),
        TokenStore::in_memory(),
        events.clone(),
        ApiEndpoints::localhost().expect("endpoints"),
    );
    (console, events)
}

#[tokio::test]
async fn test_offline_approval_keeps_list_and_session() {
    let backend = Arc::new(FakeBackend::default());
    let (console, _) = console(&backend);

    console
        .session()
        .login("admin@powershare.com", "segredo")
        .await
        .expect("login");
    let loaded = console
        .workflow()
        .load_proposals(ProposalStatus::Pending)
        .await
        .expect("load");
    assert_eq!(loaded.len(), 2);
    let credentials = console.tokens().get().await;

    backend.offline.store(true, Ordering::SeqCst);
    let result = console.workflow().approve("u-1").await;

    assert!(matches!(
        result,
        Err(ApplicationError::RemoteCallFailed {
            operation: "approve",
            status: None,
            ..
        })
    ));
    assert_eq!(console.workflow().proposals().len(), 2);
    assert_eq!(console.tokens().get().await, credentials);
    assert!(!console.workflow().is_in_flight("u-1"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_transparently() {
    let backend = Arc::new(FakeBackend::default());
    let (console, events) = console(&backend);
    console
        .session()
        .login("admin@powershare.com", "segredo")
        .await
        .expect("login");
    console
        .workflow()
        .load_proposals(ProposalStatus::Pending)
        .await
        .expect("load");
    let mut rx = events.subscribe();

    console
        .tokens()
        .set(CredentialPair::new("stale", "refresh-1"))
        .await;

    console.workflow().approve("u-2").await.expect("approved");

    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(backend.transitions.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv().ok(), Some(SessionEvent::Refreshed));
    let ids: Vec<String> = console
        .workflow()
        .proposals()
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    assert_eq!(ids, vec!["u-1".to_string()]);
}

#[tokio::test]
async fn test_commands_render_output() {
    let backend = Arc::new(FakeBackend::default());
    let (console, _) = console(&backend);
    let dir = tempdir().expect("temp dir");
    let config = AppConfig {
        session_file: Some(dir.path().join("session.json")),
        ..AppConfig::defaults().expect("config")
    };

    let login = execute(
        Commands::Login {
            email: " admin@powershare.com ".to_string(),
            password: "segredo".to_string(),
        },
        &console,
        &config,
    )
    .await
    .expect("login");
    assert_eq!(login, "Logged in as admin@powershare.com.\n");

    let listing = execute(
        Commands::List {
            status: ProposalStatus::Pending,
            search: "vento".to_string(),
        },
        &console,
        &config,
    )
    .await
    .expect("list");
    assert!(listing.starts_with("Pendentes (1)\n"));
    assert!(listing.contains("Usina Vento"));
    assert!(!listing.contains("Fazenda Sol"));

    let status = execute(Commands::Status, &console, &config)
        .await
        .expect("status");
    assert!(status.starts_with("Session: authenticated"));

    let logout = execute(Commands::Logout, &console, &config)
        .await
        .expect("logout");
    assert_eq!(logout, "Logged out.\n");
    assert!(!console.session().is_authenticated().await);
}

#[tokio::test]
async fn test_short_reason_is_refused_before_sending() {
    let backend = Arc::new(FakeBackend::default());
    let (console, _) = console(&backend);
    console
        .session()
        .login("admin@powershare.com", "segredo")
        .await
        .expect("login");

    let error = execute(
        Commands::Reject {
            user_id: "u-1".to_string(),
            reason: " curt ".to_string(),
        },
        &console,
        &AppConfig::defaults().expect("config"),
    )
    .await
    .expect_err("reason too short");

    assert!(matches!(
        error.downcast_ref::<ApplicationError>(),
        Some(ApplicationError::Validation(_))
    ));
    assert_eq!(backend.transitions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_commands_without_session_report_invalidation() {
    let backend = Arc::new(FakeBackend::default());
    let (console, events) = console(&backend);
    let mut rx = events.subscribe();

    let error = execute(
        Commands::Approve {
            user_id: "u-1".to_string(),
        },
        &console,
        &AppConfig::defaults().expect("config"),
    )
    .await
    .expect_err("no session");

    assert!(
        error
            .downcast_ref::<ApplicationError>()
            .is_some_and(ApplicationError::is_session_invalid)
    );
    assert!(matches!(
        rx.try_recv(),
        Ok(SessionEvent::Invalidated { .. })
    ));
    assert_eq!(backend.transitions.load(Ordering::SeqCst), 0);
}
