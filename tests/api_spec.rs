//! Client and page tests against an in-process fake of the Listinator
//! server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reqwest::StatusCode as ClientStatus;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use listinator_client::api::{ClientError, ListinatorClient};
use listinator_client::models::*;
use listinator_client::notifications::{Level, NotificationCenter, NotificationQueue, Notify};
use listinator_client::pages::{Pages, View};
use listinator_client::routes::Route;

const SESSION_COOKIE: &str = "listinator_session=ok";
const USER_ID: &str = "9d9a6b0e-1c2d-4e3f-8a9b-0c1d2e3f4a5b";

// ============================================================
// Fake server
// ============================================================

#[derive(Clone, Default)]
struct Fake {
    lists: Arc<Mutex<Vec<Uuid>>>,
    entries: Arc<Mutex<Vec<Entry>>>,
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "record not found".to_string())
}

async fn create_list(State(fake): State<Fake>) -> impl IntoResponse {
    let id = Uuid::new_v4();
    fake.lists.lock().unwrap().push(id);
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "ID": id, "Entries": [] })),
    )
}

async fn list_entries(
    State(fake): State<Fake>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Entry>>, (StatusCode, String)> {
    let list_id = query
        .get("ListID")
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or((StatusCode::BAD_REQUEST, "missing ListID".to_string()))?;
    let entries = fake.entries.lock().unwrap();
    Ok(Json(
        entries.iter().filter(|e| e.list_id == list_id).cloned().collect(),
    ))
}

async fn create_entry(
    State(fake): State<Fake>,
    Json(input): Json<CreateEntryInput>,
) -> Result<(StatusCode, Json<Entry>), (StatusCode, String)> {
    if !fake.lists.lock().unwrap().contains(&input.list_id) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "FOREIGN KEY constraint failed".to_string()));
    }
    let entry = Entry {
        id: Uuid::new_v4(),
        name: input.name,
        number: String::new(),
        bought: false,
        type_id: input.type_id.unwrap_or_else(|| UNKNOWN_TYPE_ID.to_string()),
        list_id: input.list_id,
        created_at: None,
        updated_at: None,
    };
    fake.entries.lock().unwrap().push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_entry(
    State(fake): State<Fake>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry>, (StatusCode, String)> {
    let entries = fake.entries.lock().unwrap();
    entries.iter().find(|e| e.id == id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_entry(
    State(fake): State<Fake>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateEntryInput>,
) -> Result<Json<Entry>, (StatusCode, String)> {
    let mut entries = fake.entries.lock().unwrap();
    let entry = entries.iter_mut().find(|e| e.id == id).ok_or_else(not_found)?;
    entry.name = input.name;
    entry.number = input.number;
    entry.bought = input.bought;
    entry.type_id = input.type_id;
    entry.list_id = input.list_id;
    Ok(Json(entry.clone()))
}

async fn delete_entry(
    State(fake): State<Fake>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry>, (StatusCode, String)> {
    let mut entries = fake.entries.lock().unwrap();
    let index = entries.iter().position(|e| e.id == id).ok_or_else(not_found)?;
    Ok(Json(entries.remove(index)))
}

async fn list_types() -> Json<serde_json::Value> {
    Json(serde_json::json!([
        { "ID": "unknown", "Name": "Unknown", "Immutable": true, "Color": "#999999", "Priority": 0 },
        { "ID": "fruit", "Name": "Fruit", "Immutable": true, "Color": "#ff0000", "Priority": 10 },
        { "ID": "dairy", "Name": "Dairy", "Immutable": false, "Color": "#ffffff", "Priority": 10 }
    ]))
}

async fn create_session(Json(credentials): Json<Credentials>) -> impl IntoResponse {
    if credentials.name.is_empty() || credentials.password.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if credentials.name != "alice" || credentials.password != "secret" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "listinator_session=ok; Path=/; HttpOnly")],
    )
        .into_response()
}

async fn get_session(headers: HeaderMap) -> impl IntoResponse {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE));
    if signed_in {
        Json(serde_json::json!({ "uuid": USER_ID })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn delete_session() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "listinator_session=; Path=/; Max-Age=0")],
    )
}

fn fake_router(fake: Fake) -> Router {
    let api = Router::new()
        .route("/lists", post(create_list))
        .route("/entries", get(list_entries).post(create_entry))
        .route(
            "/entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/types", get(list_types))
        .route(
            "/session",
            get(get_session).post(create_session).delete(delete_session),
        );

    Router::new().nest("/api/v1", api).with_state(fake)
}

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

async fn setup() -> ListinatorClient {
    let url = serve(fake_router(Fake::default())).await;
    ListinatorClient::new(url).expect("Failed to create client")
}

/// A server that answers every request with `status`.
async fn setup_failing(status: StatusCode) -> ListinatorClient {
    let app = Router::new().fallback(move || async move { (status, "upstream exploded") });
    let url = serve(app).await;
    ListinatorClient::new(url).expect("Failed to create client")
}

fn setup_pages(client: ListinatorClient) -> (Pages, NotificationCenter) {
    let center = NotificationCenter::new();
    let pages = Pages::new(client, Arc::new(center.clone()));
    (pages, center)
}

fn credentials(name: &str, password: &str) -> Credentials {
    Credentials {
        name: name.to_string(),
        password: password.to_string(),
    }
}

// ============================================================
// Client
// ============================================================

mod lists {
    use super::*;

    #[tokio::test]
    async fn creates_an_empty_list() {
        let client = setup().await;

        let list = assert_ok!(client.create_list().await);
        assert!(list.entries.is_empty());

        let entries = assert_ok!(client.get_entries(list.id).await);
        assert!(entries.is_empty());
    }
}

mod entries {
    use super::*;

    #[tokio::test]
    async fn created_entries_are_listed_for_their_list_only() {
        let client = setup().await;
        let groceries = assert_ok!(client.create_list().await);
        let hardware = assert_ok!(client.create_list().await);

        let milk = assert_ok!(client.create_entry("Milk", groceries.id).await);
        assert_ok!(client.create_entry("Screws", hardware.id).await);

        assert_eq!(milk.name, "Milk");
        assert_eq!(milk.type_id, UNKNOWN_TYPE_ID);
        assert!(!milk.bought);

        let entries = assert_ok!(client.get_entries(groceries.id).await);
        assert_eq!(entries, vec![milk]);
    }

    #[tokio::test]
    async fn update_replaces_the_entry() {
        let client = setup().await;
        let list = assert_ok!(client.create_list().await);
        let mut entry = assert_ok!(client.create_entry("Apples", list.id).await);

        entry.number = "6".to_string();
        entry.bought = true;
        entry.type_id = "fruit".to_string();
        let saved = assert_ok!(client.update_entry(&entry).await);
        assert_eq!(saved, entry);

        let fetched = assert_ok!(client.get_entry(entry.id).await);
        assert_eq!(fetched.number, "6");
        assert!(fetched.bought);
        assert_eq!(fetched.type_id, "fruit");
    }

    #[tokio::test]
    async fn delete_returns_the_removed_entry() {
        let client = setup().await;
        let list = assert_ok!(client.create_list().await);
        let entry = assert_ok!(client.create_entry("Bread", list.id).await);

        let removed = assert_ok!(client.delete_entry(&entry).await);
        assert_eq!(removed.id, entry.id);

        let err = assert_err!(client.get_entry(entry.id).await);
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let client = setup().await;

        let err = assert_err!(client.get_entry(Uuid::new_v4()).await);
        assert_eq!(err.status(), Some(ClientStatus::NOT_FOUND));
    }
}

mod types {
    use super::*;

    #[tokio::test]
    async fn returns_all_types() {
        let client = setup().await;

        let types = assert_ok!(client.get_types().await);
        let keys: Vec<&str> = types.iter().map(|t| t.key()).collect();
        assert_eq!(keys, vec!["unknown", "fruit", "dairy"]);
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn signed_out_session_is_unauthorized() {
        let client = setup().await;

        let err = assert_err!(client.session().await);
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn login_keeps_the_session_cookie() {
        let client = setup().await;

        assert_ok!(client.login(&credentials("alice", "secret")).await);
        let session = assert_ok!(client.session().await);
        assert_eq!(session.uuid, Uuid::parse_str(USER_ID).unwrap());

        assert_ok!(client.logout().await);
        assert_err!(client.session().await);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let client = setup().await;

        let err = assert_err!(client.login(&credentials("alice", "guess")).await);
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn empty_credentials_are_a_bad_request() {
        let client = setup().await;

        let err = assert_err!(client.login(&credentials("", "")).await);
        assert!(matches!(err, ClientError::BadRequest(_)));
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn non_success_status_is_carried_by_the_error() {
        let client = setup_failing(StatusCode::INTERNAL_SERVER_ERROR).await;

        let err = assert_err!(client.get_types().await);
        assert_eq!(err.status(), Some(ClientStatus::INTERNAL_SERVER_ERROR));
        match err {
            ClientError::Status { body, .. } => assert_eq!(body, "upstream exploded"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = ListinatorClient::new(url).unwrap();

        let err = assert_err!(client.create_list().await);
        assert!(matches!(err, ClientError::Http(_)));
        assert!(err.status().is_none());
    }
}

// ============================================================
// Pages
// ============================================================

mod pages {
    use super::*;

    #[tokio::test]
    async fn failures_show_a_generic_error_with_details_for_developers() {
        let (pages, center) = setup_pages(setup_failing(StatusCode::SERVICE_UNAVAILABLE).await);

        assert!(pages.types().await.is_none());

        let notification = center.current().expect("error notification");
        assert_eq!(notification.level, Level::Error);
        assert_eq!(notification.user_message, "Could not load types");
        assert!(!notification.auto_hide);
        let details = notification.technical_details.expect("technical details");
        assert!(details.contains("503"));
        assert!(details.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn home_creates_a_list_and_reports_success() {
        let (pages, center) = setup_pages(setup().await);

        let list = pages.home().await.expect("list");
        assert_eq!(Route::resolve(&Route::List(list.id).path()), Some(Route::List(list.id)));

        let notification = center.current().unwrap();
        assert_eq!(notification.level, Level::Success);
        assert_eq!(notification.user_message, "List created");
        assert!(notification.auto_hide);
    }

    #[tokio::test]
    async fn list_page_shows_unbought_entries_first() {
        let client = setup().await;
        let list = assert_ok!(client.create_list().await);
        let mut eggs = assert_ok!(client.create_entry("Eggs", list.id).await);
        assert_ok!(client.create_entry("Flour", list.id).await);
        eggs.bought = true;
        assert_ok!(client.update_entry(&eggs).await);
        let (pages, _center) = setup_pages(client);

        let view = pages.open(&Route::List(list.id)).await.expect("view");
        let View::Entries(entries) = view else {
            panic!("expected entries view");
        };
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Eggs"]);
    }

    #[tokio::test]
    async fn entry_type_page_sorts_types_by_priority() {
        let client = setup().await;
        let list = assert_ok!(client.create_list().await);
        let entry = assert_ok!(client.create_entry("Cheese", list.id).await);
        let (pages, _center) = setup_pages(client);

        let view = pages.open(&Route::EntryType(entry.id)).await.expect("view");
        let View::EntryType { entry: shown, types } = view else {
            panic!("expected entry type view");
        };
        assert_eq!(shown.id, entry.id);
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Dairy", "Fruit", "Unknown"]);
    }

    #[tokio::test]
    async fn add_update_and_remove_report_each_step() {
        let client = setup().await;
        let list = assert_ok!(client.create_list().await);
        let (pages, center) = setup_pages(client);

        let entry = pages.add_entry(list.id, "Milk").await.expect("added");
        assert_eq!(center.current().unwrap().user_message, "Added Milk");

        let change = EntryChange {
            number: Some("2".to_string()),
            bought: Some(true),
            ..Default::default()
        };
        let saved = pages.update_entry(entry.id, &change).await.expect("saved");
        assert_eq!(saved.number, "2");
        assert!(saved.bought);
        assert_eq!(saved.name, "Milk");
        assert_eq!(center.current().unwrap().user_message, "Saved");

        pages.remove_entry(entry.id).await.expect("removed");
        assert_eq!(center.current().unwrap().user_message, "Removed Milk");

        let messages: Vec<String> = center.history().into_iter().map(|n| n.user_message).collect();
        assert_eq!(messages, vec!["Added Milk", "Saved", "Removed Milk"]);
    }

    #[tokio::test]
    async fn adding_to_an_unknown_list_fails_without_leaking_the_cause() {
        let (pages, center) = setup_pages(setup().await);

        assert!(pages.add_entry(Uuid::new_v4(), "Milk").await.is_none());

        let notification = center.current().unwrap();
        assert_eq!(notification.user_message, "Could not add entry");
        assert!(!notification.to_string().contains("FOREIGN KEY"));
        assert!(notification.technical_details.unwrap().contains("FOREIGN KEY"));
    }

    #[tokio::test]
    async fn removing_a_missing_entry_reports_once() {
        let (pages, center) = setup_pages(setup().await);

        assert!(pages.remove_entry(Uuid::new_v4()).await.is_none());
        assert_eq!(center.history().len(), 1);
        assert_eq!(center.current().unwrap().user_message, "Could not load entry");
    }

    #[tokio::test]
    async fn login_page_distinguishes_wrong_credentials() {
        let (pages, center) = setup_pages(setup().await);

        assert!(pages.login(&credentials("alice", "guess")).await.is_none());
        assert_eq!(center.current().unwrap().user_message, "Wrong user name or password");

        assert!(pages.login(&credentials("alice", "secret")).await.is_some());
        assert_eq!(center.current().unwrap().user_message, "Signed in");

        let view = pages.open(&Route::Login).await.expect("view");
        assert!(matches!(view, View::Session(Some(_))));
    }

    #[tokio::test]
    async fn sign_in_only_reports_failures() {
        let (pages, center) = setup_pages(setup().await);

        assert!(pages.sign_in(&credentials("alice", "secret")).await.is_some());
        assert!(center.current().is_none());
        assert!(center.history().is_empty());

        assert!(pages.sign_in(&credentials("alice", "guess")).await.is_none());
        assert_eq!(center.current().unwrap().user_message, "Wrong user name or password");
        assert_eq!(center.history().len(), 1);
    }

    #[tokio::test]
    async fn whoami_when_signed_out_is_not_an_error() {
        let (pages, center) = setup_pages(setup().await);

        assert!(pages.whoami().await.is_none());
        assert!(center.current().is_none());
        assert!(center.history().is_empty());
    }

    #[tokio::test]
    async fn queue_mode_keeps_every_outcome_live() {
        let client = setup().await;
        let queue = NotificationQueue::new();
        let pages = Pages::new(client, Arc::new(queue.clone()));

        let list = pages.home().await.expect("list");
        pages.add_entry(list.id, "Tea").await.expect("added");
        assert!(pages.entry(Uuid::new_v4()).await.is_none());

        let live = pages.notify().live();
        let levels: Vec<Level> = live.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![Level::Success, Level::Success, Level::Error]);
        assert_eq!(queue.live().len(), 3);
    }
}
