use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{json, Value};

use famagenda_core::gateway::{Collection, Gateway, GatewayError, Query, RestGateway};
use famagenda_core::sync::remote::EventFields;
use famagenda_core::sync::RemoteCollections;

const KEY: &str = "anon-key";

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    table: String,
    query: Option<String>,
    apikey: Option<String>,
    authorization: Option<String>,
    prefer: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Captured>>>;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(
    State(log): State<Log>,
    Path(table): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Response {
    log.lock().unwrap().push(Captured {
        method: method.clone(),
        table: table.clone(),
        query,
        apikey: header(&headers, "apikey"),
        authorization: header(&headers, "authorization"),
        prefer: header(&headers, "prefer"),
        body: body.clone(),
    });

    match table.as_str() {
        "pets" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "pickups" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([])).into_response()
        }
        "custom_lists" => Json(json!({"unexpected": true})).into_response(),
        _ => match method {
            Method::GET => Json(json!([
                {"id": 1, "family_id": 42, "title": "Dentist", "start_time": "2025-03-10T09:30:00"},
                {"id": 2, "family_id": 42, "title": "Recital", "start_time": "2025-03-12T18:00:00"}
            ]))
            .into_response(),
            Method::POST | Method::PATCH => {
                let mut row: Value = serde_json::from_str(&body).unwrap_or(json!({}));
                row["id"] = json!(77);
                Json(json!([row])).into_response()
            }
            _ => StatusCode::NO_CONTENT.into_response(),
        },
    }
}

async fn start_server() -> (SocketAddr, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/rest/v1/{table}", any(handle))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

fn gateway_for(addr: SocketAddr) -> RestGateway {
    RestGateway::new(Some(format!("http://{}", addr)), Some(KEY.to_string()))
}

fn last(log: &Log) -> Captured {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_select_sends_filters_and_auth_headers() {
    let (addr, log) = start_server().await;
    let gateway = gateway_for(addr);

    let query = Query::new().eq("family_id", 42).order_asc("start_time");
    let rows = gateway.select(Collection::Events, &query).await.unwrap();
    assert_eq!(rows.len(), 2);

    let request = last(&log);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.table, "events");
    assert_eq!(
        request.query.as_deref(),
        Some("family_id=eq.42&order=start_time.asc")
    );
    assert_eq!(request.apikey.as_deref(), Some(KEY));
    assert_eq!(
        request.authorization.as_deref(),
        Some("Bearer anon-key")
    );
}

#[tokio::test]
async fn test_insert_returns_echoed_row() {
    let (addr, log) = start_server().await;
    let gateway = gateway_for(addr);

    let echoed = gateway
        .insert(Collection::Events, json!({"family_id": 42, "title": "Swim"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(echoed["id"], json!(77));
    assert_eq!(echoed["title"], json!("Swim"));

    let request = last(&log);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
    assert!(request.body.contains("\"title\":\"Swim\""));
}

#[tokio::test]
async fn test_update_targets_row_by_id() {
    let (addr, log) = start_server().await;
    let gateway = gateway_for(addr);

    gateway
        .update(Collection::Events, 9, json!({"title": "Moved"}))
        .await
        .unwrap();

    let request = last(&log);
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.query.as_deref(), Some("id=eq.9"));
}

#[tokio::test]
async fn test_delete_asks_for_minimal_response() {
    let (addr, log) = start_server().await;
    let gateway = gateway_for(addr);

    gateway.delete(Collection::Events, 9).await.unwrap();

    let request = last(&log);
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.query.as_deref(), Some("id=eq.9"));
    assert_eq!(request.prefer.as_deref(), Some("return=minimal"));
}

#[tokio::test]
async fn test_error_status_becomes_gateway_error() {
    let (addr, _log) = start_server().await;
    let gateway = gateway_for(addr);

    let err = gateway
        .select(Collection::Pets, &Query::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::Status {
            collection: Collection::Pets,
            status: 500,
            body: "boom".to_string(),
        }
    );
}

#[tokio::test]
async fn test_non_array_select_is_decode_error() {
    let (addr, _log) = start_server().await;
    let gateway = gateway_for(addr);

    let err = gateway
        .select(Collection::CustomLists, &Query::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode { .. }));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (addr, _log) = start_server().await;
    let gateway = gateway_for(addr).with_timeout(Duration::from_millis(100));

    let err = gateway
        .select(Collection::Pickups, &Query::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Timeout {
            collection: Collection::Pickups,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway_for(addr)
        .select(Collection::Events, &Query::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport { .. }));
}

#[tokio::test]
async fn test_collection_functions_over_http() {
    let (addr, log) = start_server().await;
    let remote = RemoteCollections::new(Arc::new(gateway_for(addr)));

    let events = remote.sync_events(42).await.unwrap();
    assert_eq!(events[0].title, "Dentist");
    assert_eq!(events[1].id, 2);

    let created = remote
        .create_event(&EventFields {
            family_id: 42,
            title: "Swim".to_string(),
            start_time: "2025-03-14T17:00:00".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.id, 77);
    assert_eq!(log.lock().unwrap().len(), 2);
}
