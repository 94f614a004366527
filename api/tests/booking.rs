use std::sync::Arc;

use api::route::routes;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use kernel::model::{
    id::{RoomId, UserId},
    ticket::TicketStatus,
};
use kernel::repository::in_memory::InMemoryRepository;
use registry::AppRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "valid-token";

fn app(repo: &InMemoryRepository) -> Router {
    let repo = Arc::new(repo.clone());
    let registry = AppRegistry::from_repositories(
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo.clone(),
        repo,
    );
    routes().with_state(registry)
}

// トークン付きで、支払い済み・ホテル付きチケットを持つユーザーを用意する
fn signed_in_user(repo: &InMemoryRepository, status: TicketStatus, includes_hotel: bool) -> UserId {
    let user_id = UserId::new(1);
    repo.insert_session(TOKEN, user_id);
    let enrollment = repo.insert_enrollment(user_id);
    repo.insert_ticket(enrollment.enrollment_id, status, false, includes_hotel);
    user_id
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    // axum のパスの拒否などはプレーンテキストで返るので、JSON のときだけ読む
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if is_json {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    } else {
        Value::Null
    };
    (status, body)
}

#[tokio::test]
async fn requests_without_valid_session_are_unauthorized() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    let room = repo.insert_room(3);
    let body = json!({ "roomId": room.room_id });

    let (status, _) = send(app(&repo), request(Method::POST, "/booking", None, Some(body.clone()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        app(&repo),
        request(Method::POST, "/booking", Some("unknown"), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app(&repo), request(Method::GET, "/booking", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_token_selects_whose_booking_is_read() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    let other = UserId::new(2);
    repo.insert_session("other-token", other);
    let room = repo.insert_room(3);
    let booking_id = repo.insert_booking(other, room.room_id);

    let (status, _) = send(app(&repo), request(Method::GET, "/booking", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        app(&repo),
        request(Method::GET, "/booking", Some("other-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(booking_id));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    repo.insert_room(3);

    let bodies = [
        None,
        Some(json!({ "foo": "bar" })),
        Some(json!({ "roomId": "abc" })),
        Some(json!({ "roomId": 0 })),
    ];
    for body in bodies {
        let (status, _) = send(
            app(&repo),
            request(Method::POST, "/booking", Some(TOKEN), body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
    }
}

#[tokio::test]
async fn create_returns_booking_id() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    let room = repo.insert_room(3);

    let (status, body) = send(
        app(&repo),
        request(
            Method::POST,
            "/booking",
            Some(TOKEN),
            Some(json!({ "roomId": room.room_id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["bookingId"].is_i64());
    assert_eq!(repo.booking_count(room.room_id), 1);
}

#[tokio::test]
async fn create_maps_rule_failures_to_status_codes() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Reserved, true);
    let room = repo.insert_room(3);

    let (status, _) = send(
        app(&repo),
        request(
            Method::POST,
            "/booking",
            Some(TOKEN),
            Some(json!({ "roomId": room.room_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    let room = repo.insert_room(3);
    let (status, _) = send(
        app(&repo),
        request(
            Method::POST,
            "/booking",
            Some(TOKEN),
            Some(json!({ "roomId": room.room_id.raw() + 1000 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_without_booking_is_not_found() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);

    let (status, _) = send(app(&repo), request(Method::GET, "/booking", Some(TOKEN), None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_returns_booking_with_room() {
    let repo = InMemoryRepository::new();
    let user_id = signed_in_user(&repo, TicketStatus::Paid, true);
    let room = repo.insert_room(3);
    let booking_id = repo.insert_booking(user_id, room.room_id);

    let (status, body) = send(app(&repo), request(Method::GET, "/booking", Some(TOKEN), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(booking_id));
    assert_eq!(body["Room"]["id"], json!(room.room_id));
    assert_eq!(body["Room"]["name"], json!(room.name));
    assert_eq!(body["Room"]["capacity"], json!(3));
    assert!(body["Room"]["hotelId"].is_i64());
    assert!(body["Room"]["createdAt"].is_string());
    assert!(body["Room"]["updatedAt"].is_string());
}

#[tokio::test]
async fn update_moves_booking() {
    let repo = InMemoryRepository::new();
    let user_id = signed_in_user(&repo, TicketStatus::Paid, true);
    let from = repo.insert_room(3);
    let to = repo.insert_room(3);
    let booking_id = repo.insert_booking(user_id, from.room_id);

    let (status, body) = send(
        app(&repo),
        request(
            Method::PUT,
            &format!("/booking/{booking_id}"),
            Some(TOKEN),
            Some(json!({ "roomId": to.room_id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookingId"], json!(booking_id));
    assert_eq!(repo.booking_count(to.room_id), 1);
    assert_eq!(repo.booking_count(from.room_id), 0);
}

#[tokio::test]
async fn update_without_booking_is_forbidden() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);
    let room = repo.insert_room(3);

    let (status, _) = send(
        app(&repo),
        request(
            Method::PUT,
            "/booking/1",
            Some(TOKEN),
            Some(json!({ "roomId": room.room_id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_with_non_numeric_booking_id_is_bad_request() {
    let repo = InMemoryRepository::new();
    signed_in_user(&repo, TicketStatus::Paid, true);

    let (status, body) = send(
        app(&repo),
        request(
            Method::PUT,
            "/booking/abc",
            Some(TOKEN),
            Some(json!({ "roomId": RoomId::new(1) })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, Value::Null);
    assert_eq!(repo.booking_count(RoomId::new(1)), 0);
}

#[tokio::test]
async fn health_check_reports_ok() {
    let repo = InMemoryRepository::new();

    let (status, _) = send(app(&repo), request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(&repo), request(Method::GET, "/health/db", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}
