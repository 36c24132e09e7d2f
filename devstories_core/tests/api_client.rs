use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use devstories_core::api::PostQuery;
use devstories_core::location::{FeedFilter, ListRequest};
use devstories_core::models::{Category, LoginInput, Post};
use devstories_core::sync::ListSlice;
use devstories_core::{ApiClient, ApiError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[derive(Default)]
struct MockApi {
    categories: Vec<Value>,
    likes: Vec<String>,
    like_calls: usize,
    category_posts: Vec<Value>,
    post_queries: Vec<HashMap<String, String>>,
}

type Shared = Arc<Mutex<MockApi>>;

fn spawn_server() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(MockApi {
        categories: vec![json!({"_id": "c1", "name": "Programming"})],
        ..MockApi::default()
    }));
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/users/profile", get(profile))
        .route("/api/users/check-username", get(check_username))
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:id/like", post(toggle_like))
        .with_state(state.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve");
        });
    });
    (format!("http://{addr}/api"), state)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).expect("client")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["userName"] == "aziz" && body["password"] == "secret" {
        (
            [(SET_COOKIE, "sid=abc; Path=/; HttpOnly")],
            Json(json!({"success": true})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"statusCode": 401, "message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn profile(headers: HeaderMap) -> Response {
    let signed_in = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.contains("sid=abc"))
        .unwrap_or(false);
    if signed_in {
        Json(json!({"_id": "u1", "userName": "aziz", "role": "user"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response()
    }
}

async fn check_username(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("username").map(String::as_str) == Some("taken") {
        (StatusCode::CONFLICT, Json(json!({"message": "Username already exists"}))).into_response()
    } else {
        Json(json!({"available": true})).into_response()
    }
}

async fn list_categories(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(json!({"success": true, "data": state.categories}))
}

async fn create_category(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let created = json!({
        "_id": format!("c{}", state.categories.len() + 1),
        "name": body["name"],
    });
    state.categories.push(created.clone());
    (StatusCode::CREATED, Json(json!({"data": created}))).into_response()
}

async fn list_posts(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.post_queries.push(params);
    Json(Value::Array(state.category_posts.clone()))
}

async fn toggle_like(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.like_calls += 1;
    if let Some(pos) = state.likes.iter().position(|u| u == "u1") {
        state.likes.remove(pos);
    } else {
        state.likes.push("u1".to_string());
    }
    Json(json!({"data": {"_id": id, "title": "Hello", "likes": state.likes}}))
}

#[test]
fn session_cookie_carries_over_to_profile() {
    let (base, _state) = spawn_server();
    let api = client(&base);

    let anonymous = api.get_profile().expect_err("no session yet");
    assert!(anonymous.is_unauthorized());

    api.login(&LoginInput {
        user_name: "aziz".into(),
        password: "secret".into(),
    })
    .expect("login");
    let user = api.get_profile().expect("profile");
    assert_eq!(user.user_name, "aziz");
    assert!(!user.is_admin());
}

#[test]
fn wrong_password_reports_server_message() {
    let (base, _state) = spawn_server();
    let err = client(&base)
        .login(&LoginInput {
            user_name: "aziz".into(),
            password: "nope".into(),
        })
        .expect_err("rejected");
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
}

#[test]
fn like_twice_adopts_each_server_response() {
    let (base, state) = spawn_server();
    let api = client(&base);
    let mut posts = ListSlice::default();
    posts.settle(Ok(vec![serde_json::from_value::<Post>(
        json!({"_id": "p1", "title": "Hello", "likes": []}),
    )
    .unwrap()]));

    let first = api.toggle_like("p1").expect("first like");
    posts.patch("p1", |p| p.likes = first.likes.clone());
    assert_eq!(posts.get("p1").map(Post::like_count), Some(1));

    let second = api.toggle_like("p1").expect("second like");
    posts.patch("p1", |p| p.likes = second.likes.clone());
    assert_eq!(posts.get("p1").map(Post::like_count), Some(0));
    assert_eq!(state.lock().unwrap().like_calls, 2);
}

#[test]
fn created_category_appears_after_refetch() {
    let (base, _state) = spawn_server();
    let api = client(&base);
    api.create_category("Rust").expect("create");
    let categories = api.list_categories().expect("list");
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Programming", "Rust"]);
}

#[test]
fn feed_filter_reaches_the_list_request() {
    let (base, state) = spawn_server();
    let api = client(&base);
    let categories: Vec<Category> = api.list_categories().expect("categories");

    let filter = FeedFilter::default()
        .with_category("Programming")
        .with_search("react");
    let ListRequest::Ready(query) = filter.list_request(Some(&categories)) else {
        panic!("categories loaded");
    };
    api.list_posts(&query).expect("filtered");

    let ListRequest::Ready(query) = filter.with_search("").list_request(Some(&categories)) else {
        panic!("categories loaded");
    };
    api.list_posts(&query).expect("category only");
    api.list_posts(&PostQuery::popular(5)).expect("top picks");

    let seen = state.lock().unwrap().post_queries.clone();
    assert_eq!(seen[0].get("category").map(String::as_str), Some("c1"));
    assert_eq!(seen[0].get("search").map(String::as_str), Some("react"));
    assert_eq!(seen[1].get("category").map(String::as_str), Some("c1"));
    assert_eq!(seen[1].get("search"), None);
    assert_eq!(seen[2].get("sort").map(String::as_str), Some("popular"));
    assert_eq!(seen[2].get("limit").map(String::as_str), Some("5"));
}

#[test]
fn username_conflict_means_taken() {
    let (base, _state) = spawn_server();
    let api = client(&base);
    assert_eq!(api.check_username("taken").expect("check"), false);
    assert_eq!(api.check_username("fresh").expect("check"), true);
}
