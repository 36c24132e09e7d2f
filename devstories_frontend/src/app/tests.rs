use std::time::{Duration, Instant};

use devstories_core::location::{FeedFilter, Route};
use devstories_core::models::{Category, Comment, Post, Role, User, UserRef};
use devstories_core::{ApiClient, ApiError, ClientConfig};
use pretty_assertions::assert_eq;

use super::messages::{apply_message, AppMessage};
use super::state::{FeedState, PostDetailState, ViewState};
use super::ui::UiAction;
use super::DevStoriesApp;

// Nothing listens on the discard port, so background reads fail fast and
// their results are never drained by these tests.
fn app_at(location: &str) -> DevStoriesApp {
    let config = ClientConfig {
        username_debounce: Duration::from_secs(60),
        ..ClientConfig::default().with_api_url("http://127.0.0.1:9/api")
    };
    let api = ApiClient::from_config(&config).expect("client");
    DevStoriesApp::with_api(api, config, location)
}

fn user(id: &str, role: Role) -> User {
    User {
        id: id.into(),
        user_name: format!("user-{id}"),
        role,
        ..User::default()
    }
}

fn post(id: &str, likes: &[&str]) -> Post {
    Post {
        id: id.into(),
        title: format!("Story {id}"),
        content: "Body".into(),
        author: Some(UserRef::Id("u1".into())),
        categories: Vec::new(),
        cover_image: None,
        likes: likes.iter().map(|l| UserRef::Id(l.to_string())).collect(),
        is_active: true,
        created_at: None,
    }
}

fn comment(id: &str) -> Comment {
    Comment {
        id: id.into(),
        content: "Nice".into(),
        author: Some(UserRef::Id("u1".into())),
        post: None,
        created_at: None,
    }
}

fn signed_in(app: &mut DevStoriesApp, user: User) {
    let generation = app.session.generation();
    apply_message(
        app,
        AppMessage::SessionLoaded {
            generation,
            result: Ok(user),
        },
    );
}

fn feed(app: &DevStoriesApp) -> &FeedState {
    match &app.view {
        ViewState::Feed(state) => state,
        _ => panic!("expected the feed screen"),
    }
}

fn toasts(app: &mut DevStoriesApp) -> Vec<String> {
    app.notifications
        .visible(Instant::now())
        .map(|t| t.message.clone())
        .collect()
}

#[test]
fn results_for_a_previous_screen_are_dropped() {
    let mut app = app_at("/feed");
    let stale = app.epoch.ticket();
    app.navigate(Route::Feed(FeedFilter::default().with_search("rust")));

    apply_message(
        &mut app,
        AppMessage::PostsLoaded {
            ticket: stale,
            result: Ok(vec![post("old", &[])]),
        },
    );
    assert!(feed(&app).posts.is_empty());

    let current = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::PostsLoaded {
            ticket: current,
            result: Ok(vec![post("p1", &[])]),
        },
    );
    assert_eq!(feed(&app).posts.len(), 1);
}

#[test]
fn one_failed_feed_read_leaves_the_others_populated() {
    let mut app = app_at("/feed");
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::CategoriesLoaded {
            ticket,
            result: Err(ApiError::Status {
                status: 500,
                message: None,
            }),
        },
    );
    apply_message(
        &mut app,
        AppMessage::TopPostsLoaded {
            ticket,
            result: Ok(vec![post("top", &[])]),
        },
    );
    apply_message(
        &mut app,
        AppMessage::PostsLoaded {
            ticket,
            result: Ok(vec![post("p1", &[]), post("p2", &[])]),
        },
    );
    let state = feed(&app);
    assert!(state.categories.error.is_some());
    assert_eq!(state.top_posts.len(), 1);
    assert_eq!(state.posts.len(), 2);
}

#[test]
fn category_filter_waits_for_categories() {
    let mut app = app_at("/feed?category=Programming");
    assert!(feed(&app).list_waiting);

    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::CategoriesLoaded {
            ticket,
            result: Ok(vec![Category {
                id: "c1".into(),
                name: "Programming".into(),
            }]),
        },
    );
    let state = feed(&app);
    assert!(!state.list_waiting);
    assert!(state.posts.loading);
}

#[test]
fn changing_the_filter_keeps_loaded_categories() {
    let mut app = app_at("/feed");
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::CategoriesLoaded {
            ticket,
            result: Ok(vec![Category {
                id: "c1".into(),
                name: "Programming".into(),
            }]),
        },
    );
    app.apply_action(UiAction::Navigate(Route::Feed(
        FeedFilter::default().with_category("Programming"),
    )));
    let state = feed(&app);
    assert_eq!(state.categories.len(), 1);
    assert!(!state.categories.loading);
    assert!(!state.list_waiting);
    assert_eq!(app.route.to_location(), "/feed?category=Programming");
}

#[test]
fn admin_route_waits_then_sends_non_admin_to_feed() {
    let mut app = app_at("/admin");
    assert!(matches!(app.view, ViewState::Loading));

    signed_in(&mut app, user("u1", Role::User));
    assert_eq!(app.route, Route::feed());
    assert_eq!(
        toasts(&mut app),
        vec!["The dashboard is for administrators only".to_string()]
    );
}

#[test]
fn admin_route_without_session_goes_to_login() {
    let mut app = app_at("/admin");
    let generation = app.session.generation();
    apply_message(
        &mut app,
        AppMessage::SessionLoaded {
            generation,
            result: Err(ApiError::Unauthorized { message: None }),
        },
    );
    assert_eq!(app.route, Route::Login);
    assert!(matches!(app.view, ViewState::Login(_)));
}

#[test]
fn admin_sees_dashboard() {
    let mut app = app_at("/admin");
    signed_in(&mut app, user("u1", Role::Admin));
    assert!(matches!(app.view, ViewState::Admin(_)));
}

#[test]
fn like_adopts_the_server_likes() {
    let mut app = app_at("/feed");
    signed_in(&mut app, user("u1", Role::User));
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::PostsLoaded {
            ticket,
            result: Ok(vec![post("p1", &[]), post("p2", &[])]),
        },
    );
    apply_message(
        &mut app,
        AppMessage::TopPostsLoaded {
            ticket,
            result: Ok(vec![post("p1", &[])]),
        },
    );

    apply_message(
        &mut app,
        AppMessage::LikeToggled {
            post_id: "p1".into(),
            result: Ok(post("p1", &["u1", "u7"])),
        },
    );
    let state = feed(&app);
    assert_eq!(state.posts.get("p1").map(Post::like_count), Some(2));
    assert_eq!(state.top_posts.get("p1").map(Post::like_count), Some(2));
    assert_eq!(state.posts.get("p2").map(Post::like_count), Some(0));
    assert!(state.posts.get("p1").is_some_and(|p| p.is_liked_by(Some("u1"))));
}

#[test]
fn failed_like_changes_nothing() {
    let mut app = app_at("/feed");
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::PostsLoaded {
            ticket,
            result: Ok(vec![post("p1", &["u2"])]),
        },
    );
    apply_message(
        &mut app,
        AppMessage::LikeToggled {
            post_id: "p1".into(),
            result: Err(ApiError::Unauthorized { message: None }),
        },
    );
    assert_eq!(feed(&app).posts.get("p1").map(Post::like_count), Some(1));
    assert_eq!(toasts(&mut app), vec!["Could not update the like".to_string()]);
}

#[test]
fn deleted_comment_is_removed_by_id() {
    let mut app = app_at("/posts/p1");
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::PostLoaded {
            ticket,
            result: Ok(post("p1", &[])),
        },
    );
    apply_message(
        &mut app,
        AppMessage::CommentsLoaded {
            ticket,
            post_id: "p1".into(),
            result: Ok(vec![comment("c1"), comment("c2"), comment("c3")]),
        },
    );
    apply_message(
        &mut app,
        AppMessage::CommentDeleted {
            comment_id: "c2".into(),
            result: Ok(()),
        },
    );
    let ViewState::Post(state) = &app.view else {
        panic!("expected the post screen");
    };
    let ids: Vec<_> = state.comments.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c3"]);
}

#[test]
fn wrong_password_stays_on_login_with_server_message() {
    let mut app = app_at("/login");
    apply_message(
        &mut app,
        AppMessage::LoggedIn(Err(ApiError::Unauthorized {
            message: Some("Invalid credentials".into()),
        })),
    );
    assert_eq!(app.route, Route::Login);
    let ViewState::Login(state) = &app.view else {
        panic!("expected the login screen");
    };
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert!(!state.submitting);
}

#[test]
fn register_conflict_is_shown_next_to_the_field() {
    let mut app = app_at("/register");
    apply_message(
        &mut app,
        AppMessage::Registered(Err(ApiError::Conflict {
            message: Some("Email already registered".into()),
        })),
    );
    let ViewState::Register(state) = &app.view else {
        panic!("expected the register screen");
    };
    assert_eq!(
        state.field_errors.get("email").map(String::as_str),
        Some("Email already registered")
    );
    assert_eq!(state.error, None);
}

#[test]
fn logout_clears_session_and_goes_to_login() {
    let mut app = app_at("/profile");
    signed_in(&mut app, user("u1", Role::User));
    assert!(matches!(app.view, ViewState::Profile(_)));

    app.apply_action(UiAction::Logout);
    assert_eq!(app.route, Route::Login);
    assert!(app.session.user().is_none());
    apply_message(
        &mut app,
        AppMessage::LoggedOut(Err(ApiError::Status {
            status: 500,
            message: None,
        })),
    );
    assert_eq!(app.route, Route::Login);
}

#[test]
fn superseded_username_check_is_ignored() {
    let mut app = app_at("/profile");
    signed_in(&mut app, user("u1", Role::User));
    app.apply_action(UiAction::OpenProfileEditor);
    if let Some(edit) = app.profile_edit() {
        edit.user_name = "taken".into();
    }
    app.apply_action(UiAction::UsernameEdited);

    let latest = app.username_check.schedule(|_| {});
    apply_message(
        &mut app,
        AppMessage::UsernameChecked {
            generation: latest - 1,
            result: Ok(true),
        },
    );
    assert!(app.profile_edit().is_some_and(|e| e.validating));

    apply_message(
        &mut app,
        AppMessage::UsernameChecked {
            generation: latest,
            result: Ok(false),
        },
    );
    let edit = app.profile_edit().expect("editor open");
    assert_eq!(edit.username_error.as_deref(), Some("Username is already taken"));
    assert!(!edit.can_save());
}

#[test]
fn deleting_a_category_drops_it_and_refetches() {
    let mut app = app_at("/admin");
    signed_in(&mut app, user("u1", Role::Admin));
    let ticket = app.epoch.ticket();
    apply_message(
        &mut app,
        AppMessage::CategoriesLoaded {
            ticket,
            result: Ok(vec![
                Category {
                    id: "c1".into(),
                    name: "Rust".into(),
                },
                Category {
                    id: "c2".into(),
                    name: "Go".into(),
                },
            ]),
        },
    );
    apply_message(
        &mut app,
        AppMessage::CategoryChanged {
            removed: Some("c2".into()),
            result: Ok(()),
        },
    );
    let ViewState::Admin(state) = &app.view else {
        panic!("expected the dashboard");
    };
    assert!(state.categories.get("c2").is_none());
    assert!(state.categories.get("c1").is_some());
    assert!(state.categories.loading);
}

#[test]
fn startup_profile_read_cannot_undo_a_login() {
    let mut app = app_at("/login");
    let startup = app.session.generation();
    apply_message(&mut app, AppMessage::LoggedIn(Ok(())));
    apply_message(
        &mut app,
        AppMessage::SessionLoaded {
            generation: startup,
            result: Err(ApiError::Unauthorized { message: None }),
        },
    );
    signed_in(&mut app, user("u1", Role::User));

    assert_eq!(app.session.user_id(), Some("u1"));
    app.navigate(Route::Profile);
    assert_eq!(app.route, Route::Profile);
    assert!(matches!(app.view, ViewState::Profile(_)));
}

#[test]
fn profile_refresh_cannot_sign_back_in_after_logout() {
    let mut app = app_at("/profile");
    signed_in(&mut app, user("u1", Role::User));
    app.apply_action(UiAction::OpenProfileEditor);
    apply_message(&mut app, AppMessage::ProfileUpdated(Ok(user("u1", Role::User))));
    let refresh = app.session.generation();
    assert_eq!(app.session.user_id(), Some("u1"));

    app.apply_action(UiAction::Logout);
    apply_message(
        &mut app,
        AppMessage::SessionLoaded {
            generation: refresh,
            result: Ok(user("u1", Role::User)),
        },
    );
    assert!(app.session.user().is_none());
    assert_eq!(app.route, Route::Login);
}

#[test]
fn search_box_keeps_the_text_as_typed() {
    let mut app = app_at("/feed");
    if let ViewState::Feed(state) = &mut app.view {
        state.search_input = " ".into();
    }
    let filter = feed(&app).filter.with_search(" ");
    app.apply_action(UiAction::ReplaceRoute(Route::Feed(filter)));

    let state = feed(&app);
    assert_eq!(state.search_input, " ");
    assert_eq!(state.filter.search_text(), "");
    assert_eq!(app.route.to_location(), "/feed");
}

#[test]
fn post_screen_shows_comments_loading() {
    let app = app_at("/posts/p1");
    let ViewState::Post(PostDetailState { comments, .. }) = &app.view else {
        panic!("expected the post screen");
    };
    assert!(comments.loading);
}
