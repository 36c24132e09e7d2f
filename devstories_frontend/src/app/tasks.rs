use devstories_core::api::PostQuery;
use devstories_core::models::{LoginInput, PostInput, RegisterInput, Role, UpdateUserInput};
use devstories_core::sync::{Debouncer, FetchOrchestrator, Job, ViewTicket};
use devstories_core::ApiClient;
use log::info;

use super::messages::AppMessage;
use super::state::LoadedImage;

type Fetch = FetchOrchestrator<AppMessage>;

pub fn load_session(fetch: &Fetch, client: ApiClient, generation: u64) {
    fetch.spawn("session", move || AppMessage::SessionLoaded {
        generation,
        result: client.get_profile(),
    });
}

pub fn login(fetch: &Fetch, client: ApiClient, input: LoginInput) {
    fetch.spawn("login", move || AppMessage::LoggedIn(client.login(&input)));
}

pub fn register(fetch: &Fetch, client: ApiClient, input: RegisterInput) {
    fetch.spawn("register", move || AppMessage::Registered(client.register(&input)));
}

pub fn logout(fetch: &Fetch, client: ApiClient) {
    fetch.spawn("logout", move || AppMessage::LoggedOut(client.logout()));
}

pub fn load_categories(fetch: &Fetch, client: ApiClient, ticket: ViewTicket) {
    fetch.spawn("categories", move || AppMessage::CategoriesLoaded {
        ticket,
        result: client.list_categories(),
    });
}

pub fn load_posts(fetch: &Fetch, client: ApiClient, ticket: ViewTicket, query: PostQuery) {
    fetch.spawn("posts", move || AppMessage::PostsLoaded {
        ticket,
        result: client.list_posts(&query),
    });
}

pub fn load_top_posts(fetch: &Fetch, client: ApiClient, ticket: ViewTicket, query: PostQuery) {
    fetch.spawn("top-posts", move || AppMessage::TopPostsLoaded {
        ticket,
        result: client.list_posts(&query),
    });
}

pub fn load_post(fetch: &Fetch, client: ApiClient, ticket: ViewTicket, post_id: String) {
    fetch.spawn("post", move || AppMessage::PostLoaded {
        ticket,
        result: client.get_post(&post_id),
    });
}

/// The post, then its comments. Comments are only read once the post exists.
pub fn load_post_with_comments(
    fetch: &Fetch,
    client: ApiClient,
    ticket: ViewTicket,
    post_id: String,
) {
    fetch.spawn_sequence("post-detail", move |deliver| {
        let result = client.get_post(&post_id);
        let found = result.is_ok();
        deliver(AppMessage::PostLoaded { ticket, result });
        if found {
            deliver(AppMessage::CommentsLoaded {
                ticket,
                result: client.list_comments(&post_id),
                post_id,
            });
        }
    });
}

pub fn load_comments(fetch: &Fetch, client: ApiClient, ticket: ViewTicket, post_id: String) {
    fetch.spawn("comments", move || AppMessage::CommentsLoaded {
        ticket,
        result: client.list_comments(&post_id),
        post_id,
    });
}

pub fn load_user(fetch: &Fetch, client: ApiClient, ticket: ViewTicket, user_id: String) {
    fetch.spawn("user", move || AppMessage::UserLoaded {
        ticket,
        result: client.get_user(&user_id),
    });
}

pub fn load_users(fetch: &Fetch, client: ApiClient, ticket: ViewTicket) {
    fetch.spawn("users", move || AppMessage::UsersLoaded {
        ticket,
        result: client.list_users(),
    });
}

/// Users, posts and categories for the dashboard, read side by side.
pub fn load_dashboard(fetch: &Fetch, client: ApiClient, ticket: ViewTicket) {
    let users = client.clone();
    let posts = client.clone();
    let jobs: [(&'static str, Job<AppMessage>); 3] = [
        (
            "users",
            Box::new(move || AppMessage::UsersLoaded {
                ticket,
                result: users.list_users(),
            }),
        ),
        (
            "posts",
            Box::new(move || AppMessage::PostsLoaded {
                ticket,
                result: posts.list_posts(&PostQuery::default()),
            }),
        ),
        (
            "categories",
            Box::new(move || AppMessage::CategoriesLoaded {
                ticket,
                result: client.list_categories(),
            }),
        ),
    ];
    fetch.spawn_all(jobs);
}

pub fn toggle_like(fetch: &Fetch, client: ApiClient, post_id: String) {
    fetch.spawn("like", move || AppMessage::LikeToggled {
        result: client.toggle_like(&post_id),
        post_id,
    });
}

pub fn save_post(fetch: &Fetch, client: ApiClient, editing: Option<String>, input: PostInput) {
    fetch.spawn("save-post", move || {
        let result = match editing.as_deref() {
            Some(post_id) => client.update_post(post_id, &input),
            None => client.create_post(&input),
        };
        AppMessage::PostSaved { editing, result }
    });
}

pub fn delete_post(fetch: &Fetch, client: ApiClient, post_id: String) {
    fetch.spawn("delete-post", move || AppMessage::PostDeleted {
        result: client.delete_post(&post_id),
        post_id,
    });
}

pub fn set_post_status(fetch: &Fetch, client: ApiClient, post_id: String, is_active: bool) {
    fetch.spawn("post-status", move || AppMessage::PostStatusChanged {
        result: client.set_post_status(&post_id, is_active),
        post_id,
    });
}

pub fn create_comment(fetch: &Fetch, client: ApiClient, post_id: String, content: String) {
    fetch.spawn("create-comment", move || AppMessage::CommentCreated {
        result: client.create_comment(&post_id, &content),
        post_id,
    });
}

pub fn delete_comment(fetch: &Fetch, client: ApiClient, comment_id: String) {
    fetch.spawn("delete-comment", move || AppMessage::CommentDeleted {
        result: client.delete_comment(&comment_id),
        comment_id,
    });
}

pub fn delete_user(fetch: &Fetch, client: ApiClient, user_id: String) {
    fetch.spawn("delete-user", move || AppMessage::UserDeleted {
        result: client.delete_user(&user_id),
        user_id,
    });
}

pub fn change_role(fetch: &Fetch, client: ApiClient, user_id: String, role: Role) {
    fetch.spawn("change-role", move || {
        let input = UpdateUserInput {
            role: Some(role),
            ..UpdateUserInput::default()
        };
        AppMessage::RoleChanged {
            result: client.update_user(&user_id, &input),
            user_id,
        }
    });
}

pub fn create_category(fetch: &Fetch, client: ApiClient, name: String) {
    fetch.spawn("create-category", move || AppMessage::CategoryChanged {
        removed: None,
        result: client.create_category(&name),
    });
}

pub fn rename_category(fetch: &Fetch, client: ApiClient, category_id: String, name: String) {
    fetch.spawn("rename-category", move || AppMessage::CategoryChanged {
        removed: None,
        result: client.rename_category(&category_id, &name),
    });
}

pub fn delete_category(fetch: &Fetch, client: ApiClient, category_id: String) {
    fetch.spawn("delete-category", move || AppMessage::CategoryChanged {
        result: client.delete_category(&category_id),
        removed: Some(category_id),
    });
}

pub fn update_profile(fetch: &Fetch, client: ApiClient, user_id: String, input: UpdateUserInput) {
    fetch.spawn("update-profile", move || {
        AppMessage::ProfileUpdated(client.update_user(&user_id, &input))
    });
}

/// Schedules an availability check that a later keystroke supersedes.
pub fn check_username(debouncer: &Debouncer, fetch: &Fetch, client: ApiClient, username: String) {
    let fetch = fetch.clone();
    debouncer.schedule(move |generation| {
        info!("checking availability of {username:?}");
        fetch.spawn("check-username", move || AppMessage::UsernameChecked {
            generation,
            result: client.check_username(&username),
        });
    });
}

pub fn download_image(fetch: &Fetch, client: ApiClient, url: String) {
    fetch.spawn("image", move || {
        let result = client
            .download(&url)
            .map_err(|e| format!("Download error: {e}"))
            .and_then(|bytes| {
                let dyn_img = image::load_from_memory(&bytes)
                    .map_err(|e| format!("Image decode error: {e}"))?;
                let rgba = dyn_img.to_rgba8();
                Ok(LoadedImage {
                    size: [dyn_img.width() as usize, dyn_img.height() as usize],
                    pixels: rgba.into_raw(),
                })
            });
        AppMessage::ImageLoaded { url, result }
    });
}
