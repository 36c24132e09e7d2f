use devstories_core::models::{Category, Comment, Post, User};
use devstories_core::sync::ViewTicket;
use devstories_core::ApiError;

use super::state::LoadedImage;
use super::DevStoriesApp;

pub enum AppMessage {
    SessionLoaded {
        generation: u64,
        result: Result<User, ApiError>,
    },
    LoggedIn(Result<(), ApiError>),
    Registered(Result<(), ApiError>),
    LoggedOut(Result<(), ApiError>),
    CategoriesLoaded {
        ticket: ViewTicket,
        result: Result<Vec<Category>, ApiError>,
    },
    PostsLoaded {
        ticket: ViewTicket,
        result: Result<Vec<Post>, ApiError>,
    },
    TopPostsLoaded {
        ticket: ViewTicket,
        result: Result<Vec<Post>, ApiError>,
    },
    PostLoaded {
        ticket: ViewTicket,
        result: Result<Post, ApiError>,
    },
    CommentsLoaded {
        ticket: ViewTicket,
        post_id: String,
        result: Result<Vec<Comment>, ApiError>,
    },
    UserLoaded {
        ticket: ViewTicket,
        result: Result<User, ApiError>,
    },
    UsersLoaded {
        ticket: ViewTicket,
        result: Result<Vec<User>, ApiError>,
    },
    LikeToggled {
        post_id: String,
        result: Result<Post, ApiError>,
    },
    PostSaved {
        editing: Option<String>,
        result: Result<Post, ApiError>,
    },
    PostDeleted {
        post_id: String,
        result: Result<(), ApiError>,
    },
    PostStatusChanged {
        post_id: String,
        result: Result<(), ApiError>,
    },
    CommentCreated {
        post_id: String,
        result: Result<Comment, ApiError>,
    },
    CommentDeleted {
        comment_id: String,
        result: Result<(), ApiError>,
    },
    UserDeleted {
        user_id: String,
        result: Result<(), ApiError>,
    },
    RoleChanged {
        user_id: String,
        result: Result<User, ApiError>,
    },
    CategoryChanged {
        removed: Option<String>,
        result: Result<(), ApiError>,
    },
    ProfileUpdated(Result<User, ApiError>),
    UsernameChecked {
        generation: u64,
        result: Result<bool, ApiError>,
    },
    ImageLoaded {
        url: String,
        result: Result<LoadedImage, String>,
    },
}

pub(super) fn process_messages(app: &mut DevStoriesApp) {
    while let Ok(message) = app.rx.try_recv() {
        apply_message(app, message);
    }
}

pub(super) fn apply_message(app: &mut DevStoriesApp, message: AppMessage) {
    match message {
        AppMessage::SessionLoaded { generation, result } => {
            app.handle_session_loaded(generation, result)
        }
        AppMessage::LoggedIn(result) => app.handle_logged_in(result),
        AppMessage::Registered(result) => app.handle_registered(result),
        AppMessage::LoggedOut(result) => app.handle_logged_out(result),
        AppMessage::CategoriesLoaded { ticket, result } => {
            if app.is_current(ticket, "categories") {
                app.handle_categories_loaded(result);
            }
        }
        AppMessage::PostsLoaded { ticket, result } => {
            if app.is_current(ticket, "posts") {
                app.handle_posts_loaded(result);
            }
        }
        AppMessage::TopPostsLoaded { ticket, result } => {
            if app.is_current(ticket, "top posts") {
                app.handle_top_posts_loaded(result);
            }
        }
        AppMessage::PostLoaded { ticket, result } => {
            if app.is_current(ticket, "post") {
                app.handle_post_loaded(result);
            }
        }
        AppMessage::CommentsLoaded {
            ticket,
            post_id,
            result,
        } => {
            if app.is_current(ticket, "comments") {
                app.handle_comments_loaded(&post_id, result);
            }
        }
        AppMessage::UserLoaded { ticket, result } => {
            if app.is_current(ticket, "user") {
                app.handle_user_loaded(result);
            }
        }
        AppMessage::UsersLoaded { ticket, result } => {
            if app.is_current(ticket, "users") {
                app.handle_users_loaded(result);
            }
        }
        AppMessage::LikeToggled { post_id, result } => app.handle_like_toggled(&post_id, result),
        AppMessage::PostSaved { editing, result } => app.handle_post_saved(editing, result),
        AppMessage::PostDeleted { post_id, result } => app.handle_post_deleted(&post_id, result),
        AppMessage::PostStatusChanged { post_id, result } => {
            app.handle_post_status_changed(&post_id, result)
        }
        AppMessage::CommentCreated { post_id, result } => {
            app.handle_comment_created(&post_id, result)
        }
        AppMessage::CommentDeleted { comment_id, result } => {
            app.handle_comment_deleted(&comment_id, result)
        }
        AppMessage::UserDeleted { user_id, result } => app.handle_user_deleted(&user_id, result),
        AppMessage::RoleChanged { user_id, result } => app.handle_role_changed(&user_id, result),
        AppMessage::CategoryChanged { removed, result } => {
            app.handle_category_changed(removed, result)
        }
        AppMessage::ProfileUpdated(result) => app.handle_profile_updated(result),
        AppMessage::UsernameChecked { generation, result } => {
            app.handle_username_checked(generation, result)
        }
        AppMessage::ImageLoaded { url, result } => app.handle_image_loaded(url, result),
    }
}
