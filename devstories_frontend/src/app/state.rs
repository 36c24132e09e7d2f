use std::collections::{BTreeSet, HashMap};

use devstories_core::location::FeedFilter;
use devstories_core::models::{Category, Comment, Post, User};
use devstories_core::sync::ListSlice;

pub enum ViewState {
    Landing,
    /// Waiting for the session before a protected screen can be shown.
    Loading,
    Login(LoginState),
    Register(RegisterState),
    Feed(FeedState),
    Post(PostDetailState),
    Editor(EditorState),
    Profile(ProfileState),
    UserProfile(UserProfileState),
    Admin(AdminState),
    NotFound(String),
}

#[derive(Default)]
pub struct LoginState {
    pub user_name: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct RegisterState {
    pub user_name: String,
    pub age: String,
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
    pub field_errors: HashMap<&'static str, String>,
}

pub struct FeedState {
    pub filter: FeedFilter,
    pub search_input: String,
    pub categories: ListSlice<Category>,
    pub posts: ListSlice<Post>,
    pub top_posts: ListSlice<Post>,
    /// The list read is held until categories arrive to resolve the filter.
    pub list_waiting: bool,
}

impl FeedState {
    pub fn new(filter: FeedFilter) -> Self {
        Self {
            search_input: filter.search_text().to_string(),
            filter,
            categories: ListSlice::default(),
            posts: ListSlice::default(),
            top_posts: ListSlice::default(),
            list_waiting: false,
        }
    }
}

pub struct PostDetailState {
    pub post_id: String,
    pub post: Option<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub comments: ListSlice<Comment>,
    pub new_comment: String,
    pub comment_sending: bool,
    pub comment_error: Option<String>,
}

impl PostDetailState {
    pub fn new(post_id: String) -> Self {
        Self {
            post_id,
            post: None,
            loading: true,
            error: None,
            comments: ListSlice::default(),
            new_comment: String::new(),
            comment_sending: false,
            comment_error: None,
        }
    }
}

#[derive(Default)]
pub struct EditorState {
    pub editing: Option<String>,
    pub title: String,
    pub content: String,
    pub cover_image: String,
    pub selected: BTreeSet<String>,
    pub categories: ListSlice<Category>,
    pub loading_post: bool,
    pub submitting: bool,
    pub show_categories: bool,
    pub preview: bool,
    pub error: Option<String>,
}

impl EditorState {
    pub fn for_post(post_id: Option<String>) -> Self {
        Self {
            loading_post: post_id.is_some(),
            editing: post_id,
            ..Self::default()
        }
    }

    pub fn fill_from(&mut self, post: &Post) {
        self.title = post.title.clone();
        self.content = post.content.clone();
        self.cover_image = post.cover_image.clone().unwrap_or_default();
        self.selected = post.category_ids().into_iter().collect();
    }
}

#[derive(Default)]
pub struct ProfileState {
    pub posts: ListSlice<Post>,
    pub edit: Option<ProfileEditState>,
}

#[derive(Default)]
pub struct ProfileEditState {
    pub user_name: String,
    pub age: String,
    pub validating: bool,
    pub username_error: Option<String>,
    pub age_error: Option<String>,
    pub saving: bool,
    pub error: Option<String>,
}

impl ProfileEditState {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_name: user.user_name.clone(),
            age: user.age.map(|a| a.to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn can_save(&self) -> bool {
        !self.saving
            && !self.validating
            && self.username_error.is_none()
            && !self.user_name.trim().is_empty()
    }
}

pub struct UserProfileState {
    pub user_id: String,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub posts: ListSlice<Post>,
}

impl UserProfileState {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            user: None,
            loading: true,
            error: None,
            posts: ListSlice::default(),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Users,
    Posts,
    Categories,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteUser { id: String, name: String },
    DeletePost { id: String, title: String },
    DeleteCategory { id: String, name: String },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::DeleteUser { name, .. } => {
                format!("Delete the user \"{name}\" permanently?")
            }
            ConfirmAction::DeletePost { title, .. } => format!("Delete the story \"{title}\"?"),
            ConfirmAction::DeleteCategory { name, .. } => {
                format!("Delete the category \"{name}\"?")
            }
        }
    }
}

#[derive(Default)]
pub struct AdminState {
    pub tab: AdminTab,
    pub users: ListSlice<User>,
    pub posts: ListSlice<Post>,
    pub categories: ListSlice<Category>,
    pub new_category: String,
    pub renaming: Option<(String, String)>,
}

#[derive(Clone)]
pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}
