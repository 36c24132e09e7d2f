use serde::{Deserialize, Serialize};

/// Records that can be located in a local list by identity.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Other => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "username")]
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn display_name(&self) -> &str {
        if self.user_name.is_empty() {
            "Anonymous"
        } else {
            &self.user_name
        }
    }

    pub fn initial(&self) -> String {
        self.user_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// A user that the server may send either embedded or as a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    User(User),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::User(user) => &user.id,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            UserRef::Id(_) => None,
            UserRef::User(user) => Some(user),
        }
    }

    pub fn display_name(&self) -> &str {
        self.user().map(User::display_name).unwrap_or("Anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Category(Category),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Category(category) => &category.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Category(category) => Some(&category.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub likes: Vec<UserRef>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Post {
    pub fn is_liked_by(&self, user_id: Option<&str>) -> bool {
        match user_id {
            Some(id) => self.likes.iter().any(|like| like.id() == id),
            None => false,
        }
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(UserRef::id)
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(UserRef::display_name)
            .unwrap_or("Anonymous")
    }

    /// First `max_chars` characters of the body, with an ellipsis when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .and_then(CategoryRef::name)
            .unwrap_or("Story")
    }

    pub fn category_ids(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    /// Absolute cover image URL. Relative paths are served from the API host,
    /// not from under the API prefix.
    pub fn cover_url(&self, api_base: &str) -> Option<String> {
        let cover = self.cover_image.as_deref()?.trim();
        if cover.is_empty() {
            return None;
        }
        if cover.starts_with("http://") || cover.starts_with("https://") {
            return Some(cover.to_string());
        }
        let host = api_base
            .strip_suffix("/api")
            .unwrap_or(api_base)
            .trim_end_matches('/');
        if cover.starts_with('/') {
            Some(format!("{host}{cover}"))
        } else {
            Some(format!("{host}/{cover}"))
        }
    }

    pub fn can_manage(&self, viewer: Option<&User>) -> bool {
        match viewer {
            Some(user) => user.is_admin() || self.author_id() == Some(user.id.as_str()),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostRef {
    Id(String),
    Post {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl PostRef {
    pub fn id(&self) -> &str {
        match self {
            PostRef::Id(id) => id,
            PostRef::Post { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub post: Option<PostRef>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Comment {
    pub fn can_delete(&self, viewer: Option<&User>) -> bool {
        match viewer {
            Some(user) => {
                user.is_admin() || self.author.as_ref().map(UserRef::id) == Some(user.id.as_str())
            }
            None => false,
        }
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Post {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Category {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Comment {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub user_name: String,
    pub age: u32,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentInput {
    pub content: String,
    pub post: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatusInput {
    pub is_active: bool,
}
