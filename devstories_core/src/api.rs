use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{
    Category, CategoryInput, Comment, CommentInput, LoginInput, Post, PostInput, PostStatusInput,
    RegisterInput, UpdateUserInput, User,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Latest,
    Popular,
}

impl PostSort {
    fn as_str(&self) -> &'static str {
        match self {
            PostSort::Latest => "latest",
            PostSort::Popular => "popular",
        }
    }
}

/// Query parameters accepted by `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<PostSort>,
    pub limit: Option<u32>,
    pub author: Option<String>,
}

impl PostQuery {
    pub fn popular(limit: u32) -> Self {
        Self {
            sort: Some(PostSort::Popular),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn by_author(author_id: impl Into<String>) -> Self {
        Self {
            author: Some(author_id.into()),
            ..Self::default()
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            pairs.push(("author", author.to_string()));
        }
        pairs
    }
}

/// Accepts both `{ "data": T }` and a bare `T`.
///
/// A present, non-null `data` that fits `T` wins; anything else is read as the
/// payload itself.
pub fn unwrap_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)?
    };
    if let Some(inner) = value.get("data").filter(|d| !d.is_null()) {
        if let Ok(parsed) = T::deserialize(inner) {
            return Ok(parsed);
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<(), ApiError> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    // Session

    pub fn login(&self, input: &LoginInput) -> Result<(), ApiError> {
        let url = self.url("/auth/login")?;
        self.send_empty(self.client.post(url).json(input))
    }

    pub fn register(&self, input: &RegisterInput) -> Result<(), ApiError> {
        let url = self.url("/auth/register")?;
        self.send_empty(self.client.post(url).json(input))
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let url = self.url("/users/logout")?;
        self.send_empty(self.client.post(url))
    }

    // Users

    pub fn get_profile(&self) -> Result<User, ApiError> {
        let url = self.url("/users/profile")?;
        self.send(self.client.get(url))
    }

    pub fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let url = self.url(&format!("/users/{user_id}"))?;
        self.send(self.client.get(url))
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/users")?;
        self.send(self.client.get(url))
    }

    pub fn update_user(&self, user_id: &str, input: &UpdateUserInput) -> Result<User, ApiError> {
        let url = self.url(&format!("/users/{user_id}"))?;
        self.send(self.client.patch(url).json(input))
    }

    pub fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{user_id}"))?;
        self.send_empty(self.client.delete(url))
    }

    /// `Ok(true)` when the name is free, `Ok(false)` when the server reports a conflict.
    pub fn check_username(&self, username: &str) -> Result<bool, ApiError> {
        let mut url = self.url("/users/check-username")?;
        url.query_pairs_mut().append_pair("username", username);
        match self.send_empty(self.client.get(url)) {
            Ok(()) => Ok(true),
            Err(err) if err.is_conflict() => Ok(false),
            Err(err) => Err(err),
        }
    }

    // Posts

    pub fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, ApiError> {
        let mut url = self.url("/posts")?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in &pairs {
                serializer.append_pair(key, value);
            }
        }
        self.send(self.client.get(url))
    }

    pub fn get_post(&self, post_id: &str) -> Result<Post, ApiError> {
        let url = self.url(&format!("/posts/{post_id}"))?;
        self.send(self.client.get(url))
    }

    pub fn create_post(&self, input: &PostInput) -> Result<Post, ApiError> {
        let url = self.url("/posts")?;
        self.send(self.client.post(url).json(input))
    }

    pub fn update_post(&self, post_id: &str, input: &PostInput) -> Result<Post, ApiError> {
        let url = self.url(&format!("/posts/{post_id}"))?;
        self.send(self.client.patch(url).json(input))
    }

    pub fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/posts/{post_id}"))?;
        self.send_empty(self.client.delete(url))
    }

    /// Flips the caller's like server-side and returns the post as the server now sees it.
    pub fn toggle_like(&self, post_id: &str) -> Result<Post, ApiError> {
        let url = self.url(&format!("/posts/{post_id}/like"))?;
        self.send(self.client.post(url))
    }

    pub fn set_post_status(&self, post_id: &str, is_active: bool) -> Result<(), ApiError> {
        let url = self.url(&format!("/posts/{post_id}/status"))?;
        self.send_empty(self.client.patch(url).json(&PostStatusInput { is_active }))
    }

    // Categories

    pub fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.url("/categories")?;
        self.send(self.client.get(url))
    }

    pub fn create_category(&self, name: &str) -> Result<(), ApiError> {
        let url = self.url("/categories")?;
        let input = CategoryInput {
            name: name.to_string(),
        };
        self.send_empty(self.client.post(url).json(&input))
    }

    pub fn rename_category(&self, category_id: &str, name: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/categories/{category_id}"))?;
        let input = CategoryInput {
            name: name.to_string(),
        };
        self.send_empty(self.client.patch(url).json(&input))
    }

    pub fn delete_category(&self, category_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/categories/{category_id}"))?;
        self.send_empty(self.client.delete(url))
    }

    // Comments

    pub fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(&format!("/comments/post/{post_id}"))?;
        self.send(self.client.get(url))
    }

    pub fn create_comment(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let url = self.url("/comments")?;
        let input = CommentInput {
            content: content.to_string(),
            post: post_id.to_string(),
        };
        self.send(self.client.post(url).json(&input))
    }

    pub fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/comments/{comment_id}"))?;
        self.send_empty(self.client.delete(url))
    }

    /// Raw bytes from an absolute URL, sharing the session cookies.
    pub fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            return Err(ApiError::from_response(status, &bytes));
        }
        Ok(bytes.to_vec())
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send()?;
        let body = Self::checked_body(response)?;
        unwrap_envelope(&body)
    }

    fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send()?;
        Self::checked_body(response).map(|_| ())
    }

    fn checked_body(response: Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());
        let body = response.bytes()?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(ApiError::from_response(status, &body))
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String, ApiError> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base)?;
    Ok(base)
}
