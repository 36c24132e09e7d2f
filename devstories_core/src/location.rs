//! Navigable locations and the feed filter they carry.
//!
//! Filter state lives in the location's query string so that a location can be
//! copied, bookmarked, or restored on the next launch and still show the same
//! list.

use log::warn;
use url::form_urlencoded;

use crate::api::PostQuery;
use crate::models::Category;

pub const ALL_CATEGORIES: &str = "All";
pub const FEED_PAGE_SIZE: u32 = 20;
pub const TOP_PICKS: u32 = 5;

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Feed(FeedFilter),
    Post(String),
    CreatePost,
    EditPost(String),
    Profile,
    UserProfile(String),
    Admin,
    NotFound(String),
}

impl Default for Route {
    fn default() -> Self {
        Route::Feed(FeedFilter::default())
    }
}

impl Route {
    pub fn feed() -> Self {
        Route::Feed(FeedFilter::default())
    }

    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, query),
            None => (location, ""),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["feed"] => Route::Feed(FeedFilter::from_query(query)),
            ["create-post"] => Route::CreatePost,
            ["posts", id] => Route::Post(id.to_string()),
            ["posts", id, "edit"] => Route::EditPost(id.to_string()),
            ["profile"] => Route::Profile,
            ["profile", id] => Route::UserProfile(id.to_string()),
            ["admin"] => Route::Admin,
            _ => Route::NotFound(location.to_string()),
        }
    }

    pub fn to_location(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Feed(filter) => {
                let query = filter.to_query_string();
                if query.is_empty() {
                    "/feed".to_string()
                } else {
                    format!("/feed?{query}")
                }
            }
            Route::Post(id) => format!("/posts/{id}"),
            Route::CreatePost => "/create-post".to_string(),
            Route::EditPost(id) => format!("/posts/{id}/edit"),
            Route::Profile => "/profile".to_string(),
            Route::UserProfile(id) => format!("/profile/{id}"),
            Route::Admin => "/admin".to_string(),
            Route::NotFound(raw) => raw.clone(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing
            | Route::Login
            | Route::Register
            | Route::Feed(_)
            | Route::Post(_)
            | Route::UserProfile(_)
            | Route::NotFound(_) => Access::Public,
            Route::CreatePost | Route::EditPost(_) | Route::Profile => Access::Authenticated,
            Route::Admin => Access::Admin,
        }
    }
}

/// Category and search selection of the feed. `None` means "not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// What the feed should request for the current filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    Ready(PostQuery),
    /// A category is selected but names cannot be resolved to ids yet.
    AwaitingCategories,
}

impl FeedFilter {
    pub fn from_query(query: &str) -> Self {
        let mut filter = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "category" => filter.category = normalize_category(&value),
                "search" => filter.search = normalize_search(&value),
                _ => {}
            }
        }
        filter
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if let Some(search) = &self.search {
            serializer.append_pair("search", search);
        }
        serializer.finish()
    }

    /// Label of the selected tab; "All" when no category filter is set.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }

    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    pub fn with_category(&self, name: &str) -> Self {
        Self {
            category: normalize_category(name),
            search: self.search.clone(),
        }
    }

    pub fn with_search(&self, text: &str) -> Self {
        Self {
            category: self.category.clone(),
            search: normalize_search(text),
        }
    }

    /// Builds the main list request, resolving the category name to its id.
    ///
    /// A name missing from a loaded category list is dropped, leaving the
    /// list unfiltered by category.
    pub fn list_request(&self, categories: Option<&[Category]>) -> ListRequest {
        let mut query = PostQuery {
            limit: Some(FEED_PAGE_SIZE),
            search: self.search.clone(),
            ..PostQuery::default()
        };
        if let Some(name) = &self.category {
            let Some(categories) = categories else {
                return ListRequest::AwaitingCategories;
            };
            match categories.iter().find(|c| &c.name == name) {
                Some(category) => query.category = Some(category.id.clone()),
                None => warn!("category filter {name:?} does not match any known category"),
            }
        }
        ListRequest::Ready(query)
    }
}

fn normalize_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_search(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "c1".into(),
                name: "Programming".into(),
            },
            Category {
                id: "c2".into(),
                name: "Design".into(),
            },
        ]
    }

    #[test]
    fn routes_round_trip_through_locations() {
        for location in [
            "/",
            "/login",
            "/register",
            "/feed",
            "/feed?category=Programming&search=react",
            "/posts/abc",
            "/posts/abc/edit",
            "/create-post",
            "/profile",
            "/profile/u1",
            "/admin",
        ] {
            assert_eq!(Route::parse(location).to_location(), location);
        }
        assert_eq!(
            Route::parse("/nowhere"),
            Route::NotFound("/nowhere".to_string())
        );
    }

    #[test]
    fn all_and_empty_category_mean_no_filter() {
        let cats = categories();
        let cleared = FeedFilter::default().list_request(Some(&cats));
        let all = FeedFilter::from_query("category=All").list_request(Some(&cats));
        let empty = FeedFilter::from_query("category=").list_request(Some(&cats));
        let reselected = FeedFilter::from_query("category=Design")
            .with_category(ALL_CATEGORIES)
            .list_request(Some(&cats));
        assert_eq!(all, cleared);
        assert_eq!(empty, cleared);
        assert_eq!(reselected, cleared);
        assert_eq!(Route::Feed(FeedFilter::from_query("category=All")).to_location(), "/feed");
    }

    #[test]
    fn category_and_search_combine_and_clear_independently() {
        let cats = categories();
        let filter = FeedFilter::default()
            .with_search("react")
            .with_category("Programming");
        let ListRequest::Ready(query) = filter.list_request(Some(&cats)) else {
            panic!("categories are loaded");
        };
        assert_eq!(query.category.as_deref(), Some("c1"));
        assert_eq!(query.search.as_deref(), Some("react"));

        let cleared = filter.with_search("");
        let ListRequest::Ready(query) = cleared.list_request(Some(&cats)) else {
            panic!("categories are loaded");
        };
        assert_eq!(query.category.as_deref(), Some("c1"));
        assert_eq!(query.search, None);
        assert_eq!(
            Route::Feed(cleared).to_location(),
            "/feed?category=Programming"
        );
    }

    #[test]
    fn selected_category_waits_for_category_list() {
        let filter = FeedFilter::from_query("category=Programming");
        assert_eq!(filter.list_request(None), ListRequest::AwaitingCategories);
        assert!(matches!(
            FeedFilter::default().list_request(None),
            ListRequest::Ready(_)
        ));
    }

    #[test]
    fn search_text_is_percent_decoded() {
        let filter = FeedFilter::from_query("search=rust+async%21");
        assert_eq!(filter.search_text(), "rust async!");
        assert_eq!(filter.category_label(), ALL_CATEGORIES);
    }
}
