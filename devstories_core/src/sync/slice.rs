use crate::error::ApiError;
use crate::models::Keyed;

/// One independently loaded list of view state.
#[derive(Debug, Clone)]
pub struct ListSlice<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    loaded: bool,
}

impl<T> Default for ListSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            loaded: false,
        }
    }
}

impl<T> ListSlice<T> {
    /// Returns `false` when a read for this slice is already in flight.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Marks a fresh read in flight, superseding one already issued.
    pub fn restart_load(&mut self) {
        self.loading = false;
        self.begin_load();
    }

    /// Applies a read result. On failure the last good snapshot is kept and
    /// the error is handed back for reporting.
    pub fn settle(&mut self, result: Result<Vec<T>, ApiError>) -> Option<ApiError> {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.error = None;
                None
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Some(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T: Keyed> ListSlice<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    /// Applies `update` to the record with `id`. Returns whether it was present.
    pub fn patch<F: FnOnce(&mut T)>(&mut self, id: &str, update: F) -> bool {
        match self.items.iter_mut().find(|item| item.key() == id) {
            Some(item) => {
                update(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == id)?;
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Post, UserRef};
    use reqwest::StatusCode;

    fn post(id: &str, likes: &[&str]) -> Post {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": format!("post {id}"),
            "likes": likes,
        }))
        .unwrap()
    }

    #[test]
    fn remove_touches_only_the_matching_id() {
        let mut slice = ListSlice::default();
        slice.settle(Ok(vec![
            Category { id: "a".into(), name: "A".into() },
            Category { id: "b".into(), name: "B".into() },
            Category { id: "c".into(), name: "C".into() },
        ]));
        assert_eq!(slice.remove("b").map(|c| c.name), Some("B".to_string()));
        assert!(slice.remove("b").is_none());
        let ids: Vec<_> = slice.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn like_patch_adopts_server_likes() {
        let mut slice = ListSlice::default();
        slice.settle(Ok(vec![post("p1", &[]), post("p2", &["u9"])]));

        // Two toggles in a row; each response is the server's view after the call.
        let first = post("p1", &["u1"]);
        slice.patch("p1", |p| p.likes = first.likes.clone());
        let second = post("p1", &[]);
        slice.patch("p1", |p| p.likes = second.likes.clone());

        assert_eq!(slice.get("p1").map(Post::like_count), Some(0));
        assert_eq!(
            slice.get("p2").map(|p| p.likes.clone()),
            Some(vec![UserRef::Id("u9".into())])
        );
        assert!(!slice.patch("missing", |p| p.likes.clear()));
    }

    #[test]
    fn failed_refresh_keeps_last_snapshot() {
        let mut slice = ListSlice::default();
        slice.settle(Ok(vec![post("p1", &[])]));
        assert!(slice.begin_load());
        assert!(!slice.begin_load());
        let err = slice.settle(Err(ApiError::from_response(StatusCode::BAD_GATEWAY, b"")));
        assert!(err.is_some());
        assert_eq!(slice.len(), 1);
        assert!(slice.error.is_some());
        assert!(slice.is_loaded());
    }
}
