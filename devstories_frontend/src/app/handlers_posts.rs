use devstories_core::location::Route;
use devstories_core::models::{Category, Comment, Post, UserRef};
use devstories_core::ApiError;
use log::{info, warn};

use super::spawners::issue_feed_list;
use super::state::{LoadedImage, ViewState};
use super::tasks;
use super::DevStoriesApp;

impl DevStoriesApp {
    pub(super) fn handle_categories_loaded(&mut self, result: Result<Vec<Category>, ApiError>) {
        let ticket = self.epoch.ticket();
        match &mut self.view {
            ViewState::Feed(state) => {
                if let Some(err) = state.categories.settle(result) {
                    warn!("failed to load categories: {err}");
                    if state.list_waiting {
                        state.list_waiting = false;
                        state.posts.loading = false;
                        state.posts.error =
                            Some("Stories could not be filtered: categories failed to load".into());
                    }
                } else if state.list_waiting {
                    issue_feed_list(&self.fetch, &self.api, ticket, state);
                }
            }
            ViewState::Editor(state) => {
                if let Some(err) = state.categories.settle(result) {
                    warn!("failed to load categories: {err}");
                }
            }
            ViewState::Admin(state) => {
                if let Some(err) = state.categories.settle(result) {
                    warn!("failed to load categories: {err}");
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_posts_loaded(&mut self, result: Result<Vec<Post>, ApiError>) {
        let slice = match &mut self.view {
            ViewState::Feed(state) => &mut state.posts,
            ViewState::Profile(state) => &mut state.posts,
            ViewState::UserProfile(state) => &mut state.posts,
            ViewState::Admin(state) => &mut state.posts,
            _ => return,
        };
        if let Some(err) = slice.settle(result) {
            warn!("failed to load stories: {err}");
        }
    }

    pub(super) fn handle_top_posts_loaded(&mut self, result: Result<Vec<Post>, ApiError>) {
        if let ViewState::Feed(state) = &mut self.view {
            if let Some(err) = state.top_posts.settle(result) {
                warn!("failed to load top picks: {err}");
            }
        }
    }

    pub(super) fn handle_post_loaded(&mut self, result: Result<Post, ApiError>) {
        match &mut self.view {
            ViewState::Post(state) => {
                state.loading = false;
                match result {
                    Ok(post) => state.post = Some(post),
                    Err(err) => {
                        warn!("failed to load story {}: {err}", state.post_id);
                        state.error = Some(err.user_message("Story not found"));
                        // Comments are only read once the story is found.
                        state.comments.loading = false;
                    }
                }
            }
            ViewState::Editor(state) => {
                state.loading_post = false;
                match result {
                    Ok(post) => state.fill_from(&post),
                    Err(err) => {
                        warn!("failed to load story for editing: {err}");
                        state.error = Some(err.user_message("Story not found"));
                    }
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_comments_loaded(
        &mut self,
        post_id: &str,
        result: Result<Vec<Comment>, ApiError>,
    ) {
        let ViewState::Post(state) = &mut self.view else {
            return;
        };
        if state.post_id != post_id {
            return;
        }
        if let Some(err) = state.comments.settle(result) {
            warn!("failed to load comments for {post_id}: {err}");
        }
    }

    /// Adopts the likes the server reports for the post wherever it is shown.
    pub(super) fn handle_like_toggled(&mut self, post_id: &str, result: Result<Post, ApiError>) {
        match result {
            Ok(updated) => {
                let likes = updated.likes;
                self.adopt_likes(post_id, &likes);
            }
            Err(err) => {
                warn!("like on {post_id} failed: {err}");
                self.notifications
                    .error(err.user_message("Could not update the like"));
            }
        }
    }

    fn adopt_likes(&mut self, post_id: &str, likes: &[UserRef]) {
        let set = |post: &mut Post| post.likes = likes.to_vec();
        match &mut self.view {
            ViewState::Feed(state) => {
                state.posts.patch(post_id, set);
                state.top_posts.patch(post_id, set);
            }
            ViewState::Post(state) => {
                if let Some(post) = state.post.as_mut().filter(|p| p.id == post_id) {
                    set(post);
                }
            }
            ViewState::Profile(state) => {
                state.posts.patch(post_id, set);
            }
            ViewState::UserProfile(state) => {
                state.posts.patch(post_id, set);
            }
            ViewState::Admin(state) => {
                state.posts.patch(post_id, set);
            }
            _ => {}
        }
    }

    pub(super) fn handle_post_saved(&mut self, editing: Option<String>, result: Result<Post, ApiError>) {
        match result {
            Ok(post) => {
                info!("saved story {}", post.id);
                match editing {
                    Some(post_id) => {
                        self.notifications.success("Story updated");
                        self.replace_route(Route::Post(post_id));
                    }
                    None => {
                        self.notifications.success("Story published");
                        self.replace_route(Route::feed());
                    }
                }
            }
            Err(err) => {
                warn!("saving story failed: {err}");
                let message = err.user_message("Could not save the story");
                if let ViewState::Editor(state) = &mut self.view {
                    state.submitting = false;
                    state.error = Some(message.clone());
                }
                self.notifications.error(message);
            }
        }
    }

    pub(super) fn handle_post_deleted(&mut self, post_id: &str, result: Result<(), ApiError>) {
        if let Err(err) = result {
            warn!("deleting story {post_id} failed: {err}");
            self.notifications
                .error(err.user_message("Could not delete the story"));
            return;
        }
        info!("deleted story {post_id}");
        self.notifications.success("Story deleted");
        let leaving = matches!(&self.view, ViewState::Post(state) if state.post_id == post_id);
        match &mut self.view {
            ViewState::Feed(state) => {
                state.posts.remove(post_id);
                state.top_posts.remove(post_id);
            }
            ViewState::Profile(state) => {
                state.posts.remove(post_id);
            }
            ViewState::UserProfile(state) => {
                state.posts.remove(post_id);
            }
            ViewState::Admin(state) => {
                state.posts.remove(post_id);
            }
            _ => {}
        }
        if leaving {
            self.replace_route(Route::feed());
        }
    }

    pub(super) fn handle_comment_created(&mut self, post_id: &str, result: Result<Comment, ApiError>) {
        let ticket = self.epoch.ticket();
        let ViewState::Post(state) = &mut self.view else {
            return;
        };
        if state.post_id != post_id {
            return;
        }
        state.comment_sending = false;
        match result {
            Ok(comment) => {
                info!("comment {} added to {post_id}", comment.id);
                state.new_comment.clear();
                state.comment_error = None;
                // The created comment lacks the populated author; read the
                // list again instead of inserting it.
                state.comments.restart_load();
                tasks::load_comments(&self.fetch, self.api.clone(), ticket, post_id.to_string());
            }
            Err(err) => {
                warn!("adding comment to {post_id} failed: {err}");
                let message = err.user_message("Could not add the comment");
                state.comment_error = Some(message.clone());
                self.notifications.error(message);
            }
        }
    }

    pub(super) fn handle_comment_deleted(&mut self, comment_id: &str, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                if let ViewState::Post(state) = &mut self.view {
                    state.comments.remove(comment_id);
                }
                self.notifications.success("Comment deleted");
            }
            Err(err) => {
                warn!("deleting comment {comment_id} failed: {err}");
                self.notifications
                    .error(err.user_message("Could not delete the comment"));
            }
        }
    }

    pub(super) fn handle_image_loaded(&mut self, url: String, result: Result<LoadedImage, String>) {
        self.on_download_complete();
        self.image_loading.remove(&url);
        match result {
            Ok(image) => {
                self.image_pending.insert(url, image);
            }
            Err(err) => {
                warn!("cover {url} failed: {err}");
                self.image_errors.insert(url, err);
            }
        }
    }
}
