use devstories_core::api::PostQuery;
use devstories_core::models::User;
use devstories_core::ApiError;
use log::{info, warn};

use super::state::ViewState;
use super::tasks;
use super::DevStoriesApp;

// Dashboard writes re-read the affected table, except deletes, which drop the
// record by id.
impl DevStoriesApp {
    pub(super) fn handle_users_loaded(&mut self, result: Result<Vec<User>, ApiError>) {
        if let ViewState::Admin(state) = &mut self.view {
            if let Some(err) = state.users.settle(result) {
                warn!("failed to load users: {err}");
            }
        }
    }

    pub(super) fn handle_user_deleted(&mut self, user_id: &str, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                info!("deleted user {user_id}");
                if let ViewState::Admin(state) = &mut self.view {
                    state.users.remove(user_id);
                }
                self.notifications.success("User deleted");
            }
            Err(err) => {
                warn!("deleting user {user_id} failed: {err}");
                self.notifications
                    .error(err.user_message("Could not delete the user"));
            }
        }
    }

    pub(super) fn handle_role_changed(&mut self, user_id: &str, result: Result<User, ApiError>) {
        let user = match result {
            Ok(user) => user,
            Err(err) => {
                warn!("role change for {user_id} failed: {err}");
                self.notifications
                    .error(err.user_message("Could not change the role"));
                return;
            }
        };
        info!("{} is now {}", user.display_name(), user.role.as_str());
        self.notifications.success(format!(
            "{} is now {}",
            user.display_name(),
            user.role.as_str()
        ));
        if self.session.user_id() == Some(user_id) {
            // The guard re-checks the dashboard once the session is re-read.
            self.spawn_refresh_session();
        }
        self.refetch_users();
    }

    pub(super) fn handle_post_status_changed(&mut self, post_id: &str, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                info!("status of story {post_id} changed");
                self.notifications.success("Story status updated");
                self.refetch_dashboard_posts();
            }
            Err(err) => {
                warn!("status change for {post_id} failed: {err}");
                self.notifications
                    .error(err.user_message("Could not change the story status"));
            }
        }
    }

    pub(super) fn handle_category_changed(
        &mut self,
        removed: Option<String>,
        result: Result<(), ApiError>,
    ) {
        if let Err(err) = result {
            warn!("category change failed: {err}");
            self.notifications
                .error(err.user_message("Could not update categories"));
            return;
        }
        if let ViewState::Admin(state) = &mut self.view {
            match &removed {
                Some(category_id) => {
                    state.categories.remove(category_id);
                }
                None => {
                    state.new_category.clear();
                    state.renaming = None;
                }
            }
        }
        self.notifications.success(if removed.is_some() {
            "Category deleted"
        } else {
            "Categories updated"
        });
        self.refetch_categories();
    }

    fn refetch_users(&mut self) {
        let ticket = self.epoch.ticket();
        if let ViewState::Admin(state) = &mut self.view {
            state.users.restart_load();
            tasks::load_users(&self.fetch, self.api.clone(), ticket);
        }
    }

    fn refetch_dashboard_posts(&mut self) {
        let ticket = self.epoch.ticket();
        if let ViewState::Admin(state) = &mut self.view {
            state.posts.restart_load();
            tasks::load_posts(&self.fetch, self.api.clone(), ticket, PostQuery::default());
        }
    }

    fn refetch_categories(&mut self) {
        let ticket = self.epoch.ticket();
        if let ViewState::Admin(state) = &mut self.view {
            state.categories.restart_load();
            tasks::load_categories(&self.fetch, self.api.clone(), ticket);
        }
    }
}
