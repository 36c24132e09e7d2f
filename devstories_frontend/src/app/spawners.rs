use devstories_core::api::PostQuery;
use devstories_core::location::{FeedFilter, ListRequest, Route, TOP_PICKS};
use devstories_core::models::{LoginInput, PostInput, RegisterInput, UpdateUserInput};
use devstories_core::sync::{FetchOrchestrator, ViewTicket};
use devstories_core::ApiClient;
use log::info;

use super::state::{
    AdminState, EditorState, FeedState, LoginState, PostDetailState, ProfileState,
    RegisterState, UserProfileState, ViewState,
};
use super::messages::AppMessage;
use super::tasks;
use super::DevStoriesApp;

impl DevStoriesApp {
    pub(super) fn spawn_load_session(&mut self) {
        if let Some(generation) = self.session.begin_load() {
            tasks::load_session(&self.fetch, self.api.clone(), generation);
        }
    }

    /// Re-reads the profile after a login, superseding any read in flight.
    pub(super) fn spawn_reload_session(&mut self) {
        let generation = self.session.restart_load();
        tasks::load_session(&self.fetch, self.api.clone(), generation);
    }

    /// Re-reads the profile while the current user stays shown.
    pub(super) fn spawn_refresh_session(&mut self) {
        let generation = self.session.begin_refresh();
        tasks::load_session(&self.fetch, self.api.clone(), generation);
    }

    /// Builds the screen for the current route and issues its reads.
    pub(super) fn mount(&mut self, ticket: ViewTicket) {
        let previous = std::mem::replace(&mut self.view, ViewState::Loading);
        self.view = match self.route.clone() {
            Route::Landing => ViewState::Landing,
            Route::Login => ViewState::Login(LoginState::default()),
            Route::Register => ViewState::Register(RegisterState::default()),
            Route::Feed(filter) => {
                let carried = match previous {
                    ViewState::Feed(state) => Some(state),
                    _ => None,
                };
                ViewState::Feed(self.mount_feed(ticket, filter, carried))
            }
            Route::Post(post_id) => {
                let mut state = PostDetailState::new(post_id.clone());
                state.comments.begin_load();
                tasks::load_post_with_comments(&self.fetch, self.api.clone(), ticket, post_id);
                ViewState::Post(state)
            }
            Route::CreatePost => ViewState::Editor(self.mount_editor(ticket, None)),
            Route::EditPost(post_id) => ViewState::Editor(self.mount_editor(ticket, Some(post_id))),
            Route::Profile => {
                let mut state = ProfileState::default();
                if let Some(user_id) = self.session.user_id() {
                    state.posts.begin_load();
                    tasks::load_posts(
                        &self.fetch,
                        self.api.clone(),
                        ticket,
                        PostQuery::by_author(user_id),
                    );
                }
                ViewState::Profile(state)
            }
            Route::UserProfile(user_id) => {
                let mut state = UserProfileState::new(user_id.clone());
                state.posts.begin_load();
                tasks::load_user(&self.fetch, self.api.clone(), ticket, user_id.clone());
                tasks::load_posts(
                    &self.fetch,
                    self.api.clone(),
                    ticket,
                    PostQuery::by_author(user_id),
                );
                ViewState::UserProfile(state)
            }
            Route::Admin => {
                let mut state = AdminState::default();
                if let ViewState::Admin(previous) = previous {
                    state.tab = previous.tab;
                }
                state.users.begin_load();
                state.posts.begin_load();
                state.categories.begin_load();
                tasks::load_dashboard(&self.fetch, self.api.clone(), ticket);
                ViewState::Admin(state)
            }
            Route::NotFound(location) => ViewState::NotFound(location),
        };
    }

    /// Categories, top picks and the list go out together. Slices already
    /// loaded on the previous feed visit are kept, so only the list is
    /// re-read when just the filter changed.
    fn mount_feed(
        &mut self,
        ticket: ViewTicket,
        filter: FeedFilter,
        carried: Option<FeedState>,
    ) -> FeedState {
        let mut state = FeedState::new(filter);
        if let Some(previous) = carried {
            // Keep the text as typed while it still means the same search.
            let typed = previous.filter.with_search(&previous.search_input);
            if typed.search_text() == state.filter.search_text() {
                state.search_input = previous.search_input;
            }
            if previous.categories.is_loaded() {
                state.categories = previous.categories;
            }
            if previous.top_posts.is_loaded() {
                state.top_posts = previous.top_posts;
            }
            state.posts = previous.posts;
        }
        // Reads issued under the previous ticket will be dropped.
        state.categories.loading = false;
        state.top_posts.loading = false;
        state.posts.loading = false;

        if !state.categories.is_loaded() {
            state.categories.begin_load();
            tasks::load_categories(&self.fetch, self.api.clone(), ticket);
        }
        if !state.top_posts.is_loaded() {
            state.top_posts.begin_load();
            tasks::load_top_posts(
                &self.fetch,
                self.api.clone(),
                ticket,
                PostQuery::popular(TOP_PICKS),
            );
        }
        issue_feed_list(&self.fetch, &self.api, ticket, &mut state);
        state
    }

    fn mount_editor(&mut self, ticket: ViewTicket, post_id: Option<String>) -> EditorState {
        let mut state = EditorState::for_post(post_id.clone());
        state.categories.begin_load();
        tasks::load_categories(&self.fetch, self.api.clone(), ticket);
        if let Some(post_id) = post_id {
            tasks::load_post(&self.fetch, self.api.clone(), ticket, post_id);
        }
        state
    }

    pub(super) fn spawn_login(&mut self) {
        let ViewState::Login(state) = &mut self.view else {
            return;
        };
        if state.submitting {
            return;
        }
        let user_name = state.user_name.trim().to_string();
        if user_name.is_empty() || state.password.is_empty() {
            state.error = Some("Enter your username and password".into());
            return;
        }
        state.submitting = true;
        state.error = None;
        let input = LoginInput {
            user_name,
            password: state.password.clone(),
        };
        tasks::login(&self.fetch, self.api.clone(), input);
    }

    pub(super) fn spawn_register(&mut self) {
        let ViewState::Register(state) = &mut self.view else {
            return;
        };
        if state.submitting {
            return;
        }
        state.field_errors.clear();
        state.error = None;
        let user_name = state.user_name.trim().to_string();
        let email = state.email.trim().to_string();
        if user_name.is_empty() {
            state
                .field_errors
                .insert("userName", "Username is required".into());
        }
        if email.is_empty() {
            state.field_errors.insert("email", "Email is required".into());
        }
        if state.password.is_empty() {
            state
                .field_errors
                .insert("password", "Password is required".into());
        }
        let age = match state.age.trim().parse::<u32>() {
            Ok(age) => age,
            Err(_) => {
                state.field_errors.insert("age", "Age must be a number".into());
                0
            }
        };
        if !state.field_errors.is_empty() {
            return;
        }
        state.submitting = true;
        let input = RegisterInput {
            user_name,
            age,
            email,
            password: state.password.clone(),
        };
        tasks::register(&self.fetch, self.api.clone(), input);
    }

    /// Clears the session and leaves for the login screen whatever the server
    /// answers.
    pub(super) fn spawn_logout(&mut self) {
        tasks::logout(&self.fetch, self.api.clone());
        self.session.sign_out();
        self.history.clear();
        self.replace_route(Route::Login);
    }

    pub(super) fn spawn_toggle_like(&mut self, post_id: &str) {
        if self.session.user().is_none() {
            self.notifications.info("Log in to like stories");
            return;
        }
        tasks::toggle_like(&self.fetch, self.api.clone(), post_id.to_string());
    }

    pub(super) fn spawn_save_post(&mut self) {
        let ViewState::Editor(state) = &mut self.view else {
            return;
        };
        if state.submitting {
            return;
        }
        let title = state.title.trim().to_string();
        let content = state.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            state.error = Some("Please fill in the title and the story".into());
            return;
        }
        if state.selected.is_empty() {
            state.error = Some("Pick at least one category".into());
            return;
        }
        let cover = state.cover_image.trim();
        let input = PostInput {
            title,
            content,
            categories: state.selected.iter().cloned().collect(),
            cover_image: (!cover.is_empty()).then(|| cover.to_string()),
        };
        state.submitting = true;
        state.error = None;
        tasks::save_post(&self.fetch, self.api.clone(), state.editing.clone(), input);
    }

    pub(super) fn spawn_create_comment(&mut self) {
        let ViewState::Post(state) = &mut self.view else {
            return;
        };
        if state.comment_sending {
            return;
        }
        let content = state.new_comment.trim().to_string();
        if content.is_empty() {
            state.comment_error = Some("Comment cannot be empty".into());
            return;
        }
        state.comment_sending = true;
        state.comment_error = None;
        tasks::create_comment(&self.fetch, self.api.clone(), state.post_id.clone(), content);
    }

    /// Schedules a debounced availability check while the edited name differs
    /// from the current one.
    pub(super) fn spawn_username_check(&mut self) {
        let current = self
            .session
            .user()
            .map(|u| u.user_name.clone())
            .unwrap_or_default();
        let ViewState::Profile(ProfileState {
            edit: Some(edit), ..
        }) = &mut self.view
        else {
            return;
        };
        edit.username_error = None;
        let wanted = edit.user_name.trim().to_string();
        if wanted.is_empty() {
            self.username_check.cancel();
            edit.validating = false;
            edit.username_error = Some("Username is required".into());
            return;
        }
        if wanted == current {
            self.username_check.cancel();
            edit.validating = false;
            return;
        }
        edit.validating = true;
        tasks::check_username(&self.username_check, &self.fetch, self.api.clone(), wanted);
    }

    pub(super) fn spawn_update_profile(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            return;
        };
        let ViewState::Profile(ProfileState {
            edit: Some(edit), ..
        }) = &mut self.view
        else {
            return;
        };
        if !edit.can_save() {
            return;
        }
        edit.age_error = None;
        let age = match edit.age.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(age) => Some(age),
                Err(_) => {
                    edit.age_error = Some("Age must be a number".into());
                    return;
                }
            },
        };
        let user_name = edit.user_name.trim().to_string();
        let input = UpdateUserInput {
            user_name: (user_name != user.user_name).then_some(user_name),
            age,
            role: None,
        };
        edit.saving = true;
        edit.error = None;
        tasks::update_profile(&self.fetch, self.api.clone(), user.id, input);
    }
}

/// Issues the main feed list read, or parks it until categories can resolve
/// the selected category name.
pub(super) fn issue_feed_list(
    fetch: &FetchOrchestrator<AppMessage>,
    api: &ApiClient,
    ticket: ViewTicket,
    state: &mut FeedState,
) {
    let categories = state
        .categories
        .is_loaded()
        .then_some(state.categories.items.as_slice());
    match state.filter.list_request(categories) {
        ListRequest::Ready(query) => {
            state.list_waiting = false;
            state.posts.begin_load();
            tasks::load_posts(fetch, api.clone(), ticket, query);
        }
        ListRequest::AwaitingCategories => {
            info!(
                "list for category {:?} waits for categories",
                state.filter.category_label()
            );
            state.list_waiting = true;
            state.posts.begin_load();
        }
    }
}
