use devstories_core::location::Route;
use devstories_core::models::User;
use devstories_core::session::{guard, Guard};
use devstories_core::ApiError;
use log::{debug, info, warn};

use super::state::{ProfileState, ViewState};
use super::DevStoriesApp;

const REGISTER_FIELDS: [&str; 4] = ["userName", "email", "password", "age"];

impl DevStoriesApp {
    pub(super) fn handle_session_loaded(&mut self, generation: u64, result: Result<User, ApiError>) {
        if !self.session.resolve(generation, result) {
            return;
        }
        // A screen held for the session, or one the new session may no
        // longer enter, goes through the guard again.
        let held = matches!(self.view, ViewState::Loading);
        if held || guard(&self.route, &self.session) != Guard::Allow {
            self.enter();
        }
    }

    pub(super) fn handle_logged_in(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                info!("logged in");
                self.spawn_reload_session();
                self.history.clear();
                self.replace_route(Route::feed());
            }
            Err(err) => {
                warn!("login failed: {err}");
                if let ViewState::Login(state) = &mut self.view {
                    state.submitting = false;
                    state.error = Some(err.user_message("Login failed"));
                }
            }
        }
    }

    pub(super) fn handle_registered(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.notifications
                    .success("Account created. You can log in now.");
                self.replace_route(Route::Login);
            }
            Err(err) => {
                warn!("registration failed: {err}");
                let message = err.user_message("Registration failed");
                let ViewState::Register(state) = &mut self.view else {
                    self.notifications.error(message);
                    return;
                };
                state.submitting = false;
                match err.attributed_field(&REGISTER_FIELDS) {
                    Some(field) => {
                        state.field_errors.insert(field, message);
                    }
                    None => {
                        state.error = Some(message.clone());
                        self.notifications.error(message);
                    }
                }
            }
        }
    }

    pub(super) fn handle_logged_out(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => info!("logged out"),
            Err(err) => warn!("logout call failed, session cleared locally: {err}"),
        }
    }

    pub(super) fn handle_profile_updated(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                info!("profile updated for {}", user.user_name);
                self.session.set_user(user);
                self.spawn_refresh_session();
                if let ViewState::Profile(state) = &mut self.view {
                    state.edit = None;
                }
                self.notifications.success("Profile updated");
            }
            Err(err) => {
                warn!("profile update failed: {err}");
                let message = err.user_message("Could not update profile");
                if let ViewState::Profile(ProfileState {
                    edit: Some(edit), ..
                }) = &mut self.view
                {
                    edit.saving = false;
                    if err.is_conflict() {
                        edit.username_error = Some("Username is already taken".into());
                    } else {
                        edit.error = Some(message.clone());
                    }
                }
                self.notifications.error(message);
            }
        }
    }

    pub(super) fn handle_username_checked(
        &mut self,
        generation: u64,
        result: Result<bool, ApiError>,
    ) {
        if !self.username_check.is_current(generation) {
            debug!("ignoring superseded username check {generation}");
            return;
        }
        let ViewState::Profile(ProfileState {
            edit: Some(edit), ..
        }) = &mut self.view
        else {
            return;
        };
        edit.validating = false;
        edit.username_error = match result {
            Ok(true) => None,
            Ok(false) => Some("Username is already taken".into()),
            Err(err) => {
                warn!("username check failed: {err}");
                None
            }
        };
    }

    pub(super) fn handle_user_loaded(&mut self, result: Result<User, ApiError>) {
        let ViewState::UserProfile(state) = &mut self.view else {
            return;
        };
        state.loading = false;
        match result {
            Ok(user) => state.user = Some(user),
            Err(err) => {
                warn!("failed to load user {}: {err}", state.user_id);
                state.error = Some(err.user_message("User not found"));
            }
        }
    }
}
