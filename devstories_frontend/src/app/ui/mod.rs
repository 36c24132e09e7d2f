use devstories_core::location::Route;
use devstories_core::models::Role;
use log::info;

use super::state::{ConfirmAction, ProfileEditState, ProfileState, ViewState};
use super::tasks;
use super::DevStoriesApp;

pub mod admin;
pub mod auth;
pub mod chrome;
pub mod feed;
pub mod post;
pub mod profile;

/// What a screen asks the app to do once the frame has been drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Navigate(Route),
    ReplaceRoute(Route),
    Back,
    Reload,
    OpenLocation,
    ApplyBaseUrl,
    SubmitLogin,
    SubmitRegister,
    Logout,
    ToggleLike(String),
    SavePost,
    SubmitComment,
    DeleteComment(String),
    RequestConfirm(ConfirmAction),
    Confirm,
    CancelConfirm,
    OpenProfileEditor,
    CloseProfileEditor,
    UsernameEdited,
    SaveProfile,
    SetRole { user_id: String, role: Role },
    SetPostStatus { post_id: String, is_active: bool },
    CreateCategory,
    RenameCategory { category_id: String, name: String },
}

impl DevStoriesApp {
    pub(super) fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(route) => {
                if route == self.route {
                    self.reload();
                } else {
                    self.navigate(route);
                }
            }
            UiAction::ReplaceRoute(route) => self.replace_route(route),
            UiAction::Back => self.go_back(),
            UiAction::Reload => self.reload(),
            UiAction::OpenLocation => {
                let route = Route::parse(&self.location_input);
                self.navigate(route);
            }
            UiAction::ApplyBaseUrl => self.apply_base_url(),
            UiAction::SubmitLogin => self.spawn_login(),
            UiAction::SubmitRegister => self.spawn_register(),
            UiAction::Logout => self.spawn_logout(),
            UiAction::ToggleLike(post_id) => self.spawn_toggle_like(&post_id),
            UiAction::SavePost => self.spawn_save_post(),
            UiAction::SubmitComment => self.spawn_create_comment(),
            UiAction::DeleteComment(comment_id) => {
                tasks::delete_comment(&self.fetch, self.api.clone(), comment_id);
            }
            UiAction::RequestConfirm(confirm) => self.pending_confirm = Some(confirm),
            UiAction::Confirm => self.run_confirmed(),
            UiAction::CancelConfirm => self.pending_confirm = None,
            UiAction::OpenProfileEditor => {
                let Some(user) = self.session.user() else {
                    return;
                };
                if let ViewState::Profile(state) = &mut self.view {
                    state.edit = Some(ProfileEditState::from_user(user));
                }
            }
            UiAction::CloseProfileEditor => {
                self.username_check.cancel();
                if let ViewState::Profile(state) = &mut self.view {
                    state.edit = None;
                }
            }
            UiAction::UsernameEdited => self.spawn_username_check(),
            UiAction::SaveProfile => self.spawn_update_profile(),
            UiAction::SetRole { user_id, role } => {
                tasks::change_role(&self.fetch, self.api.clone(), user_id, role);
            }
            UiAction::SetPostStatus { post_id, is_active } => {
                tasks::set_post_status(&self.fetch, self.api.clone(), post_id, is_active);
            }
            UiAction::CreateCategory => {
                let ViewState::Admin(state) = &self.view else {
                    return;
                };
                let name = state.new_category.trim().to_string();
                if name.is_empty() {
                    self.notifications.error("Category name cannot be empty");
                    return;
                }
                tasks::create_category(&self.fetch, self.api.clone(), name);
            }
            UiAction::RenameCategory { category_id, name } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    self.notifications.error("Category name cannot be empty");
                    return;
                }
                tasks::rename_category(&self.fetch, self.api.clone(), category_id, name);
            }
        }
    }

    fn run_confirmed(&mut self) {
        let Some(confirm) = self.pending_confirm.take() else {
            return;
        };
        info!("confirmed: {}", confirm.prompt());
        match confirm {
            ConfirmAction::DeleteUser { id, .. } => {
                tasks::delete_user(&self.fetch, self.api.clone(), id);
            }
            ConfirmAction::DeletePost { id, .. } => {
                tasks::delete_post(&self.fetch, self.api.clone(), id);
            }
            ConfirmAction::DeleteCategory { id, .. } => {
                tasks::delete_category(&self.fetch, self.api.clone(), id);
            }
        }
    }

    pub(super) fn profile_edit(&mut self) -> Option<&mut ProfileEditState> {
        match &mut self.view {
            ViewState::Profile(ProfileState {
                edit: Some(edit), ..
            }) => Some(edit),
            _ => None,
        }
    }
}
