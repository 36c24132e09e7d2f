use devstories_core::models::User;
use eframe::egui::{self, Align2, Color32, Context, RichText};

use super::super::state::{ProfileState, UserProfileState};
use super::super::DevStoriesApp;
use super::feed::slice_status;
use super::UiAction;

fn user_header(ui: &mut egui::Ui, user: &User) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(user.initial()).size(32.0).strong());
        ui.vertical(|ui| {
            ui.heading(user.display_name());
            if let Some(email) = &user.email {
                ui.label(email);
            }
            let mut details = vec![format!("role: {}", user.role.as_str())];
            if let Some(age) = user.age {
                details.push(format!("age: {age}"));
            }
            ui.label(RichText::new(details.join("  ·  ")).weak());
        });
    });
}

impl DevStoriesApp {
    pub(crate) fn render_profile(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut ProfileState,
        actions: &mut Vec<UiAction>,
    ) {
        let Some(user) = self.session.user().cloned() else {
            ui.spinner();
            return;
        };
        user_header(ui, &user);
        ui.horizontal(|ui| {
            if ui.button("Edit profile").clicked() {
                actions.push(UiAction::OpenProfileEditor);
            }
            if ui.button("Log out").clicked() {
                actions.push(UiAction::Logout);
            }
        });
        ui.separator();
        ui.heading("My stories");
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if slice_status(ui, &state.posts, "You have not written anything yet.", actions) {
                    for post in &state.posts.items {
                        self.render_post_card(ui, post, actions);
                        ui.add_space(6.0);
                    }
                }
            });
    }

    pub(crate) fn render_user_profile(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut UserProfileState,
        actions: &mut Vec<UiAction>,
    ) {
        if ui.button("< Back").clicked() {
            actions.push(UiAction::Back);
        }
        if state.loading {
            ui.spinner();
        } else if let Some(err) = &state.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            return;
        } else if let Some(user) = &state.user {
            user_header(ui, user);
        }
        ui.separator();
        ui.heading("Stories");
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if slice_status(ui, &state.posts, "No stories yet.", actions) {
                    for post in &state.posts.items {
                        self.render_post_card(ui, post, actions);
                        ui.add_space(6.0);
                    }
                }
            });
    }

    /// Modal for editing the signed-in user's name and age.
    pub(crate) fn render_profile_editor(&mut self, ctx: &Context, actions: &mut Vec<UiAction>) {
        let Some(edit) = self.profile_edit() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Edit profile")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Username");
                ui.horizontal(|ui| {
                    if ui.text_edit_singleline(&mut edit.user_name).changed() {
                        actions.push(UiAction::UsernameEdited);
                    }
                    if edit.validating {
                        ui.spinner();
                    }
                });
                if let Some(err) = &edit.username_error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                ui.label("Age");
                ui.text_edit_singleline(&mut edit.age);
                if let Some(err) = &edit.age_error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                if let Some(err) = &edit.error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if edit.saving {
                        ui.spinner();
                    } else if ui
                        .add_enabled(edit.can_save(), egui::Button::new("Save"))
                        .clicked()
                    {
                        actions.push(UiAction::SaveProfile);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::CloseProfileEditor);
                    }
                });
            });
        if !open {
            actions.push(UiAction::CloseProfileEditor);
        }
    }
}
