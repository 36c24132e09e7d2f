use devstories_core::location::Route;
use devstories_core::models::Role;
use eframe::egui::{self, Color32, RichText};

use super::super::state::{AdminState, AdminTab, ConfirmAction};
use super::super::{format_timestamp, DevStoriesApp};
use super::feed::slice_status;
use super::UiAction;

impl DevStoriesApp {
    pub(crate) fn render_admin(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut AdminState,
        actions: &mut Vec<UiAction>,
    ) {
        ui.heading("Dashboard");
        ui.horizontal(|ui| {
            for (tab, label) in [
                (AdminTab::Users, format!("Users ({})", state.users.len())),
                (AdminTab::Posts, format!("Stories ({})", state.posts.len())),
                (AdminTab::Categories, format!("Categories ({})", state.categories.len())),
            ] {
                if ui.selectable_label(state.tab == tab, label).clicked() {
                    state.tab = tab;
                }
            }
        });
        ui.separator();
        let own_id = self.session.user_id().map(str::to_string);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match state.tab {
                AdminTab::Users => users_tab(ui, state, own_id.as_deref(), actions),
                AdminTab::Posts => posts_tab(ui, state, actions),
                AdminTab::Categories => categories_tab(ui, state, actions),
            });
    }
}

fn users_tab(
    ui: &mut egui::Ui,
    state: &mut AdminState,
    own_id: Option<&str>,
    actions: &mut Vec<UiAction>,
) {
    if !slice_status(ui, &state.users, "No users.", actions) {
        return;
    }
    egui::Grid::new("admin_users")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui| {
            for user in &state.users.items {
                if ui.link(user.display_name()).clicked() {
                    actions.push(UiAction::Navigate(Route::UserProfile(user.id.clone())));
                }
                ui.label(user.email.as_deref().unwrap_or("-"));
                let is_admin = user.is_admin();
                let toggle = if is_admin { "Make user" } else { "Make admin" };
                ui.horizontal(|ui| {
                    ui.label(user.role.as_str());
                    if ui.small_button(toggle).clicked() {
                        let role = if is_admin { Role::User } else { Role::Admin };
                        actions.push(UiAction::SetRole {
                            user_id: user.id.clone(),
                            role,
                        });
                    }
                });
                let is_self = own_id == Some(user.id.as_str());
                if ui
                    .add_enabled(
                        !is_self,
                        egui::Button::new(RichText::new("Delete").color(Color32::LIGHT_RED)),
                    )
                    .clicked()
                {
                    actions.push(UiAction::RequestConfirm(ConfirmAction::DeleteUser {
                        id: user.id.clone(),
                        name: user.display_name().to_string(),
                    }));
                }
                ui.end_row();
            }
        });
}

fn posts_tab(ui: &mut egui::Ui, state: &mut AdminState, actions: &mut Vec<UiAction>) {
    if !slice_status(ui, &state.posts, "No stories.", actions) {
        return;
    }
    egui::Grid::new("admin_posts")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            for post in &state.posts.items {
                if ui.link(&post.title).clicked() {
                    actions.push(UiAction::Navigate(Route::Post(post.id.clone())));
                }
                ui.label(post.author_name());
                ui.label(
                    post.created_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_default(),
                );
                let status = if post.is_active { "Active" } else { "Hidden" };
                if ui
                    .small_button(status)
                    .on_hover_text("Toggle visibility")
                    .clicked()
                {
                    actions.push(UiAction::SetPostStatus {
                        post_id: post.id.clone(),
                        is_active: !post.is_active,
                    });
                }
                if ui
                    .button(RichText::new("Delete").color(Color32::LIGHT_RED))
                    .clicked()
                {
                    actions.push(UiAction::RequestConfirm(ConfirmAction::DeletePost {
                        id: post.id.clone(),
                        title: post.title.clone(),
                    }));
                }
                ui.end_row();
            }
        });
}

fn categories_tab(ui: &mut egui::Ui, state: &mut AdminState, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.new_category).hint_text("New category"),
        );
        let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add").clicked() || entered {
            actions.push(UiAction::CreateCategory);
        }
    });
    ui.add_space(6.0);
    if !slice_status(ui, &state.categories, "No categories yet.", actions) {
        return;
    }
    let mut start_rename = None;
    let mut stop_rename = false;
    for category in &state.categories.items {
        ui.horizontal(|ui| {
            match &mut state.renaming {
                Some((id, name)) if *id == category.id => {
                    ui.text_edit_singleline(name);
                    if ui.small_button("Save").clicked() {
                        actions.push(UiAction::RenameCategory {
                            category_id: id.clone(),
                            name: name.clone(),
                        });
                    }
                    if ui.small_button("Cancel").clicked() {
                        stop_rename = true;
                    }
                }
                _ => {
                    ui.label(&category.name);
                    if ui.small_button("Rename").clicked() {
                        start_rename = Some((category.id.clone(), category.name.clone()));
                    }
                }
            }
            if ui
                .small_button(RichText::new("Delete").color(Color32::LIGHT_RED))
                .clicked()
            {
                actions.push(UiAction::RequestConfirm(ConfirmAction::DeleteCategory {
                    id: category.id.clone(),
                    name: category.name.clone(),
                }));
            }
        });
    }
    if stop_rename {
        state.renaming = None;
    }
    if let Some(renaming) = start_rename {
        state.renaming = Some(renaming);
    }
}
