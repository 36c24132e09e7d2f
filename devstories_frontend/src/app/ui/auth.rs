use devstories_core::location::Route;
use eframe::egui::{self, Color32, RichText};

use super::super::state::{LoginState, RegisterState};
use super::super::DevStoriesApp;
use super::UiAction;

const FORM_WIDTH: f32 = 320.0;

fn field_error(ui: &mut egui::Ui, error: Option<&String>) {
    if let Some(error) = error {
        ui.colored_label(Color32::LIGHT_RED, error);
    }
}

fn submitted(response: &egui::Response, ui: &egui::Ui) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

impl DevStoriesApp {
    pub(crate) fn render_landing(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new("DevStories").size(32.0));
            ui.label("Stories from developers, for developers.");
            ui.add_space(20.0);
            ui.horizontal(|ui| {
                if ui.button("Read the feed").clicked() {
                    actions.push(UiAction::Navigate(Route::feed()));
                }
                if self.session.user().is_none() {
                    if ui.button("Log in").clicked() {
                        actions.push(UiAction::Navigate(Route::Login));
                    }
                    if ui.button("Create an account").clicked() {
                        actions.push(UiAction::Navigate(Route::Register));
                    }
                }
            });
        });
    }

    pub(crate) fn render_login(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut LoginState,
        actions: &mut Vec<UiAction>,
    ) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(FORM_WIDTH);
            ui.add_space(40.0);
            ui.heading("Welcome back");
            ui.add_space(12.0);
            ui.add(egui::TextEdit::singleline(&mut state.user_name).hint_text("Username"));
            let password = ui.add(
                egui::TextEdit::singleline(&mut state.password)
                    .password(true)
                    .hint_text("Password"),
            );
            if submitted(&password, ui) {
                actions.push(UiAction::SubmitLogin);
            }
            field_error(ui, state.error.as_ref());
            ui.add_space(8.0);
            if state.submitting {
                ui.spinner();
            } else if ui.button("Log in").clicked() {
                actions.push(UiAction::SubmitLogin);
            }
            ui.add_space(8.0);
            if ui.link("No account yet? Sign up").clicked() {
                actions.push(UiAction::Navigate(Route::Register));
            }
        });
    }

    pub(crate) fn render_register(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut RegisterState,
        actions: &mut Vec<UiAction>,
    ) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(FORM_WIDTH);
            ui.add_space(40.0);
            ui.heading("Join DevStories");
            ui.add_space(12.0);
            ui.add(egui::TextEdit::singleline(&mut state.user_name).hint_text("Username"));
            field_error(ui, state.field_errors.get("userName"));
            ui.add(egui::TextEdit::singleline(&mut state.age).hint_text("Age"));
            field_error(ui, state.field_errors.get("age"));
            ui.add(egui::TextEdit::singleline(&mut state.email).hint_text("Email"));
            field_error(ui, state.field_errors.get("email"));
            let password = ui.add(
                egui::TextEdit::singleline(&mut state.password)
                    .password(true)
                    .hint_text("Password"),
            );
            field_error(ui, state.field_errors.get("password"));
            if submitted(&password, ui) {
                actions.push(UiAction::SubmitRegister);
            }
            field_error(ui, state.error.as_ref());
            ui.add_space(8.0);
            if state.submitting {
                ui.spinner();
            } else if ui.button("Create account").clicked() {
                actions.push(UiAction::SubmitRegister);
            }
            ui.add_space(8.0);
            if ui.link("Already registered? Log in").clicked() {
                actions.push(UiAction::Navigate(Route::Login));
            }
        });
    }
}
