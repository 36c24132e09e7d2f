use devstories_core::location::Route;
use devstories_core::session::{nav_items, SessionState};
use eframe::egui::{self, Align2, Color32, Context, RichText};

use super::super::DevStoriesApp;
use super::UiAction;

impl DevStoriesApp {
    pub(crate) fn render_top_bar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.history.is_empty(), egui::Button::new("<"))
                .on_hover_text("Back")
                .clicked()
            {
                actions.push(UiAction::Back);
            }
            if ui.button("Reload").clicked() {
                actions.push(UiAction::Reload);
            }
            let location = ui.add(
                egui::TextEdit::singleline(&mut self.location_input)
                    .desired_width(360.0)
                    .hint_text("/feed?category=Programming"),
            );
            if location.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                actions.push(UiAction::OpenLocation);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.selectable_label(self.show_settings, "Settings").clicked() {
                    self.show_settings = !self.show_settings;
                }
                match self.session.state() {
                    SessionState::Authenticated(user) => {
                        if ui.button("Log out").clicked() {
                            actions.push(UiAction::Logout);
                        }
                        ui.label(RichText::new(user.display_name()).strong());
                    }
                    SessionState::Anonymous => {
                        if ui.button("Sign up").clicked() {
                            actions.push(UiAction::Navigate(Route::Register));
                        }
                        if ui.button("Log in").clicked() {
                            actions.push(UiAction::Navigate(Route::Login));
                        }
                    }
                    SessionState::Unknown | SessionState::Loading => {
                        ui.spinner();
                    }
                }
            });
        });
    }

    pub(crate) fn render_nav(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.add_space(8.0);
        ui.heading("DevStories");
        ui.separator();
        for item in nav_items(self.session.user()) {
            let selected = match (&item.route, &self.route) {
                (Route::Feed(_), Route::Feed(_)) => true,
                (wanted, current) => wanted == current,
            };
            if ui.selectable_label(selected, item.label).clicked() {
                actions.push(UiAction::Navigate(item.route));
            }
        }
    }

    pub(crate) fn render_settings(&mut self, ctx: &Context) {
        if !self.show_settings {
            return;
        }
        let mut apply = false;
        egui::Window::new("Settings")
            .open(&mut self.show_settings)
            .resizable(false)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.label("API Base URL");
                ui.text_edit_singleline(&mut self.base_url_input);
                ui.add_space(6.0);
                if ui.button("Apply").clicked() {
                    apply = true;
                }
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!(
                        "Requests time out after {}s",
                        self.config.request_timeout.as_secs()
                    ))
                    .weak(),
                );
            });
        if apply {
            self.apply_base_url();
        }
    }

    pub(crate) fn render_confirm_dialog(&mut self, ctx: &Context, actions: &mut Vec<UiAction>) {
        let Some(confirm) = &self.pending_confirm else {
            return;
        };
        egui::Window::new("Are you sure?")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(confirm.prompt());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .button(RichText::new("Delete").color(Color32::LIGHT_RED))
                        .clicked()
                    {
                        actions.push(UiAction::Confirm);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::CancelConfirm);
                    }
                });
            });
    }

    /// Draws a cover image, queueing its download on first sight.
    pub(crate) fn render_cover(&mut self, ui: &mut egui::Ui, url: &str, max_width: f32) {
        if let Some(pending) = self.image_pending.remove(url) {
            let color = egui::ColorImage::from_rgba_unmultiplied(pending.size, &pending.pixels);
            let texture = ui
                .ctx()
                .load_texture(url, color, egui::TextureOptions::default());
            self.image_textures.insert(url.to_string(), texture);
        }
        if let Some(texture) = self.image_textures.get(url) {
            let size = texture.size_vec2();
            let scale = if size.x > max_width {
                max_width / size.x
            } else {
                1.0
            };
            ui.add(egui::Image::from_texture(texture).fit_to_exact_size(size * scale));
        } else if self.image_errors.contains_key(url) {
            ui.label(RichText::new("Cover unavailable").weak());
        } else {
            ui.spinner();
            self.queue_image(url);
        }
    }
}
