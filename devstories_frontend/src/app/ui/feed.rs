use devstories_core::location::{Route, ALL_CATEGORIES};
use devstories_core::models::Post;
use devstories_core::sync::ListSlice;
use eframe::egui::{self, Color32, RichText};

use super::super::state::FeedState;
use super::super::{format_timestamp, DevStoriesApp};
use super::UiAction;

const EXCERPT_CHARS: usize = 180;

/// Spinner, error or empty notice for a list. Returns whether items should be drawn.
pub(crate) fn slice_status<T>(
    ui: &mut egui::Ui,
    slice: &ListSlice<T>,
    empty: &str,
    actions: &mut Vec<UiAction>,
) -> bool {
    if slice.loading && slice.is_empty() {
        ui.spinner();
        return false;
    }
    if let Some(err) = &slice.error {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.small_button("Retry").clicked() {
                actions.push(UiAction::Reload);
            }
        });
    }
    if slice.is_empty() {
        if slice.is_loaded() {
            ui.label(RichText::new(empty).weak());
        }
        return false;
    }
    true
}

impl DevStoriesApp {
    pub(crate) fn render_feed(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut FeedState,
        actions: &mut Vec<UiAction>,
    ) {
        ui.horizontal(|ui| {
            ui.label("Search");
            let search = ui.add(
                egui::TextEdit::singleline(&mut state.search_input)
                    .desired_width(280.0)
                    .hint_text("react, rust, career..."),
            );
            if search.changed() {
                let filter = state.filter.with_search(&state.search_input);
                actions.push(UiAction::ReplaceRoute(Route::Feed(filter)));
            }
            if !state.search_input.is_empty() && ui.small_button("Clear").clicked() {
                actions.push(UiAction::ReplaceRoute(Route::Feed(
                    state.filter.with_search(""),
                )));
            }
        });

        ui.horizontal_wrapped(|ui| {
            let selected = state.filter.category_label().to_string();
            let names = std::iter::once(ALL_CATEGORIES.to_string())
                .chain(state.categories.items.iter().map(|c| c.name.clone()));
            for name in names {
                if ui.selectable_label(selected == name, &name).clicked() && selected != name {
                    actions.push(UiAction::Navigate(Route::Feed(
                        state.filter.with_category(&name),
                    )));
                }
            }
            if state.categories.loading {
                ui.spinner();
            }
        });
        if let Some(err) = &state.categories.error {
            ui.colored_label(Color32::LIGHT_RED, format!("Categories: {err}"));
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if !state.top_posts.is_empty() || state.top_posts.loading {
                    ui.label(RichText::new("Top picks").strong());
                    if slice_status(ui, &state.top_posts, "", actions) {
                        for post in &state.top_posts.items {
                            ui.horizontal(|ui| {
                                if ui.link(&post.title).clicked() {
                                    actions.push(UiAction::Navigate(Route::Post(post.id.clone())));
                                }
                                ui.label(
                                    RichText::new(format!("{} likes", post.like_count())).weak(),
                                );
                            });
                        }
                    }
                    ui.separator();
                }

                if state.list_waiting {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading categories...");
                    });
                    return;
                }
                let empty = if state.filter.search.is_some() {
                    "No stories match your search."
                } else {
                    "No stories yet. Be the first to write one."
                };
                if slice_status(ui, &state.posts, empty, actions) {
                    for post in &state.posts.items {
                        self.render_post_card(ui, post, actions);
                        ui.add_space(6.0);
                    }
                }
            });
    }

    pub(crate) fn render_post_card(
        &mut self,
        ui: &mut egui::Ui,
        post: &Post,
        actions: &mut Vec<UiAction>,
    ) {
        let cover = post.cover_url(self.api.base_url());
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .inner_margin(egui::vec2(12.0, 8.0))
            .show(ui, |ui| {
                if let Some(url) = &cover {
                    self.render_cover(ui, url, 480.0);
                }
                if ui
                    .link(RichText::new(&post.title).strong().size(18.0))
                    .clicked()
                {
                    actions.push(UiAction::Navigate(Route::Post(post.id.clone())));
                }
                ui.horizontal(|ui| {
                    match post.author_id() {
                        Some(author_id) => {
                            if ui.link(post.author_name()).clicked() {
                                actions.push(UiAction::Navigate(Route::UserProfile(
                                    author_id.to_string(),
                                )));
                            }
                        }
                        None => {
                            ui.label(post.author_name());
                        }
                    }
                    ui.label(RichText::new(post.primary_category()).italics());
                    if let Some(created) = &post.created_at {
                        ui.label(RichText::new(format_timestamp(created)).weak());
                    }
                    if !post.is_active {
                        ui.colored_label(Color32::YELLOW, "hidden");
                    }
                });
                ui.label(post.excerpt(EXCERPT_CHARS));
                self.render_like_button(ui, post, actions);
            });
    }

    pub(crate) fn render_like_button(
        &self,
        ui: &mut egui::Ui,
        post: &Post,
        actions: &mut Vec<UiAction>,
    ) {
        let liked = post.is_liked_by(self.session.user_id());
        let text = format!("♥ {}", post.like_count());
        let label = if liked {
            RichText::new(text).color(Color32::LIGHT_RED)
        } else {
            RichText::new(text)
        };
        if ui.button(label).clicked() {
            actions.push(UiAction::ToggleLike(post.id.clone()));
        }
    }
}
