use devstories_core::location::Route;
use eframe::egui::{self, Color32, RichText};
use egui_commonmark::CommonMarkViewer;

use super::super::state::{ConfirmAction, EditorState, PostDetailState};
use super::super::{format_timestamp, DevStoriesApp};
use super::feed::slice_status;
use super::UiAction;

impl DevStoriesApp {
    pub(crate) fn render_post(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut PostDetailState,
        actions: &mut Vec<UiAction>,
    ) {
        if ui.button("< Back").clicked() {
            actions.push(UiAction::Back);
        }
        if state.loading {
            ui.spinner();
            return;
        }
        if let Some(err) = &state.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.button("Retry").clicked() {
                actions.push(UiAction::Reload);
            }
            return;
        }
        let Some(post) = state.post.clone() else {
            return;
        };
        let viewer = self.session.user().cloned();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(url) = post.cover_url(self.api.base_url()) {
                    self.render_cover(ui, &url, 720.0);
                }
                ui.heading(&post.title);
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
                    let names: Vec<&str> = post.categories.iter().filter_map(|c| c.name()).collect();
                    if !names.is_empty() {
                        ui.label(RichText::new(names.join(", ")).italics());
                    }
                    if let Some(created) = &post.created_at {
                        ui.label(RichText::new(format_timestamp(created)).weak());
                    }
                });
                ui.horizontal(|ui| {
                    self.render_like_button(ui, &post, actions);
                    if post.can_manage(viewer.as_ref()) {
                        if ui.button("Edit").clicked() {
                            actions.push(UiAction::Navigate(Route::EditPost(post.id.clone())));
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
                    }
                });
                ui.separator();
                CommonMarkViewer::new().show(ui, &mut self.markdown_cache, &post.content);
                ui.separator();

                ui.heading(format!("Comments ({})", state.comments.len()));
                if viewer.is_some() {
                    ui.add(
                        egui::TextEdit::multiline(&mut state.new_comment)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY)
                            .hint_text("Share your thoughts..."),
                    );
                    if let Some(err) = &state.comment_error {
                        ui.colored_label(Color32::LIGHT_RED, err);
                    }
                    if state.comment_sending {
                        ui.spinner();
                    } else if ui.button("Comment").clicked() {
                        actions.push(UiAction::SubmitComment);
                    }
                } else if ui.link("Log in to join the conversation").clicked() {
                    actions.push(UiAction::Navigate(Route::Login));
                }
                ui.add_space(8.0);

                if slice_status(ui, &state.comments, "No comments yet.", actions) {
                    for comment in &state.comments.items {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let author = comment
                                    .author
                                    .as_ref()
                                    .map(|a| a.display_name())
                                    .unwrap_or("Anonymous");
                                ui.label(RichText::new(author).strong());
                                if let Some(created) = &comment.created_at {
                                    ui.label(RichText::new(format_timestamp(created)).weak());
                                }
                                if comment.can_delete(viewer.as_ref())
                                    && ui.small_button("Delete").clicked()
                                {
                                    actions.push(UiAction::DeleteComment(comment.id.clone()));
                                }
                            });
                            ui.label(&comment.content);
                        });
                    }
                }
            });
    }

    pub(crate) fn render_editor(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut EditorState,
        actions: &mut Vec<UiAction>,
    ) {
        ui.heading(if state.editing.is_some() {
            "Edit story"
        } else {
            "Write a story"
        });
        if state.loading_post {
            ui.spinner();
            return;
        }
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label("Title");
                ui.add(egui::TextEdit::singleline(&mut state.title).desired_width(f32::INFINITY));
                ui.label("Cover image URL (optional)");
                ui.add(
                    egui::TextEdit::singleline(&mut state.cover_image)
                        .desired_width(f32::INFINITY),
                );

                ui.horizontal(|ui| {
                    ui.label(format!("Categories ({} selected)", state.selected.len()));
                    if ui
                        .selectable_label(state.show_categories, "Choose")
                        .clicked()
                    {
                        state.show_categories = !state.show_categories;
                    }
                });
                if state.show_categories {
                    if state.categories.loading {
                        ui.spinner();
                    }
                    if let Some(err) = &state.categories.error {
                        ui.colored_label(Color32::LIGHT_RED, err);
                    }
                    ui.horizontal_wrapped(|ui| {
                        for category in &state.categories.items {
                            let mut checked = state.selected.contains(&category.id);
                            if ui.checkbox(&mut checked, &category.name).changed() {
                                if checked {
                                    state.selected.insert(category.id.clone());
                                } else {
                                    state.selected.remove(&category.id);
                                }
                            }
                        }
                    });
                }

                ui.horizontal(|ui| {
                    ui.label("Story (Markdown)");
                    ui.checkbox(&mut state.preview, "Preview");
                });
                if state.preview {
                    CommonMarkViewer::new().show(ui, &mut self.markdown_cache, &state.content);
                } else {
                    ui.add(
                        egui::TextEdit::multiline(&mut state.content)
                            .desired_rows(16)
                            .desired_width(f32::INFINITY)
                            .code_editor(),
                    );
                }

                if let Some(err) = &state.error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                ui.horizontal(|ui| {
                    if state.submitting {
                        ui.spinner();
                    } else if ui
                        .button(if state.editing.is_some() { "Save" } else { "Publish" })
                        .clicked()
                    {
                        actions.push(UiAction::SavePost);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::Back);
                    }
                });
            });
    }
}
