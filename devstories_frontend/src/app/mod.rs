use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use devstories_core::location::Route;
use devstories_core::notify::{Notifications, ToastKind};
use devstories_core::session::{guard, Guard, Session};
use devstories_core::sync::{Debouncer, FetchOrchestrator, ViewEpoch, ViewTicket};
use devstories_core::{ApiClient, ClientConfig};
use eframe::egui::{self, Color32, Context, TextureHandle};
use egui_commonmark::CommonMarkCache;
use log::{debug, info};

mod handlers_admin;
mod handlers_posts;
mod handlers_session;
mod messages;
mod spawners;
mod state;
mod tasks;
mod ui;

#[cfg(test)]
mod tests;

use messages::AppMessage;
use state::{LoadedImage, ViewState};
use ui::UiAction;

// Maximum number of concurrent cover downloads
const MAX_CONCURRENT_DOWNLOADS: usize = 4;

const LOCATION_KEY: &str = "devstories.location";

pub struct DevStoriesApp {
    api: ApiClient,
    config: ClientConfig,
    rx: Receiver<AppMessage>,
    fetch: FetchOrchestrator<AppMessage>,
    session: Session,
    route: Route,
    history: Vec<Route>,
    epoch: ViewEpoch,
    view: ViewState,
    notifications: Notifications,
    location_input: String,
    base_url_input: String,
    show_settings: bool,
    username_check: Debouncer,
    pending_confirm: Option<state::ConfirmAction>,
    markdown_cache: CommonMarkCache,
    image_textures: HashMap<String, TextureHandle>,
    image_loading: HashSet<String>,
    image_pending: HashMap<String, LoadedImage>,
    image_errors: HashMap<String, String>,
    download_queue: VecDeque<String>,
    active_downloads: usize,
}

impl DevStoriesApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = ClientConfig::from_env().context("invalid DEVSTORIES_* configuration")?;
        let api = ApiClient::from_config(&config)
            .with_context(|| format!("failed to initialise API client for {}", config.api_url))?;
        let location = cc
            .storage
            .and_then(|storage| storage.get_string(LOCATION_KEY))
            .unwrap_or_else(|| "/".to_string());
        info!("starting at {location} against {}", api.base_url());
        Ok(Self::with_api(api, config, &location))
    }

    /// Builds the app without a window, starting the session read and the
    /// screen for `location`.
    pub fn with_api(api: ApiClient, config: ClientConfig, location: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        let route = Route::parse(location);
        let mut app = Self {
            base_url_input: api.base_url().to_string(),
            api,
            notifications: Notifications::new(config.toast_ttl),
            username_check: Debouncer::new(config.username_debounce),
            config,
            rx,
            fetch: FetchOrchestrator::new(tx),
            session: Session::default(),
            location_input: route.to_location(),
            route,
            history: Vec::new(),
            epoch: ViewEpoch::default(),
            view: ViewState::Loading,
            show_settings: false,
            pending_confirm: None,
            markdown_cache: CommonMarkCache::default(),
            image_textures: HashMap::new(),
            image_loading: HashSet::new(),
            image_pending: HashMap::new(),
            image_errors: HashMap::new(),
            download_queue: VecDeque::new(),
            active_downloads: 0,
        };
        app.spawn_load_session();
        app.enter();
        app
    }

    /// Goes to `route`, keeping the current one for "Back".
    pub(crate) fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.route, route);
        self.history.push(previous);
        self.enter();
    }

    /// Swaps the current location without adding a history entry.
    pub(crate) fn replace_route(&mut self, route: Route) {
        self.route = route;
        self.enter();
    }

    pub(crate) fn go_back(&mut self) {
        match self.history.pop() {
            Some(previous) => {
                self.route = previous;
                self.enter();
            }
            None => self.replace_route(Route::feed()),
        }
    }

    /// Re-runs the reads of the current screen.
    pub(crate) fn reload(&mut self) {
        self.enter();
    }

    /// Starts a new view epoch for the current route and mounts its screen,
    /// unless the route guard holds or redirects it.
    fn enter(&mut self) {
        let ticket = self.epoch.advance();
        self.location_input = self.route.to_location();
        self.pending_confirm = None;
        self.username_check.cancel();
        match guard(&self.route, &self.session) {
            Guard::Allow => self.mount(ticket),
            Guard::Wait => {
                debug!("holding {} until the session is known", self.location_input);
                self.view = ViewState::Loading;
                self.spawn_load_session();
            }
            Guard::Redirect { to, notice } => {
                info!(
                    "redirecting {} to {}",
                    self.location_input,
                    to.to_location()
                );
                if let Some(notice) = notice {
                    self.notifications.error(notice);
                }
                self.route = to;
                self.enter();
            }
        }
    }

    fn is_current(&self, ticket: ViewTicket, label: &str) -> bool {
        let current = self.epoch.is_current(ticket);
        if !current {
            debug!("dropping {label} result for a screen that is no longer shown");
        }
        current
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn queue_image(&mut self, url: &str) {
        if self.image_loading.contains(url)
            || self.image_textures.contains_key(url)
            || self.image_errors.contains_key(url)
        {
            return;
        }
        self.image_loading.insert(url.to_string());
        self.download_queue.push_back(url.to_string());
        self.process_download_queue();
    }

    fn process_download_queue(&mut self) {
        while self.active_downloads < MAX_CONCURRENT_DOWNLOADS {
            let Some(url) = self.download_queue.pop_front() else {
                break;
            };
            self.active_downloads += 1;
            tasks::download_image(&self.fetch, self.api.clone(), url);
        }
    }

    fn on_download_complete(&mut self) {
        self.active_downloads = self.active_downloads.saturating_sub(1);
        self.process_download_queue();
    }

    fn apply_base_url(&mut self) {
        match self.api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                info!("API URL set to {}", self.api.base_url());
                self.base_url_input = self.api.base_url().to_string();
                self.config.api_url = self.base_url_input.clone();
                self.image_errors.clear();
                self.notifications.success("API URL updated");
                self.session.reset();
                self.spawn_load_session();
                self.reload();
            }
            Err(err) => self
                .notifications
                .error(format!("Failed to update URL: {err}")),
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            self.apply_action(action);
        }
    }

    fn render_screen(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        // The screen state is moved out while it renders so it can borrow
        // alongside the rest of the app.
        let mut view = std::mem::replace(&mut self.view, ViewState::Loading);
        match &mut view {
            ViewState::Landing => self.render_landing(ui, actions),
            ViewState::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.label("Checking your session...");
                });
            }
            ViewState::Login(state) => self.render_login(ui, state, actions),
            ViewState::Register(state) => self.render_register(ui, state, actions),
            ViewState::Feed(state) => self.render_feed(ui, state, actions),
            ViewState::Post(state) => self.render_post(ui, state, actions),
            ViewState::Editor(state) => self.render_editor(ui, state, actions),
            ViewState::Profile(state) => self.render_profile(ui, state, actions),
            ViewState::UserProfile(state) => self.render_user_profile(ui, state, actions),
            ViewState::Admin(state) => self.render_admin(ui, state, actions),
            ViewState::NotFound(location) => {
                ui.heading("Page not found");
                ui.label(format!("Nothing lives at {location}."));
                if ui.button("Back to the feed").clicked() {
                    actions.push(UiAction::Navigate(Route::feed()));
                }
            }
        }
        self.view = view;
    }

    fn render_toasts(&mut self, ctx: &Context) {
        let now = Instant::now();
        let mut dismiss = None;
        let visible: Vec<(ToastKind, String)> = self
            .notifications
            .visible(now)
            .map(|toast| (toast.kind, toast.message.clone()))
            .collect();
        if visible.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                for (index, (kind, message)) in visible.iter().enumerate() {
                    let color = match kind {
                        ToastKind::Info => Color32::LIGHT_BLUE,
                        ToastKind::Success => Color32::LIGHT_GREEN,
                        ToastKind::Error => Color32::LIGHT_RED,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(color, message);
                            if ui.small_button("x").clicked() {
                                dismiss = Some(index);
                            }
                        });
                    });
                }
            });
        if let Some(index) = dismiss {
            self.notifications.dismiss(index);
        }
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for DevStoriesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ui, &mut actions);
        });
        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(150.0)
            .show(ctx, |ui| {
                self.render_nav(ui, &mut actions);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_screen(ui, &mut actions);
        });
        self.render_settings(ctx);
        self.render_confirm_dialog(ctx, &mut actions);
        self.render_profile_editor(ctx, &mut actions);
        self.render_toasts(ctx);
        self.apply_actions(actions);

        // Workers report through the channel; keep polling while any are out.
        if self.active_downloads > 0 || matches!(self.view, ViewState::Loading) {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(LOCATION_KEY, self.route.to_location());
    }
}

fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}
