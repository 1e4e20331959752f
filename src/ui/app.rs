use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;

use crate::engine::api::{GameDetail, GameHistoryItem, HttpGameService};
use crate::engine::engine::Engine;
use crate::engine::mention::TargetPicker;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::session::{Move, SessionState};
use crate::ui::settings::UiSettings;
use crate::ui::settings_io::{load_settings, save_settings};
use crate::ui::{game_panel, history_panel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Game,
    History,
}

pub const HISTORY_PAGE_SIZE: u32 = 20;

/// Everything the UI renders from. The session itself is owned by the
/// engine's controller; this only holds the latest broadcast copy.
pub struct UiState {
    pub view: View,

    /// Commands sent but not yet answered. Every command produces exactly
    /// one response, so this is an exact count; ask/submit affordances stay
    /// disabled while it is non-zero.
    pub pending: u32,
    pub error: Option<String>,
    pub auth_expired: bool,

    pub session: SessionState,
    pub input_text: String,
    pub picker: TargetPicker,
    pub confirm_submit: bool,

    pub history: Vec<GameHistoryItem>,
    pub history_offset: u32,
    pub replay: Option<(GameDetail, Vec<Move>)>,

    pub show_settings: bool,
}

impl UiState {
    pub fn busy(&self) -> bool {
        self.pending > 0
    }
}

/// Send a command and account for its eventual response.
pub fn send(state: &mut UiState, cmd_tx: &Sender<EngineCommand>, cmd: EngineCommand) {
    if cmd_tx.send(cmd).is_ok() {
        state.pending += 1;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            view: View::Game,
            pending: 0,
            error: None,
            auth_expired: false,
            session: SessionState::default(),
            input_text: String::new(),
            picker: TargetPicker::default(),
            confirm_submit: false,
            history: Vec::new(),
            history_offset: 0,
            replay: None,
            show_settings: false,
        }
    }
}

pub struct App {
    pub ui: UiState,
    settings: UiSettings,
    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = load_settings();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let service = HttpGameService::new(&settings.server_url, settings.token_opt());
        let egui_ctx = cc.egui_ctx.clone();
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, egui_ctx, service);
            engine.run();
        });

        let mut ui = UiState::default();
        send(&mut ui, &cmd_tx, EngineCommand::StartSession);

        Self { ui, settings, cmd_tx, resp_rx }
    }

    fn drain_responses(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            self.ui.pending = self.ui.pending.saturating_sub(1);
            match resp {
                EngineResponse::SessionUpdated(state) => {
                    self.ui.session = state;
                }
                EngineResponse::ConfirmSubmit => {
                    self.ui.confirm_submit = true;
                }
                EngineResponse::HistoryLoaded(items) => {
                    self.ui.history = items;
                }
                EngineResponse::ReplayLoaded { detail, timeline } => {
                    self.ui.replay = Some((detail, timeline));
                }
                EngineResponse::ServiceFailure { context, message } => {
                    self.ui.error = Some(format!("Failed to {context}: {message}"));
                }
                EngineResponse::AuthExpired => {
                    self.ui.auth_expired = true;
                }
            }
        }
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Three Gods Riddle");
                ui.separator();

                if ui.selectable_label(self.ui.view == View::Game, "Game").clicked()
                    && self.ui.view != View::Game
                {
                    self.ui.view = View::Game;
                }

                if ui.selectable_label(self.ui.view == View::History, "History").clicked()
                    && self.ui.view != View::History
                {
                    self.ui.view = View::History;
                    self.ui.replay = None;
                    self.ui.history_offset = 0;
                    send(
                        &mut self.ui,
                        &self.cmd_tx,
                        EngineCommand::LoadHistory { limit: HISTORY_PAGE_SIZE, offset: 0 },
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }
                    if self.ui.busy() {
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn draw_banners(&mut self, ctx: &egui::Context) {
        if self.ui.auth_expired {
            egui::TopBottomPanel::top("auth_banner").show(ctx, |ui| {
                ui.colored_label(
                    egui::Color32::from_rgb(220, 120, 50),
                    "Your session has expired. Update the token in settings and start a new game.",
                );
            });
        }

        if let Some(error) = self.ui.error.clone() {
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(200, 70, 70), &error);
                    if ui.small_button("Dismiss").clicked() {
                        self.ui.error = None;
                    }
                });
            });
        }
    }

    fn draw_settings_panel(&mut self, ctx: &egui::Context) {
        if !self.ui.show_settings {
            return;
        }

        egui::SidePanel::left("settings")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Settings");
                ui.separator();

                ui.label("UI Scale");
                ui.add(egui::Slider::new(&mut self.settings.ui_scale, 0.75..=2.0));

                ui.separator();
                ui.label("Server URL");
                ui.text_edit_singleline(&mut self.settings.server_url);

                ui.label("Access token");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings.token)
                        .password(true)
                        .hint_text("Bearer token"),
                );

                ui.separator();
                if ui.button("Apply & Save").clicked() {
                    save_settings(&self.settings);
                    self.ui.auth_expired = false;
                    self.ui.error = None;
                    send(
                        &mut self.ui,
                        &self.cmd_tx,
                        EngineCommand::Configure {
                            base_url: self.settings.server_url.clone(),
                            token: self.settings.token_opt(),
                        },
                    );
                    send(&mut self.ui, &self.cmd_tx, EngineCommand::StartSession);
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_responses();
        self.draw_top_bar(ctx);
        self.draw_banners(ctx);
        self.draw_settings_panel(ctx);

        match self.ui.view {
            View::Game => game_panel::draw(ctx, &mut self.ui, &self.cmd_tx),
            View::History => history_panel::draw(ctx, &mut self.ui, &self.cmd_tx),
        }
    }
}
