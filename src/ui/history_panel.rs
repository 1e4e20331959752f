use std::sync::mpsc::Sender;

use eframe::egui;

use crate::engine::api::GameDetail;
use crate::engine::protocol::EngineCommand;
use crate::model::session::Move;
use crate::model::guess::GOD_LABELS;
use crate::ui::app::{send, UiState, HISTORY_PAGE_SIZE};
use crate::ui::game_panel::draw_exchange;

pub fn draw(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if state.replay.is_some() {
            draw_replay(ui, state);
        } else {
            draw_list(ui, state, cmd_tx);
        }
    });
}

fn draw_list(ui: &mut egui::Ui, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    ui.heading("Past Games");
    ui.separator();

    if state.history.is_empty() {
        ui.label(
            egui::RichText::new("No completed games yet.")
                .italics()
                .color(egui::Color32::GRAY),
        );
    }

    let mut open_detail: Option<i64> = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in &state.history {
            let outcome = if !item.completed {
                ("Abandoned", egui::Color32::GRAY)
            } else if item.win {
                ("Win", egui::Color32::from_rgb(110, 200, 110))
            } else {
                ("Loss", egui::Color32::from_rgb(210, 100, 100))
            };

            ui.horizontal(|ui| {
                ui.label(item.date.split('T').next().unwrap_or(&item.date));
                ui.label(egui::RichText::new(outcome.0).color(outcome.1).strong());
                ui.label(format!("{} questions", item.questions_asked));
                if ui.small_button("View").clicked() {
                    open_detail = Some(item.id);
                }
            });
            ui.separator();
        }
    });

    if let Some(session_id) = open_detail {
        send(state, cmd_tx, EngineCommand::LoadDetail { session_id });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let idle = !state.busy();

        if ui
            .add_enabled(state.history_offset > 0 && idle, egui::Button::new("Newer"))
            .clicked()
        {
            state.history_offset = state.history_offset.saturating_sub(HISTORY_PAGE_SIZE);
            let offset = state.history_offset;
            send(state, cmd_tx, EngineCommand::LoadHistory { limit: HISTORY_PAGE_SIZE, offset });
        }

        let full_page = state.history.len() as u32 == HISTORY_PAGE_SIZE;
        if ui
            .add_enabled(full_page && idle, egui::Button::new("Older"))
            .clicked()
        {
            state.history_offset += HISTORY_PAGE_SIZE;
            let offset = state.history_offset;
            send(state, cmd_tx, EngineCommand::LoadHistory { limit: HISTORY_PAGE_SIZE, offset });
        }
    });
}

fn draw_replay(ui: &mut egui::Ui, state: &mut UiState) {
    if ui.button("⬅ Back").clicked() {
        state.replay = None;
        return;
    }

    let Some((detail, timeline)) = &state.replay else {
        return;
    };

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.heading("Game Replay");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let (text, color) = if detail.win {
                ("Win", egui::Color32::from_rgb(110, 200, 110))
            } else {
                ("Loss", egui::Color32::from_rgb(210, 100, 100))
            };
            ui.label(egui::RichText::new(text).color(color).strong());
            ui.label(detail.date.split('T').next().unwrap_or(&detail.date));
        });
    });
    ui.separator();

    draw_identity_cards(ui, detail);

    ui.add_space(6.0);
    ui.label(
        egui::RichText::new(format!(
            "Language: Yes = \"{}\", No = \"{}\"",
            detail.language_map.yes, detail.language_map.no
        ))
        .color(egui::Color32::GOLD),
    );

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Question log").strong());
    draw_timeline(ui, timeline);
}

fn draw_identity_cards(ui: &mut egui::Ui, detail: &GameDetail) {
    ui.columns(3, |cols| {
        for (idx, col) in cols.iter_mut().enumerate() {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(32, 34, 42))
                .corner_radius(8)
                .inner_margin(egui::Margin::same(10))
                .show(col, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(format!("God {}", GOD_LABELS[idx])).heading());
                        ui.label(egui::RichText::new(detail.god_identities[idx].label()).strong());

                        if let Some(guesses) = &detail.user_guesses {
                            let correct = guesses[idx].matches(detail.god_identities[idx]);
                            let color = if correct {
                                egui::Color32::from_rgb(110, 200, 110)
                            } else {
                                egui::Color32::from_rgb(210, 100, 100)
                            };
                            ui.label(
                                egui::RichText::new(format!("Guessed: {}", guesses[idx].label()))
                                    .color(color),
                            );
                        }
                    });
                });
        }
    });
}

fn draw_timeline(ui: &mut egui::Ui, timeline: &[Move]) {
    if timeline.is_empty() {
        ui.label(
            egui::RichText::new("No questions were asked.")
                .italics()
                .color(egui::Color32::GRAY),
        );
        return;
    }

    egui::ScrollArea::vertical().id_salt("replay").show(ui, |ui| {
        for mv in timeline {
            ui.label(
                egui::RichText::new(format!("Round {}", mv.round))
                    .small()
                    .color(egui::Color32::GRAY),
            );
            draw_exchange(ui, mv);
            ui.add_space(4.0);
        }
    });
}
