use std::sync::mpsc::Sender;

use eframe::egui;

use crate::engine::mention::{self, LiveScan};
use crate::engine::protocol::EngineCommand;
use crate::model::guess::{Guess, GOD_LABELS};
use crate::model::session::{Move, Phase};
use crate::ui::app::{send, UiState};

pub fn draw(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add_space(4.0);

            ui.columns(3, |cols| {
                for (idx, col) in cols.iter_mut().enumerate() {
                    draw_god_card(col, state, cmd_tx, idx);
                }
            });

            ui.add_space(8.0);
            draw_dialogue(ui, state);
            ui.add_space(6.0);
            draw_question_input(ui, ctx, state, cmd_tx);
            ui.add_space(10.0);

            ui.vertical_centered(|ui| {
                let can_submit = !state.busy() && state.session.phase == Phase::Active;
                if ui
                    .add_enabled(can_submit, egui::Button::new("⚖ Submit Judgment"))
                    .clicked()
                {
                    send(state, cmd_tx, EngineCommand::Submit { confirmed: false });
                }
            });
        });
    });

    draw_confirm_modal(ctx, state, cmd_tx);
    draw_result_modal(ctx, state, cmd_tx);
}

/* =========================
   God cards
   ========================= */

fn draw_god_card(
    ui: &mut egui::Ui,
    state: &mut UiState,
    cmd_tx: &Sender<EngineCommand>,
    idx: usize,
) {
    let label = GOD_LABELS[idx];
    let selected = state.session.selected_target == Some(idx);

    let fill = if selected {
        egui::Color32::from_rgb(45, 50, 80)
    } else {
        egui::Color32::from_rgb(32, 34, 42)
    };

    egui::Frame::new()
        .fill(fill)
        .corner_radius(8)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                let title = egui::RichText::new(format!("God {label}")).heading();
                if ui.selectable_label(selected, title).clicked() {
                    send(state, cmd_tx, EngineCommand::SelectTarget(Some(idx)));
                }

                if let Some(result) = &state.session.result {
                    ui.label(
                        egui::RichText::new(result.identities[idx].label())
                            .color(egui::Color32::GOLD),
                    );
                }

                ui.add_space(4.0);
                draw_guess_combo(ui, state, cmd_tx, idx);
            });
        });
}

fn draw_guess_combo(
    ui: &mut egui::Ui,
    state: &mut UiState,
    cmd_tx: &Sender<EngineCommand>,
    idx: usize,
) {
    let current = state.session.guesses[idx];

    // Identities already claimed by another god are advisory-disabled here;
    // the server stays the final arbiter of the one-each rule.
    let taken: Vec<Guess> = state
        .session
        .guesses
        .iter()
        .enumerate()
        .filter(|(i, g)| *i != idx && **g != Guess::Unsure)
        .map(|(_, g)| *g)
        .collect();

    let active = state.session.phase == Phase::Active;
    ui.add_enabled_ui(active, |ui| {
        egui::ComboBox::from_id_salt(("guess", idx))
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for option in Guess::ALL {
                    let disabled = option != Guess::Unsure && taken.contains(&option);
                    let row = egui::SelectableLabel::new(current == option, option.label());
                    if ui.add_enabled(!disabled, row).clicked() {
                        send(state, cmd_tx, EngineCommand::SetGuess { target: idx, guess: option });
                    }
                }
            });
    });
}

/* =========================
   Dialogue log
   ========================= */

fn draw_dialogue(ui: &mut egui::Ui, state: &UiState) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Dialogue").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("Questions left: {}", state.session.questions_left));
        });
    });

    egui::Frame::new()
        .fill(egui::Color32::from_rgb(22, 24, 30))
        .corner_radius(6)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("dialogue")
                .max_height(220.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());

                    if let Some(greeting) = &state.session.greeting {
                        ui.label(
                            egui::RichText::new(greeting)
                                .italics()
                                .color(egui::Color32::GRAY),
                        );
                        ui.add_space(4.0);
                    }

                    if state.session.history.is_empty() {
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new("No questions asked yet.")
                                    .italics()
                                    .color(egui::Color32::DARK_GRAY),
                            );
                        });
                    }

                    for mv in &state.session.history {
                        draw_exchange(ui, mv);
                    }
                });
        });
}

pub fn draw_exchange(ui: &mut egui::Ui, mv: &Move) {
    let label = GOD_LABELS[mv.target_index.min(2)];

    let question = styled(format!("To God {label}: {}", mv.question), mv.is_masked);
    let answer = styled(format!("God {label}: {}", mv.answer), mv.is_masked);

    ui.add_space(4.0);
    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
        bubble(ui, egui::Color32::from_rgb(40, 70, 120), question);
    });
    bubble(ui, egui::Color32::from_rgb(50, 42, 80), answer);
}

/// Masked exchanges render struck-through and greyed instead of as answers.
fn styled(text: String, masked: bool) -> egui::RichText {
    let rich = egui::RichText::new(text);
    if masked {
        rich.strikethrough().color(egui::Color32::DARK_GRAY)
    } else {
        rich.color(egui::Color32::WHITE)
    }
}

fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: egui::RichText) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(8)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(text);
        });
}

/* =========================
   Question input + targeting
   ========================= */

fn draw_question_input(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    state: &mut UiState,
    cmd_tx: &Sender<EngineCommand>,
) {
    let picker_was_open = state.picker.open;

    if picker_was_open {
        let (up, down, enter, esc) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if up {
            state.picker.cycle_up();
        }
        if down {
            state.picker.cycle_down();
        }
        if esc {
            state.picker.close();
        }
        if enter {
            let highlighted = state.picker.highlighted;
            confirm_picker(state, highlighted, cmd_tx);
        }
    }

    if state.picker.open {
        ui.horizontal(|ui| {
            ui.label("Ask:");
            let mut confirm: Option<usize> = None;
            for idx in 0..GOD_LABELS.len() {
                let highlighted = state.picker.highlighted == idx;
                if ui
                    .selectable_label(highlighted, format!("God {}", GOD_LABELS[idx]))
                    .clicked()
                {
                    confirm = Some(idx);
                }
            }
            if let Some(idx) = confirm {
                confirm_picker(state, idx, cmd_tx);
            }
        });
    }

    let input_id = egui::Id::new("question_input");
    let can_ask = !state.busy()
        && state.session.phase == Phase::Active
        && state.session.questions_left > 0;

    let response = ui.horizontal(|ui| {
        let response = ui.add_enabled(
            can_ask,
            egui::TextEdit::singleline(&mut state.input_text)
                .id(input_id)
                .desired_width(ui.available_width() - 70.0)
                .hint_text("Ask a yes/no question… type @A, @B or @C to target a god"),
        );

        if response.changed() {
            match mention::scan_live(&state.input_text) {
                LiveScan::OpenPicker => state.picker.open(),
                LiveScan::Resolve { target, text } => {
                    state.input_text = text;
                    state.picker.close();
                    send(state, cmd_tx, EngineCommand::SelectTarget(Some(target)));
                }
                LiveScan::None => state.picker.close(),
            }
        }

        if ui.add_enabled(can_ask, egui::Button::new("Ask")).clicked() {
            try_ask(state, cmd_tx);
        }

        response
    })
    .inner;

    let enter = ctx.input(|i| i.key_pressed(egui::Key::Enter));
    if enter && response.lost_focus() && !picker_was_open {
        try_ask(state, cmd_tx);
        ui.memory_mut(|m| m.request_focus(input_id));
    }

    let targeting = match state.session.selected_target {
        Some(i) => format!("Targeting: God {}", GOD_LABELS[i]),
        None => "Targeting: none — select a god card or type @A/@B/@C".to_string(),
    };
    ui.label(egui::RichText::new(targeting).small().color(egui::Color32::GRAY));
}

fn confirm_picker(state: &mut UiState, target: usize, cmd_tx: &Sender<EngineCommand>) {
    state.input_text = mention::strip_pending_mention(&state.input_text);
    state.picker.close();
    send(state, cmd_tx, EngineCommand::SelectTarget(Some(target)));
}

/// Local gate before dispatch; the controller re-checks everything anyway.
fn try_ask(state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    if state.busy() || state.session.phase != Phase::Active {
        return;
    }

    let mut text = state.input_text.trim().to_string();

    // A leading @<label> the live scan never resolved still wins here.
    let mut inline_target = None;
    if let Some((t, rest)) = mention::split_submit(&text) {
        inline_target = Some(t);
        text = rest;
    }

    let target = inline_target.or(state.session.selected_target);
    if target.is_none() || text.is_empty() || state.session.questions_left == 0 {
        return;
    }

    send(state, cmd_tx, EngineCommand::Ask { target: inline_target, question: text });
    state.input_text.clear();
    state.picker.close();
}

/* =========================
   Modals
   ========================= */

fn draw_confirm_modal(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    if !state.confirm_submit {
        return;
    }

    egui::Window::new("Unfinished judgment")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("You haven't assigned identities to all gods. Submit anyway?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Submit anyway").clicked() {
                    state.confirm_submit = false;
                    send(state, cmd_tx, EngineCommand::Submit { confirmed: true });
                }
                if ui.button("Keep playing").clicked() {
                    state.confirm_submit = false;
                }
            });
        });
}

fn draw_result_modal(ctx: &egui::Context, state: &mut UiState, cmd_tx: &Sender<EngineCommand>) {
    if state.session.phase != Phase::Resolved {
        return;
    }
    let Some(result) = state.session.result.clone() else {
        return;
    };

    let title = if result.win { "🎉 Victory" } else { "💀 Defeat" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(if result.win {
                "You have correctly solved the riddle!"
            } else {
                "Your logic was flawed."
            });

            ui.add_space(6.0);
            ui.label(egui::RichText::new("The truth revealed:").strong());

            for (idx, identity) in result.identities.iter().enumerate() {
                let guess = state.session.guesses[idx];
                let correct = guess.matches(*identity);
                let color = if correct {
                    egui::Color32::from_rgb(110, 200, 110)
                } else {
                    egui::Color32::from_rgb(210, 100, 100)
                };
                ui.horizontal(|ui| {
                    ui.label(format!("God {}:", GOD_LABELS[idx]));
                    ui.label(egui::RichText::new(identity.label()).strong());
                    ui.label(
                        egui::RichText::new(format!("(you guessed {})", guess.label()))
                            .color(color),
                    );
                });
            }

            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(format!(
                    "Language: Yes = \"{}\", No = \"{}\"",
                    result.language_map.yes, result.language_map.no
                ))
                .color(egui::Color32::GOLD),
            );

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let idle = !state.busy();
                if ui.add_enabled(idle, egui::Button::new("Play Again")).clicked() {
                    send(state, cmd_tx, EngineCommand::PlayAgain);
                }
            });
        });
}
