use std::sync::mpsc::{Receiver, Sender};

use crate::engine::api::{GameService, HttpGameService, ServiceError};
use crate::engine::controller::{SessionController, SubmitStatus};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::replay;

/// Runs on its own thread and processes UI commands strictly in order.
/// Network calls block this thread only, so at most one request is ever in
/// flight and the server stays the sole sequencing authority.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    /// Repaint handle; responses arrive off the UI thread.
    ctx: egui::Context,
    service: HttpGameService,
    controller: SessionController,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        ctx: egui::Context,
        service: HttpGameService,
    ) -> Self {
        Self {
            rx,
            tx,
            ctx,
            service,
            controller: SessionController::default(),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            self.handle(cmd);
            self.ctx.request_repaint();
        }
        tracing::debug!("command channel closed, engine thread exiting");
    }

    fn handle(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Configure { base_url, token } => {
                tracing::info!(%base_url, "reconfiguring game service");
                self.service = HttpGameService::new(&base_url, token);
                self.controller = SessionController::default();
                self.broadcast_session();
            }

            EngineCommand::StartSession | EngineCommand::PlayAgain => {
                match self.controller.start(&self.service) {
                    Ok(()) => {
                        tracing::info!(
                            session_id = ?self.controller.state().session_id,
                            "session started"
                        );
                        self.broadcast_session();
                    }
                    Err(err) => self.fail("start session", err),
                }
            }

            EngineCommand::SelectTarget(target) => {
                self.controller.select_target(target);
                self.broadcast_session();
            }

            EngineCommand::SetGuess { target, guess } => {
                self.controller.set_guess(target, guess);
                self.broadcast_session();
            }

            EngineCommand::Ask { target, question } => {
                if target.is_some() {
                    self.controller.select_target(target);
                }
                match self.controller.ask(&self.service, &question) {
                    // Ignored asks still re-broadcast so the UI's busy flag clears.
                    Ok(status) => {
                        tracing::debug!(?status, "ask handled");
                        self.broadcast_session();
                    }
                    Err(err) => self.fail("ask question", err),
                }
            }

            EngineCommand::Submit { confirmed } => {
                match self.controller.submit(&self.service, confirmed) {
                    Ok(SubmitStatus::NeedsConfirmation) => {
                        let _ = self.tx.send(EngineResponse::ConfirmSubmit);
                    }
                    Ok(_) => self.broadcast_session(),
                    Err(err) => self.fail("submit guesses", err),
                }
            }

            EngineCommand::LoadHistory { limit, offset } => {
                match self.service.fetch_history(limit, offset) {
                    Ok(items) => {
                        let _ = self.tx.send(EngineResponse::HistoryLoaded(items));
                    }
                    Err(err) => self.fail("load history", err),
                }
            }

            EngineCommand::LoadDetail { session_id } => {
                match self.service.fetch_detail(session_id) {
                    Ok(detail) => {
                        let timeline = replay::reconstruct(&detail);
                        let _ = self.tx.send(EngineResponse::ReplayLoaded { detail, timeline });
                    }
                    Err(err) => self.fail("load game detail", err),
                }
            }
        }
    }

    fn broadcast_session(&self) {
        let _ = self
            .tx
            .send(EngineResponse::SessionUpdated(self.controller.state().clone()));
    }

    fn fail(&self, context: &'static str, err: ServiceError) {
        tracing::warn!(context, error = %err, "service call failed");
        let resp = match err {
            ServiceError::Unauthorized => EngineResponse::AuthExpired,
            other => EngineResponse::ServiceFailure {
                context,
                message: other.to_string(),
            },
        };
        let _ = self.tx.send(resp);
    }
}
