use crate::engine::api::{GameService, Result};
use crate::model::guess::Guess;
use crate::model::session::{Move, Phase, SessionState, QUESTION_BUDGET};

/// Outcome of an ask attempt. `Ignored` means a local precondition failed
/// and no request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskStatus {
    Ignored,
    Answered,
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Ignored,
    /// One or more guesses are still `Unsure`; the caller must confirm
    /// before the submission is dispatched.
    NeedsConfirmation,
    Resolved,
}

/// Owns the live session and mediates every mutation of it. All state the
/// server reports back (history, budget) replaces local state wholesale, so
/// the client can never drift from the server's view.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Begin a fresh session, discarding any prior in-memory state. Usable
    /// both on first entry and as "play again" from a resolved game. On
    /// failure the previous state is left untouched.
    pub fn start(&mut self, svc: &dyn GameService) -> Result<()> {
        let prior = self.state.phase;
        self.state.phase = Phase::Starting;

        match svc.start_session() {
            Ok(resp) => {
                self.state = SessionState {
                    phase: Phase::Active,
                    session_id: Some(resp.session_id),
                    greeting: Some(resp.message),
                    selected_target: None,
                    guesses: [Guess::Unsure; 3],
                    history: Vec::new(),
                    questions_left: QUESTION_BUDGET,
                    result: None,
                };
                Ok(())
            }
            Err(err) => {
                self.state.phase = prior;
                Err(err)
            }
        }
    }

    /// Local selection of which god the next question addresses.
    pub fn select_target(&mut self, target: Option<usize>) {
        if self.state.phase != Phase::Active {
            return;
        }
        if let Some(i) = target {
            if i >= 3 {
                return;
            }
        }
        self.state.selected_target = target;
    }

    /// Put one question to the selected god. Preconditions are re-checked
    /// here regardless of what the UI disabled; a violation is a plain no-op
    /// with no network traffic. A failed request mutates nothing.
    pub fn ask(&mut self, svc: &dyn GameService, question: &str) -> Result<AskStatus> {
        if self.state.phase != Phase::Active {
            return Ok(AskStatus::Ignored);
        }

        let question = question.trim();
        let (Some(session_id), Some(target)) = (self.state.session_id, self.state.selected_target)
        else {
            return Ok(AskStatus::Ignored);
        };

        if question.is_empty() || self.state.questions_left == 0 {
            return Ok(AskStatus::Ignored);
        }

        let resp = svc.ask_question(session_id, target, question)?;

        // Authoritative replacement, not a delta.
        self.state.history = resp.history.iter().map(Move::from).collect();
        self.state.questions_left = resp.questions_left;
        Ok(AskStatus::Answered)
    }

    pub fn set_guess(&mut self, target: usize, guess: Guess) {
        if self.state.phase != Phase::Active || target >= 3 {
            return;
        }
        self.state.guesses[target] = guess;
    }

    /// Identities already claimed by another god. Advisory mirror of the
    /// server's one-each invariant; the server remains the arbiter.
    pub fn disabled_guesses(&self, target: usize) -> Vec<Guess> {
        self.state
            .guesses
            .iter()
            .enumerate()
            .filter(|(i, g)| *i != target && **g != Guess::Unsure)
            .map(|(_, g)| *g)
            .collect()
    }

    /// Submit final guesses. Unresolved (`Unsure`) guesses are legal but
    /// gated behind an explicit confirmation. On success the session is
    /// closed; on failure it stays active and untouched.
    pub fn submit(&mut self, svc: &dyn GameService, confirmed: bool) -> Result<SubmitStatus> {
        if self.state.phase != Phase::Active {
            return Ok(SubmitStatus::Ignored);
        }

        let Some(session_id) = self.state.session_id else {
            return Ok(SubmitStatus::Ignored);
        };

        if !confirmed && self.state.guesses.contains(&Guess::Unsure) {
            return Ok(SubmitStatus::NeedsConfirmation);
        }

        self.state.phase = Phase::Submitting;
        match svc.submit_guesses(session_id, &self.state.guesses) {
            Ok(result) => {
                self.state.result = Some(result);
                self.state.phase = Phase::Resolved;
                Ok(SubmitStatus::Resolved)
            }
            Err(err) => {
                self.state.phase = Phase::Active;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::api::{
        AskResponse, GameDetail, GameHistoryItem, MoveRecord, ServiceError, StartResponse,
    };
    use crate::model::guess::Identity;
    use crate::model::session::{GameResult, LanguageMap};
    use std::cell::RefCell;

    /// Scripted stand-in for the game server, recording every call.
    #[derive(Default)]
    struct FakeService {
        asks: RefCell<Vec<(i64, usize, String)>>,
        submits: RefCell<u32>,
        fail_next: RefCell<bool>,
        answers: RefCell<Vec<AskResponse>>,
    }

    impl FakeService {
        fn failing(self) -> Self {
            *self.fail_next.borrow_mut() = true;
            self
        }

        fn script_answer(&self, answer: &str, questions_left: u8, history_len: u32) {
            let history = (1..=history_len)
                .map(|round| MoveRecord {
                    round,
                    god_index: 0,
                    question: format!("q{round}"),
                    answer: answer.into(),
                    is_masked: None,
                })
                .collect();
            self.answers.borrow_mut().push(AskResponse {
                answer: answer.into(),
                questions_left,
                history,
            });
        }

        fn take_failure(&self) -> Option<ServiceError> {
            if *self.fail_next.borrow() {
                *self.fail_next.borrow_mut() = false;
                Some(ServiceError::Network("connection refused".into()))
            } else {
                None
            }
        }
    }

    impl GameService for FakeService {
        fn start_session(&self) -> Result<StartResponse> {
            if let Some(err) = self.take_failure() {
                return Err(err);
            }
            Ok(StartResponse { session_id: 42, message: "The gods await.".into() })
        }

        fn ask_question(&self, session_id: i64, god_index: usize, question: &str)
            -> Result<AskResponse>
        {
            if let Some(err) = self.take_failure() {
                return Err(err);
            }
            self.asks
                .borrow_mut()
                .push((session_id, god_index, question.to_string()));
            Ok(self.answers.borrow_mut().remove(0))
        }

        fn submit_guesses(&self, _session_id: i64, _guesses: &[Guess; 3]) -> Result<GameResult> {
            if let Some(err) = self.take_failure() {
                return Err(err);
            }
            *self.submits.borrow_mut() += 1;
            Ok(GameResult {
                win: true,
                identities: [Identity::True, Identity::False, Identity::Random],
                language_map: LanguageMap { yes: "Ja".into(), no: "Da".into() },
            })
        }

        fn fetch_history(&self, _limit: u32, _offset: u32) -> Result<Vec<GameHistoryItem>> {
            Ok(Vec::new())
        }

        fn fetch_detail(&self, _session_id: i64) -> Result<GameDetail> {
            Err(ServiceError::Api { status: 404, detail: "not found".into() })
        }
    }

    fn active_controller(svc: &FakeService) -> SessionController {
        let mut ctl = SessionController::default();
        ctl.start(svc).unwrap();
        ctl
    }

    #[test]
    fn start_resets_everything() {
        let svc = FakeService::default();
        let ctl = active_controller(&svc);

        let state = ctl.state();
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.session_id, Some(42));
        assert_eq!(state.selected_target, None);
        assert_eq!(state.guesses, [Guess::Unsure; 3]);
        assert!(state.history.is_empty());
        assert_eq!(state.questions_left, 3);
        assert!(state.result.is_none());
    }

    #[test]
    fn failed_start_leaves_prior_state() {
        let svc = FakeService::default().failing();
        let mut ctl = SessionController::default();

        assert!(ctl.start(&svc).is_err());
        assert_eq!(ctl.state().phase, Phase::Uninitialized);

        // The same action can be retried.
        assert!(ctl.start(&svc).is_ok());
        assert_eq!(ctl.state().phase, Phase::Active);
    }

    #[test]
    fn ask_rejected_locally_without_target_question_or_budget() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);

        // No target selected.
        assert_eq!(ctl.ask(&svc, "hello?").unwrap(), AskStatus::Ignored);

        // Empty question after trimming.
        ctl.select_target(Some(1));
        assert_eq!(ctl.ask(&svc, "   ").unwrap(), AskStatus::Ignored);

        assert!(svc.asks.borrow().is_empty(), "no network call may happen");
    }

    #[test]
    fn ask_mirrors_server_budget_and_history() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.select_target(Some(0));

        svc.script_answer("Yes", 2, 1);
        assert_eq!(ctl.ask(&svc, "is the truth-teller?").unwrap(), AskStatus::Answered);
        assert_eq!(ctl.state().questions_left, 2);
        assert_eq!(ctl.state().history.len(), 1);

        // Masked answers still consume a round in the mirrored history.
        svc.script_answer("Unknown", 1, 2);
        ctl.ask(&svc, "second question").unwrap();
        assert_eq!(ctl.state().questions_left, 1);
        assert_eq!(ctl.state().history.len(), 2);
        assert!(ctl.state().history[1].is_masked);

        svc.script_answer("No", 0, 3);
        ctl.ask(&svc, "third question").unwrap();
        assert_eq!(ctl.state().questions_left, 0);

        // Budget exhausted: locally rejected, no fourth call.
        assert_eq!(ctl.ask(&svc, "one more").unwrap(), AskStatus::Ignored);
        assert_eq!(svc.asks.borrow().len(), 3);
    }

    #[test]
    fn failed_ask_mutates_nothing() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.select_target(Some(2));

        *svc.fail_next.borrow_mut() = true;
        assert!(ctl.ask(&svc, "anyone there?").is_err());

        assert_eq!(ctl.state().phase, Phase::Active);
        assert_eq!(ctl.state().questions_left, 3);
        assert!(ctl.state().history.is_empty());
    }

    #[test]
    fn taken_identities_are_disabled_for_other_gods() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);

        ctl.set_guess(0, Guess::True);
        ctl.set_guess(2, Guess::Random);

        assert_eq!(ctl.disabled_guesses(1), vec![Guess::True, Guess::Random]);
        // A god never blocks its own current value.
        assert_eq!(ctl.disabled_guesses(0), vec![Guess::Random]);
        assert_eq!(ctl.disabled_guesses(2), vec![Guess::True]);
    }

    #[test]
    fn submit_with_unsure_guesses_requires_confirmation() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.set_guess(1, Guess::True);

        assert_eq!(ctl.submit(&svc, false).unwrap(), SubmitStatus::NeedsConfirmation);
        assert_eq!(*svc.submits.borrow(), 0);

        // Confirmed submission with unresolved guesses is legal.
        assert_eq!(ctl.submit(&svc, true).unwrap(), SubmitStatus::Resolved);
        assert_eq!(*svc.submits.borrow(), 1);
    }

    #[test]
    fn complete_assignment_submits_without_confirmation() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.set_guess(0, Guess::True);
        ctl.set_guess(1, Guess::False);
        ctl.set_guess(2, Guess::Random);

        assert_eq!(ctl.submit(&svc, false).unwrap(), SubmitStatus::Resolved);
        assert_eq!(ctl.state().phase, Phase::Resolved);
        assert!(ctl.state().result.as_ref().unwrap().win);
    }

    #[test]
    fn failed_submit_returns_to_active_untouched() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.set_guess(0, Guess::True);
        ctl.set_guess(1, Guess::False);
        ctl.set_guess(2, Guess::Random);

        *svc.fail_next.borrow_mut() = true;
        assert!(ctl.submit(&svc, false).is_err());
        assert_eq!(ctl.state().phase, Phase::Active);
        assert!(ctl.state().result.is_none());
    }

    #[test]
    fn no_questions_after_resolution() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);
        ctl.select_target(Some(0));
        ctl.submit(&svc, true).unwrap();

        assert_eq!(ctl.ask(&svc, "too late").unwrap(), AskStatus::Ignored);
        assert_eq!(ctl.submit(&svc, true).unwrap(), SubmitStatus::Ignored);
        assert!(svc.asks.borrow().is_empty());
        assert_eq!(*svc.submits.borrow(), 1);
    }

    #[test]
    fn full_round_trip_then_play_again() {
        let svc = FakeService::default();
        let mut ctl = active_controller(&svc);

        ctl.select_target(Some(0));
        svc.script_answer("Yes", 2, 1);
        ctl.ask(&svc, "is the truth-teller?").unwrap();
        assert_eq!(ctl.state().questions_left, 2);
        assert_eq!(ctl.state().history.len(), 1);

        ctl.set_guess(0, Guess::True);
        ctl.set_guess(1, Guess::False);
        ctl.set_guess(2, Guess::Random);
        assert_eq!(ctl.submit(&svc, false).unwrap(), SubmitStatus::Resolved);

        let result = ctl.state().result.clone().unwrap();
        assert!(result.win);
        assert_eq!(result.language_map.yes, "Ja");

        // Play again: nothing carries over.
        ctl.start(&svc).unwrap();
        assert_eq!(ctl.state().phase, Phase::Active);
        assert_eq!(ctl.state().questions_left, 3);
        assert!(ctl.state().history.is_empty());
        assert!(ctl.state().result.is_none());
        assert_eq!(ctl.state().guesses, [Guess::Unsure; 3]);
    }
}
