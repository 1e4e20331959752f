use crate::engine::api::GameDetail;
use crate::model::session::Move;

/// Rebuild the round-by-round timeline of a completed session. Pure
/// derivation over the fetched detail; nothing here is cached or mutated.
pub fn reconstruct(detail: &GameDetail) -> Vec<Move> {
    detail.move_history.iter().map(Move::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::api::MoveRecord;
    use crate::model::guess::Identity;
    use crate::model::session::LanguageMap;

    fn detail_with(moves: Vec<MoveRecord>) -> GameDetail {
        GameDetail {
            id: 7,
            date: "2026-08-01T12:00:00".into(),
            win: false,
            completed: true,
            god_identities: [Identity::False, Identity::True, Identity::Random],
            language_map: LanguageMap { yes: "Ja".into(), no: "Da".into() },
            move_history: moves,
            user_guesses: None,
        }
    }

    fn record(round: u32, answer: &str, is_masked: Option<bool>) -> MoveRecord {
        MoveRecord {
            round,
            god_index: (round as usize - 1) % 3,
            question: format!("question {round}"),
            answer: answer.into(),
            is_masked,
        }
    }

    #[test]
    fn unknown_answers_reconstruct_as_masked() {
        let timeline = reconstruct(&detail_with(vec![
            record(1, "Yes", None),
            record(2, "Unknown", None),
        ]));

        assert_eq!(timeline.len(), 2);
        assert!(!timeline[0].is_masked);
        assert!(timeline[1].is_masked);
    }

    #[test]
    fn explicit_flag_beats_textual_sentinel() {
        let timeline = reconstruct(&detail_with(vec![
            record(1, "Unknown", Some(false)),
            record(2, "Ja", Some(true)),
        ]));

        assert!(!timeline[0].is_masked);
        assert!(timeline[1].is_masked);
    }

    #[test]
    fn round_order_and_targets_are_preserved() {
        let timeline = reconstruct(&detail_with(vec![
            record(1, "Yes", None),
            record(2, "No", None),
            record(3, "Yes", None),
        ]));

        let rounds: Vec<u32> = timeline.iter().map(|m| m.round).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(timeline[2].target_index, 2);
    }
}
