//! Pairing reconciliation: turn per-player round records into one result per game

use super::ledger::{Dimensions, Ledger};
use crate::error::{Result, TshError};
use crate::model::{CanonicalResult, PlayerRoundRecord, Side, SlotKey};

/// Match and bye counts for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTally {
    pub round: u32,
    pub matches: u32,
    pub byes: u32,
    /// Number of players every round should account for
    pub expected_players: u32,
}

impl RoundTally {
    fn new(round: u32, expected_players: u32) -> Self {
        Self {
            round,
            matches: 0,
            byes: 0,
            expected_players,
        }
    }

    /// Every player either played one game or had a bye
    pub fn is_balanced(&self) -> bool {
        2 * self.matches + self.byes == self.expected_players
    }
}

/// Everything reconciliation produced for one division
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub dimensions: Dimensions,
    /// Games in round-major, then ascending player order
    pub results: Vec<CanonicalResult>,
    pub rounds: Vec<RoundTally>,
}

impl Reconciliation {
    /// Rounds failing the sanity check
    pub fn unbalanced_rounds(&self) -> impl Iterator<Item = &RoundTally> {
        self.rounds.iter().filter(|t| !t.is_balanced())
    }

    pub fn total_byes(&self) -> u32 {
        self.rounds.iter().map(|t| t.byes).sum()
    }
}

/// Slots of a single round already paired or counted as a bye
struct ConsumedSlots(Vec<bool>);

impl ConsumedSlots {
    fn new(players: u32) -> Self {
        Self(vec![false; players as usize + 1])
    }

    fn contains(&self, player: u32) -> bool {
        self.0.get(player as usize).copied().unwrap_or(false)
    }

    fn consume(&mut self, player: u32) {
        if let Some(slot) = self.0.get_mut(player as usize) {
            *slot = true;
        }
    }
}

/// Pair every player of every round with their opponent.
///
/// Fails on the first missing slot or unresolvable opponent, board mismatch
/// or start-flag mismatch.
/// Unbalanced rounds are logged and reported in the result but do not fail.
pub fn reconcile(ledger: &Ledger, division: &str) -> Result<Reconciliation> {
    let dimensions = ledger.dimensions()?;
    let mut results = Vec::new();
    let mut rounds = Vec::with_capacity(dimensions.rounds as usize);

    for round in 1..=dimensions.rounds {
        let mut consumed = ConsumedSlots::new(dimensions.players);
        let mut tally = RoundTally::new(round, dimensions.players);

        for player in 1..=dimensions.players {
            if consumed.contains(player) {
                continue;
            }

            let first = ledger.get(SlotKey::new(round, player))?;
            consumed.consume(player);

            let Some(opponent) = first.opponent_id()? else {
                tally.byes += 1;
                continue;
            };

            if consumed.contains(opponent) {
                continue;
            }

            let second = ledger.get(SlotKey::new(round, opponent))?;
            consumed.consume(opponent);
            tally.matches += 1;

            results.push(pair_result(first, second, division)?);
        }

        if !tally.is_balanced() {
            log::warn!(
                "{}: round {}, found {} matches and {} byes but expected {} players",
                division,
                round,
                tally.matches,
                tally.byes,
                tally.expected_players
            );
        }
        rounds.push(tally);
    }

    log::debug!(
        "{}: {} games over {} rounds for {} players",
        division,
        results.len(),
        dimensions.rounds,
        dimensions.players
    );

    Ok(Reconciliation {
        dimensions,
        results,
        rounds,
    })
}

/// Validate two records as one game and order them first mover first
fn pair_result(
    first: &PlayerRoundRecord,
    second: &PlayerRoundRecord,
    division: &str,
) -> Result<CanonicalResult> {
    if first.board != second.board {
        return Err(TshError::BoardMismatch {
            round: first.round,
            first: first.player,
            second: second.player,
            first_board: first.board,
            second_board: second.board,
        });
    }

    let (mover, replier) = match (first.side(), second.side()) {
        (Some(Side::First), Some(Side::Reply)) => (first, second),
        (Some(Side::Reply), Some(Side::First)) => (second, first),
        _ => {
            return Err(TshError::StartMismatch {
                round: first.round,
                first: first.player,
                second: second.player,
                first_start: first.start,
                second_start: second.start,
            })
        }
    };

    Ok(CanonicalResult {
        division: division.to_string(),
        round: mover.round,
        player1: mover.name.clone(),
        score1: mover.score,
        player2: replier.name.clone(),
        score2: replier.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        round: u32,
        player: u32,
        name: &str,
        opponent: &str,
        score: i32,
        board: u32,
        start: u32,
    ) -> PlayerRoundRecord {
        PlayerRoundRecord {
            opponent: opponent.to_string(),
            score,
            board,
            start,
            ..PlayerRoundRecord::new(name, SlotKey::new(round, player))
        }
    }

    fn ledger_of(records: Vec<PlayerRoundRecord>) -> Ledger {
        let mut ledger = Ledger::new();
        for r in records {
            ledger.insert(r);
        }
        ledger
    }

    #[test]
    fn test_single_game() {
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 1, 5, 1),
            record(1, 2, "Bo Chen", "1", 0, 5, 2),
        ]);

        let rec = reconcile(&ledger, "A").unwrap();
        assert_eq!(
            rec.results,
            vec![CanonicalResult {
                division: "A".to_string(),
                round: 1,
                player1: "Ann Lee".to_string(),
                score1: 1,
                player2: "Bo Chen".to_string(),
                score2: 0,
            }]
        );
        assert_eq!(rec.rounds[0].matches, 1);
        assert_eq!(rec.rounds[0].byes, 0);
        assert_eq!(rec.unbalanced_rounds().count(), 0);
    }

    #[test]
    fn test_replier_found_first_is_swapped() {
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 380, 3, 2),
            record(1, 2, "Bo Chen", "1", 410, 3, 1),
        ]);

        let rec = reconcile(&ledger, "B").unwrap();
        assert_eq!(rec.results.len(), 1);
        assert_eq!(rec.results[0].player1, "Bo Chen");
        assert_eq!(rec.results[0].score1, 410);
        assert_eq!(rec.results[0].player2, "Ann Lee");
        assert_eq!(rec.results[0].score2, 380);
    }

    #[test]
    fn test_bye_produces_no_result() {
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 400, 1, 1),
            record(1, 2, "Bo Chen", "1", 350, 1, 2),
            record(1, 3, "Cy Diaz", "0", 50, 0, 0),
        ]);

        let rec = reconcile(&ledger, "A").unwrap();
        assert_eq!(rec.results.len(), 1);
        assert_eq!(rec.rounds[0].byes, 1);
        assert_eq!(rec.rounds[0].matches, 1);
        assert!(rec.rounds[0].is_balanced());
        assert!(rec.results.iter().all(|r| r.player1 != "Cy Diaz" && r.player2 != "Cy Diaz"));
    }

    #[test]
    fn test_non_numeric_opponent_is_a_bye() {
        let ledger = ledger_of(vec![record(1, 1, "Ann Lee", "-", 0, 0, 0)]);
        let rec = reconcile(&ledger, "A").unwrap();
        assert!(rec.results.is_empty());
        assert_eq!(rec.total_byes(), 1);
    }

    #[test]
    fn test_oversized_opponent_is_fatal() {
        let ledger = ledger_of(vec![record(1, 1, "Ann Lee", "99999999999", 1, 5, 1)]);
        assert!(matches!(
            reconcile(&ledger, "A"),
            Err(TshError::UnknownOpponent { round: 1, player: 1, .. })
        ));
    }

    #[test]
    fn test_board_mismatch_is_fatal() {
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 1, 5, 1),
            record(1, 2, "Bo Chen", "1", 0, 6, 2),
        ]);

        let err = reconcile(&ledger, "A").unwrap_err();
        assert!(matches!(
            err,
            TshError::BoardMismatch {
                round: 1,
                first: 1,
                second: 2,
                first_board: 5,
                second_board: 6
            }
        ));
    }

    #[test]
    fn test_start_mismatch_is_fatal() {
        for (a, b) in [(1, 1), (2, 2), (1, 3), (0, 2)] {
            let ledger = ledger_of(vec![
                record(1, 1, "Ann Lee", "2", 1, 5, a),
                record(1, 2, "Bo Chen", "1", 0, 5, b),
            ]);
            assert!(matches!(
                reconcile(&ledger, "A"),
                Err(TshError::StartMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_missing_opponent_slot_is_fatal() {
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 1, 5, 1),
            record(1, 2, "Bo Chen", "1", 0, 5, 2),
            record(2, 1, "Ann Lee", "2", 1, 5, 1),
        ]);
        assert!(matches!(
            reconcile(&ledger, "A"),
            Err(TshError::MissingSlot { round: 2, player: 2 })
        ));
    }

    #[test]
    fn test_unbalanced_round_is_reported_not_fatal() {
        // Player 3 points at player 1, who is already paired with 2
        let ledger = ledger_of(vec![
            record(1, 1, "Ann Lee", "2", 1, 5, 1),
            record(1, 2, "Bo Chen", "1", 0, 5, 2),
            record(1, 3, "Cy Diaz", "1", 0, 5, 2),
        ]);

        let rec = reconcile(&ledger, "A").unwrap();
        assert_eq!(rec.results.len(), 1);
        let unbalanced: Vec<_> = rec.unbalanced_rounds().collect();
        assert_eq!(unbalanced.len(), 1);
        assert_eq!(unbalanced[0].round, 1);
        assert_eq!(unbalanced[0].matches, 1);
        assert_eq!(unbalanced[0].byes, 0);
        assert_eq!(unbalanced[0].expected_players, 3);
    }

    #[test]
    fn test_results_are_round_major_and_never_double_counted() {
        let ledger = ledger_of(vec![
            record(1, 1, "P1", "3", 1, 1, 1),
            record(1, 2, "P2", "4", 1, 2, 2),
            record(1, 3, "P3", "1", 0, 1, 2),
            record(1, 4, "P4", "2", 0, 2, 1),
            record(2, 1, "P1", "2", 1, 1, 2),
            record(2, 2, "P2", "1", 0, 1, 1),
            record(2, 3, "P3", "4", 1, 2, 1),
            record(2, 4, "P4", "3", 0, 2, 2),
        ]);

        let rec = reconcile(&ledger, "A").unwrap();
        let games: Vec<_> = rec
            .results
            .iter()
            .map(|r| (r.round, r.player1.as_str(), r.player2.as_str()))
            .collect();
        assert_eq!(
            games,
            vec![
                (1, "P1", "P3"),
                (1, "P4", "P2"),
                (2, "P2", "P1"),
                (2, "P3", "P4"),
            ]
        );
        assert!(rec.rounds.iter().all(|t| t.matches == 2 && t.is_balanced()));
    }
}
