/// One validated game, player 1 always the side that moved first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResult {
    pub division: String,
    pub round: u32,
    pub player1: String,
    pub score1: i32,
    pub player2: String,
    pub score2: i32,
}
