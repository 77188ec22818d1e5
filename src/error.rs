use thiserror::Error;

#[derive(Error, Debug)]
pub enum TshError {
    #[error("Malformed report line {line}: {text}")]
    MalformedLine { line: u32, text: String },

    #[error("Invalid player name {0:?}: expected at most one comma")]
    InvalidName(String),

    #[error("No record for player {player} in round {round}")]
    MissingSlot { round: u32, player: u32 },

    #[error("Round {round}: player {player} references opponent {opponent}, which has no record")]
    UnknownOpponent {
        round: u32,
        player: u32,
        opponent: String,
    },

    #[error("Invalid ledger slot: round {round}, player {player}")]
    InvalidSlot { round: u32, player: u32 },

    #[error("Round {round}: players {first} and {second} are on different boards ({first_board} vs {second_board})")]
    BoardMismatch {
        round: u32,
        first: u32,
        second: u32,
        first_board: u32,
        second_board: u32,
    },

    #[error("Round {round}: players {first} and {second} have start flags {first_start} and {second_start}, expected one 1 and one 2")]
    StartMismatch {
        round: u32,
        first: u32,
        second: u32,
        first_start: u32,
        second_start: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, TshError>;
