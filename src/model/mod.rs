pub mod game;
pub mod record;

pub use game::CanonicalResult;
pub use record::{PlayerRoundRecord, Side, SlotKey};
