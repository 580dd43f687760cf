pub mod deck;
pub mod state;

pub use deck::{Deck, BLANK_CARD_NAME};
pub use state::GameState;
