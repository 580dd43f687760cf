use crate::condition::Condition;
use crate::game::{Deck, GameState};
use crate::rng::GameRng;
use crate::simulation::branch::Simulation;

/// Run a single trial: shuffle a fresh copy of the deck, draw the
/// opening hand, and explore every condition against it.
pub fn run_trial(
    deck: &Deck,
    conditions: &[Condition],
    hand_size: usize,
    seed: Option<u64>,
) -> Simulation {
    let mut rng = GameRng::new(seed);
    let mut shuffled = deck.clone();
    shuffled.shuffle(&mut rng);

    let mut state = GameState::new(shuffled);
    state.draw_hand(hand_size);

    Simulation::run(state, conditions)
}
