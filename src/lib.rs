pub mod card;
pub mod condition;
pub mod game;
pub mod input;
pub mod rng;
pub mod simulation;
