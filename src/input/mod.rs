pub mod json;
pub mod yaml;

use crate::card::{Card, CardDetails};
use crate::condition::{parse_condition, Condition, ParseError};
use crate::game::{Deck, BLANK_CARD_NAME};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use json::JsonManager;
pub use yaml::YamlManager;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid condition '{condition}': {source}")]
    Condition {
        condition: String,
        source: ParseError,
    },
    #[error("unsupported input format '{0}', expected yaml, yml, or json")]
    UnsupportedFormat(String),
}

/// A deck list plus the conditions to test it against, as read from a
/// data file. Deck entries keep their file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub deck: IndexMap<String, CardDetails>,
    pub conditions: Vec<String>,
}

impl SimulationInput {
    /// Expand the deck list into card instances, padded with blanks up
    /// to `deck_size`.
    pub fn build_deck(&self, deck_size: usize) -> Deck {
        let mut cards = Vec::new();
        for (name, details) in &self.deck {
            for _ in 0..details.qty {
                cards.push(Card::new(name.clone(), details));
            }
        }
        Deck::new(cards, deck_size)
    }

    /// Parse every condition string into its expression tree.
    pub fn parse_conditions(&self) -> Result<Vec<Condition>, InputError> {
        self.conditions
            .iter()
            .map(|raw| {
                parse_condition(raw).map_err(|source| InputError::Condition {
                    condition: raw.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Serialization format for simulation inputs. One implementation per
/// on-disk format.
pub trait DataFileManager {
    fn import_from_string(&self, data: &str) -> Result<SimulationInput, InputError>;
    fn export_deck_to_string(
        &self,
        deck: &IndexMap<String, CardDetails>,
    ) -> Result<String, InputError>;
    fn export_conditions_to_string(&self, conditions: &[Condition]) -> Result<String, InputError>;
    fn export_simulation_to_string(&self, input: &SimulationInput) -> Result<String, InputError>;
}

/// Filler cards padding a deck out never belong in an exported list.
pub(crate) fn exportable_deck(deck: &IndexMap<String, CardDetails>) -> IndexMap<String, CardDetails> {
    deck.iter()
        .filter(|(name, _)| name.as_str() != BLANK_CARD_NAME)
        .map(|(name, details)| (name.clone(), details.clone()))
        .collect()
}

/// Pick the manager matching a file's extension.
pub fn manager_for_path(path: &Path) -> Result<Box<dyn DataFileManager>, InputError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => Ok(Box::new(YamlManager)),
        "json" => Ok(Box::new(JsonManager)),
        other => Err(InputError::UnsupportedFormat(other.to_string())),
    }
}
