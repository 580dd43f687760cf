use crate::card::CardDetails;
use crate::condition::Condition;
use crate::input::{exportable_deck, DataFileManager, InputError, SimulationInput};
use indexmap::IndexMap;
use serde::Serialize;

/// Reads and writes simulation inputs as JSON.
pub struct JsonManager;

#[derive(Serialize)]
struct DeckDocument<'a> {
    deck: &'a IndexMap<String, CardDetails>,
}

#[derive(Serialize)]
struct ConditionsDocument {
    conditions: Vec<String>,
}

impl DataFileManager for JsonManager {
    fn import_from_string(&self, data: &str) -> Result<SimulationInput, InputError> {
        Ok(serde_json::from_str(data)?)
    }

    fn export_deck_to_string(
        &self,
        deck: &IndexMap<String, CardDetails>,
    ) -> Result<String, InputError> {
        let deck = exportable_deck(deck);
        Ok(serde_json::to_string_pretty(&DeckDocument { deck: &deck })?)
    }

    fn export_conditions_to_string(&self, conditions: &[Condition]) -> Result<String, InputError> {
        let document = ConditionsDocument {
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn export_simulation_to_string(&self, input: &SimulationInput) -> Result<String, InputError> {
        let cleaned = SimulationInput {
            deck: exportable_deck(&input.deck),
            conditions: input.conditions.clone(),
        };
        Ok(serde_json::to_string_pretty(&cleaned)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{PostConditionType, PostConditionValue};

    const SAMPLE: &str = r#"{
        "deck": {
            "Card Destruction": {
                "qty": 1,
                "tags": ["Spell"],
                "free": {
                    "count": 3,
                    "oncePerTurn": true,
                    "condition": { "type": "Discard", "value": 3 }
                }
            },
            "Mathmech Circular": { "qty": 3, "tags": ["Monster", "Starter"] }
        },
        "conditions": ["1+ Starter"]
    }"#;

    #[test]
    fn imports_deck_and_conditions() {
        let input = JsonManager.import_from_string(SAMPLE).unwrap();

        assert_eq!(input.deck.len(), 2);
        let free = input.deck["Card Destruction"].free.as_ref().unwrap();
        assert_eq!(free.count, 3);
        let post = free.post_condition.as_ref().unwrap();
        assert_eq!(post.condition_type, PostConditionType::Discard);
        assert_eq!(post.value, PostConditionValue::Count(3));
    }

    #[test]
    fn export_filters_blank_cards() {
        let mut input = JsonManager.import_from_string(SAMPLE).unwrap();
        input
            .deck
            .insert("Empty Card".to_string(), CardDetails::default());

        let exported = JsonManager.export_simulation_to_string(&input).unwrap();

        assert!(!exported.contains("Empty Card"));
    }

    #[test]
    fn yaml_and_json_agree_on_the_model() {
        let json_input = JsonManager.import_from_string(SAMPLE).unwrap();
        let yaml = crate::input::YamlManager
            .export_simulation_to_string(&json_input)
            .unwrap();
        let yaml_input = crate::input::YamlManager.import_from_string(&yaml).unwrap();

        assert_eq!(json_input, yaml_input);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(JsonManager.import_from_string("{\"deck\": 5}").is_err());
        assert!(JsonManager.import_from_string("not json").is_err());
    }
}
