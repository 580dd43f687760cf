use crate::card::CardDetails;
use crate::condition::Condition;
use crate::input::{exportable_deck, DataFileManager, InputError, SimulationInput};
use indexmap::IndexMap;
use serde::Serialize;

/// Reads and writes simulation inputs as YAML.
pub struct YamlManager;

#[derive(Serialize)]
struct DeckDocument<'a> {
    deck: &'a IndexMap<String, CardDetails>,
}

#[derive(Serialize)]
struct ConditionsDocument {
    conditions: Vec<String>,
}

impl DataFileManager for YamlManager {
    fn import_from_string(&self, data: &str) -> Result<SimulationInput, InputError> {
        Ok(serde_yaml::from_str(data)?)
    }

    fn export_deck_to_string(
        &self,
        deck: &IndexMap<String, CardDetails>,
    ) -> Result<String, InputError> {
        let deck = exportable_deck(deck);
        Ok(serde_yaml::to_string(&DeckDocument { deck: &deck })?)
    }

    fn export_conditions_to_string(&self, conditions: &[Condition]) -> Result<String, InputError> {
        let document = ConditionsDocument {
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    fn export_simulation_to_string(&self, input: &SimulationInput) -> Result<String, InputError> {
        let cleaned = SimulationInput {
            deck: exportable_deck(&input.deck),
            conditions: input.conditions.clone(),
        };
        Ok(serde_yaml::to_string(&cleaned)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CostType, CostValue, RestrictionType};
    use crate::condition::parse_condition;

    const SAMPLE: &str = r#"
deck:
  Pot of Desires:
    qty: 3
    tags:
      - Draw
    free:
      count: 2
      oncePerTurn: true
      cost:
        type: BanishFromDeck
        value: 10
  Blue-Eyes White Dragon:
    qty: 3
    tags:
      - Monster
      - Normal
conditions:
  - 2+ Monster
  - 1 Pot of Desires AND 1+ Blue-Eyes White Dragon
"#;

    #[test]
    fn imports_deck_and_conditions() {
        let input = YamlManager.import_from_string(SAMPLE).unwrap();

        assert_eq!(input.deck.len(), 2);
        assert_eq!(input.conditions.len(), 2);

        let pot = &input.deck["Pot of Desires"];
        assert_eq!(pot.qty, 3);
        let free = pot.free.as_ref().unwrap();
        assert_eq!(free.count, 2);
        assert!(free.once_per_turn);
        let cost = free.cost.as_ref().unwrap();
        assert_eq!(cost.cost_type, CostType::BanishFromDeck);
        assert_eq!(cost.value, CostValue::Count(10));
    }

    #[test]
    fn missing_qty_defaults_to_one() {
        let input = YamlManager
            .import_from_string("deck:\n  Solo Card:\n    tags: [Monster]\nconditions: []\n")
            .unwrap();
        assert_eq!(input.deck["Solo Card"].qty, 1);
    }

    #[test]
    fn restriction_lists_deserialize() {
        let input = YamlManager
            .import_from_string(
                "deck:\n  Upstart:\n    free:\n      count: 1\n      restriction:\n        - NoPreviousDraws\nconditions: []\n",
            )
            .unwrap();
        let free = input.deck["Upstart"].free.as_ref().unwrap();
        assert_eq!(free.restrictions, vec![RestrictionType::NoPreviousDraws]);
    }

    #[test]
    fn export_filters_blank_cards() {
        let mut input = YamlManager.import_from_string(SAMPLE).unwrap();
        input
            .deck
            .insert("Empty Card".to_string(), CardDetails::default());

        let exported = YamlManager.export_simulation_to_string(&input).unwrap();

        assert!(!exported.contains("Empty Card"));
        assert!(exported.contains("Pot of Desires"));
    }

    #[test]
    fn round_trip_preserves_the_input() {
        let input = YamlManager.import_from_string(SAMPLE).unwrap();
        let exported = YamlManager.export_simulation_to_string(&input).unwrap();
        let reimported = YamlManager.import_from_string(&exported).unwrap();

        assert_eq!(input, reimported);
    }

    #[test]
    fn conditions_export_canonically() {
        let conditions = vec![parse_condition("2+ Monster AND Pot").unwrap()];
        let exported = YamlManager.export_conditions_to_string(&conditions).unwrap();

        assert!(exported.contains("2+ Monster IN HAND AND 1+ Pot IN HAND"));
    }
}
