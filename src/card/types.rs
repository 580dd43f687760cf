use serde::{Deserialize, Serialize};

/// How a free card's cost is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostType {
    BanishFromDeck,
    BanishFromHand,
    Discard,
    /// Life points are out of scope, so this cost is always payable.
    PayLife,
}

/// Cost value: either a number of cards (or life) or specific card names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostValue {
    Count(usize),
    Cards(Vec<String>),
}

/// Activation cost attached to a free card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    #[serde(rename = "type")]
    pub cost_type: CostType,
    pub value: CostValue,
}

/// Restrictions a free card imposes on the turn it is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionType {
    NoSpecialSummon,
    /// No further draw effects may be activated this turn.
    NoMoreDraws,
    /// Unusable if any free card was already played this turn.
    NoPreviousDraws,
}

/// Reveal `count` cards from the top of the deck, keep `pick` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excavate {
    pub count: usize,
    pub pick: usize,
}

/// What a free card demands after its draw resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostConditionType {
    BanishFromDeck,
    BanishFromHand,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostConditionValue {
    Count(usize),
    Card(String),
}

/// Post-activation requirement. Failing it discards the whole hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCondition {
    #[serde(rename = "type")]
    pub condition_type: PostConditionType,
    pub value: PostConditionValue,
}

/// Attributes of a card playable for free (no card disadvantage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeCardDetails {
    /// Cards drawn on activation.
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub once_per_turn: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
    #[serde(default, rename = "restriction", skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excavate: Option<Excavate>,
    #[serde(default, rename = "condition", skip_serializing_if = "Option::is_none")]
    pub post_condition: Option<PostCondition>,
}

fn default_qty() -> usize {
    1
}

/// Deck-list entry: how many copies of a card and what it looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(default = "default_qty")]
    pub qty: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<FreeCardDetails>,
}

impl Default for CardDetails {
    fn default() -> Self {
        CardDetails {
            qty: 1,
            tags: Vec::new(),
            free: None,
        }
    }
}

/// A single card instance. Two copies with the same name are distinct
/// values so per-evaluation "used" tracking stays exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub free: Option<FreeCardDetails>,
}

impl Card {
    pub fn new(name: impl Into<String>, details: &CardDetails) -> Self {
        Card {
            name: name.into(),
            tags: details.tags.clone(),
            free: details.free.clone(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.free.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Name or tag match: the DSL treats names and tags as one namespace.
    pub fn matches(&self, search: &str) -> bool {
        self.name == search || self.has_tag(search)
    }

    /// Total cards taken off the deck by one activation: the draw count
    /// plus any deck-banish cost.
    pub fn activation_count(&self) -> usize {
        let Some(free) = &self.free else {
            return 0;
        };
        let mut count = free.count;
        if let Some(cost) = &free.cost {
            if cost.cost_type == CostType::BanishFromDeck {
                count += match &cost.value {
                    CostValue::Count(n) => *n,
                    CostValue::Cards(names) => names.len(),
                };
            }
        }
        count
    }
}

/// Every card in `list` whose name or tags match any of `search`.
pub fn match_cards<'a>(search: &[&str], list: &'a [Card]) -> Vec<&'a Card> {
    list.iter()
        .filter(|card| search.iter().any(|s| card.matches(s)))
        .collect()
}
