pub mod types;

pub use types::{
    match_cards, Card, CardDetails, Cost, CostType, CostValue, Excavate, FreeCardDetails,
    PostCondition, PostConditionType, PostConditionValue, RestrictionType,
};
