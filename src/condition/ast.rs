use std::fmt;

/// Comparison applied to the matching-card count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    AtLeast,
    Exactly,
    NoMore,
}

impl ConditionOperator {
    /// The sign used in the DSL: `+` for at-least, nothing for exactly,
    /// `-` for no-more.
    pub fn sign(&self) -> &'static str {
        match self {
            ConditionOperator::AtLeast => "+",
            ConditionOperator::Exactly => "",
            ConditionOperator::NoMore => "-",
        }
    }
}

/// Zone a card requirement is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Hand,
    Deck,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Hand => write!(f, "HAND"),
            Location::Deck => write!(f, "DECK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOperator {
    And,
    Or,
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOperator::And => write!(f, "AND"),
            LogicOperator::Or => write!(f, "OR"),
        }
    }
}

/// Leaf requirement: count of cards matching a name or tag in a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCondition {
    pub card_name: String,
    pub card_count: usize,
    pub operator: ConditionOperator,
    pub location: Location,
}

/// Binary AND/OR node. `has_parentheses` only affects re-rendering:
/// grouping carries no evaluation meaning since AND and OR have equal
/// precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicCondition {
    pub operator: LogicOperator,
    pub left: Box<Condition>,
    pub right: Box<Condition>,
    pub has_parentheses: bool,
}

/// Parsed condition tree. Built once by the parser, immutable afterward;
/// evaluation output lives in a separate result structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Card(CardCondition),
    Logic(LogicCondition),
}

impl Condition {
    /// True if any AND node appears anywhere in the tree. Decides
    /// whether evaluation needs the hand permutation search.
    pub fn has_and(&self) -> bool {
        match self {
            Condition::Card(_) => false,
            Condition::Logic(logic) => {
                logic.operator == LogicOperator::And
                    || logic.left.has_and()
                    || logic.right.has_and()
            }
        }
    }
}

impl fmt::Display for CardCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} IN {}",
            self.card_count,
            self.operator.sign(),
            self.card_name,
            self.location
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Card(card) => write!(f, "{card}"),
            Condition::Logic(logic) => {
                if logic.has_parentheses {
                    write!(f, "({} {} {})", logic.left, logic.operator, logic.right)
                } else {
                    write!(f, "{} {} {}", logic.left, logic.operator, logic.right)
                }
            }
        }
    }
}
