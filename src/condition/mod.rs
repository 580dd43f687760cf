pub mod ast;
pub mod evaluate;
pub mod parser;

pub use ast::{CardCondition, Condition, ConditionOperator, Location, LogicCondition, LogicOperator};
pub use evaluate::{cards_that_satisfy, evaluate, EvaluationResult};
pub use parser::{parse_condition, ParseError};
