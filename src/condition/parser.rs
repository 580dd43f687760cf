use crate::condition::ast::{
    CardCondition, Condition, ConditionOperator, Location, LogicCondition, LogicOperator,
};
use thiserror::Error;

/// Fatal errors from the condition DSL. None of these are recoverable;
/// the caller gets them verbatim.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("illegal character in card name: '{0}'")]
    IllegalCharacter(char),
    #[error("invalid location: '{0}'")]
    InvalidLocation(String),
    #[error("expected card name after number")]
    ExpectedNameAfterNumber,
    #[error("number out of range: '{0}'")]
    NumberOutOfRange(String),
    #[error("expected closing parenthesis")]
    UnmatchedParenthesis,
    #[error("unexpected closing parenthesis")]
    UnexpectedCloseParen,
    #[error("empty parentheses")]
    EmptyParentheses,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected token after valid expression")]
    TrailingTokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number {
        count: usize,
        operator: ConditionOperator,
    },
    Name(String),
    Operator(LogicOperator),
    Location(Location),
    OpenParen,
    CloseParen,
}

/// Characters allowed inside card names besides letters, digits and
/// spaces.
const NAME_PUNCTUATION: &[char] = &['-', '\'', ',', '.', '&', ':', '!', '?', '"'];

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || NAME_PUNCTUATION.contains(&c)
}

/// True when `input` starts with the keyword followed by a word
/// boundary, so "ANDY" never lexes as an operator.
fn is_keyword(input: &[char], keyword: &str) -> bool {
    let kw: Vec<char> = keyword.chars().collect();
    if input.len() < kw.len() || input[..kw.len()] != kw[..] {
        return false;
    }
    match input.get(kw.len()) {
        Some(c) => !c.is_ascii_alphanumeric() && *c != '_',
        None => true,
    }
}

/// True at the start of an `IN <location>` clause: a literal "IN"
/// followed by whitespace.
fn is_location_start(input: &[char]) -> bool {
    input.len() > 2 && input[0] == 'I' && input[1] == 'N' && input[2].is_whitespace()
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn rest(&self) -> &[char] {
        &self.input[self.pos..]
    }

    /// Lex a quantity: a digit run, an optional `+`/`-` sign, and then
    /// whitespace (or end of input). Anything else, e.g. "1st Card",
    /// is a name that happens to start with digits.
    fn try_quantity(&mut self) -> Result<bool, ParseError> {
        let mut end = self.pos;
        while end < self.input.len() && self.input[end].is_ascii_digit() {
            end += 1;
        }
        if end == self.pos {
            return Ok(false);
        }
        let digit_end = end;

        let operator = match self.input.get(end) {
            Some('+') => {
                end += 1;
                ConditionOperator::AtLeast
            }
            Some('-') => {
                end += 1;
                ConditionOperator::NoMore
            }
            _ => ConditionOperator::Exactly,
        };

        match self.input.get(end) {
            Some(c) if !c.is_whitespace() => return Ok(false),
            _ => {}
        }

        let digits: String = self.input[self.pos..digit_end].iter().collect();
        let count: usize = digits
            .parse()
            .map_err(|_| ParseError::NumberOutOfRange(digits.clone()))?;
        self.pos = end;
        self.tokens.push(Token::Number { count, operator });
        Ok(true)
    }

    fn try_location(&mut self) -> Result<bool, ParseError> {
        if !is_location_start(self.rest()) {
            return Ok(false);
        }
        self.pos += 2;
        while self.pos < self.input.len() && self.input[self.pos].is_whitespace() {
            self.pos += 1;
        }

        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        let word: String = self.input[start..self.pos].iter().collect();

        let location = match word.to_lowercase().as_str() {
            "hand" => Location::Hand,
            "deck" => Location::Deck,
            _ => return Err(ParseError::InvalidLocation(word)),
        };
        self.tokens.push(Token::Location(location));
        Ok(true)
    }

    /// Lex a name up to the next operator, location clause, or
    /// non-name character.
    fn try_name(&mut self) -> Result<bool, ParseError> {
        let mut value = String::new();
        while self.pos < self.input.len() {
            let rest = self.rest();
            if is_keyword(rest, "AND") || is_keyword(rest, "OR") || is_location_start(rest) {
                break;
            }
            let c = self.input[self.pos];
            if !is_name_char(c) {
                break;
            }
            value.push(c);
            self.pos += 1;
        }

        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(false);
        }
        self.tokens.push(Token::Name(value));
        Ok(true)
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while self.pos < self.input.len() {
            let c = self.input[self.pos];

            if c == '(' {
                self.tokens.push(Token::OpenParen);
                self.pos += 1;
                continue;
            }
            if c == ')' {
                self.tokens.push(Token::CloseParen);
                self.pos += 1;
                continue;
            }
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            if is_keyword(self.rest(), "AND") {
                self.tokens.push(Token::Operator(LogicOperator::And));
                self.pos += 3;
                continue;
            }
            if is_keyword(self.rest(), "OR") {
                self.tokens.push(Token::Operator(LogicOperator::Or));
                self.pos += 2;
                continue;
            }

            // A quantity must be followed by a name, so digits right
            // after a number token always lex as a name.
            if matches!(self.tokens.last(), Some(Token::Number { .. })) && self.try_name()? {
                continue;
            }
            if self.try_quantity()? {
                continue;
            }
            if self.try_location()? {
                continue;
            }
            if self.try_name()? {
                continue;
            }

            return Err(ParseError::IllegalCharacter(c));
        }

        Ok(self.tokens)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer {
        input: input.chars().collect(),
        pos: 0,
        tokens: Vec::new(),
    }
    .run()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume a trailing `IN <location>` clause, defaulting to hand.
    fn location(&mut self) -> Location {
        if let Some(Token::Location(location)) = self.peek() {
            let location = *location;
            self.pos += 1;
            location
        } else {
            Location::Hand
        }
    }

    /// term := NUMBER NAME location? | NAME location? | "(" expr ")"
    fn term(&mut self) -> Result<Condition, ParseError> {
        match self.next() {
            Some(Token::Number { count, operator }) => match self.next() {
                Some(Token::Name(name)) => Ok(Condition::Card(CardCondition {
                    card_name: name,
                    card_count: count,
                    operator,
                    location: self.location(),
                })),
                _ => Err(ParseError::ExpectedNameAfterNumber),
            },
            Some(Token::Name(name)) => Ok(Condition::Card(CardCondition {
                card_name: name,
                card_count: 1,
                operator: ConditionOperator::AtLeast,
                location: self.location(),
            })),
            Some(Token::OpenParen) => {
                if matches!(self.peek(), Some(Token::CloseParen)) {
                    return Err(ParseError::EmptyParentheses);
                }
                let mut expression = self.expression()?;
                match self.next() {
                    Some(Token::CloseParen) => {}
                    _ => return Err(ParseError::UnmatchedParenthesis),
                }
                if let Condition::Logic(logic) = &mut expression {
                    logic.has_parentheses = true;
                }
                Ok(expression)
            }
            Some(Token::CloseParen) => Err(ParseError::UnexpectedCloseParen),
            Some(token) => Err(ParseError::UnexpectedToken(format!("{token:?}"))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// expr := term (("AND"|"OR") term)*, strictly left-associative:
    /// AND and OR have equal precedence.
    fn expression(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.term()?;

        while let Some(Token::Operator(operator)) = self.peek() {
            let operator = *operator;
            self.pos += 1;
            let right = self.term()?;
            left = Condition::Logic(LogicCondition {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                has_parentheses: false,
            });
        }

        Ok(left)
    }

    fn parse(mut self) -> Result<Condition, ParseError> {
        let result = self.expression()?;
        match self.peek() {
            None => Ok(result),
            Some(Token::CloseParen) => Err(ParseError::UnexpectedCloseParen),
            Some(_) => Err(ParseError::TrailingTokens),
        }
    }
}

/// Parse a condition DSL string into a condition tree.
pub fn parse_condition(input: &str) -> Result<Condition, ParseError> {
    let tokens = tokenize(input)?;
    Parser { tokens, pos: 0 }.parse()
}
