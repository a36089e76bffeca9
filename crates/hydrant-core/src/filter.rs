//! `$filter` expressions for list operations.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! expression := clause ( "and" clause )*
//! clause     := field operator literal
//! operator   := eq | ne | gt | ge | lt | le
//! literal    := 'text' | "text" | number | true | false | null | word
//! ```
//!
//! Expressions are evaluated against entities serialized with `serde_json`,
//! so any `Serialize` type can be filtered.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{HydrantError, HydrantResult};

/// Conventional query variable carrying filter expressions.
pub const FILTER_VARIABLE: &str = "$filter";

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
}

impl FilterOperator {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::Ne => ordering != Some(Ordering::Equal),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        })
    }
}

/// One `field op literal` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Field path, dot-separated for nested objects.
    pub field: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Literal compared against.
    pub literal: Value,
}

impl FilterClause {
    /// Evaluates the clause against a serialized entity.
    #[must_use]
    pub fn matches(&self, entity: &Value) -> bool {
        let actual = lookup(entity, &self.field).unwrap_or(&Value::Null);
        self.operator.holds(compare(actual, &self.literal))
    }
}

/// A conjunction of [`FilterClause`]s.
///
/// # Example
///
/// ```
/// use hydrant_core::FilterExpression;
/// use serde_json::json;
///
/// let filter: FilterExpression = "price gt 10 and name ne 'Widget'".parse().unwrap();
///
/// assert!(filter.matches(&json!({ "name": "Gadget", "price": 12.5 })));
/// assert!(!filter.matches(&json!({ "name": "Widget", "price": 12.5 })));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterExpression {
    clauses: Vec<FilterClause>,
}

impl FilterExpression {
    /// Parses an expression. Blank input yields the empty expression.
    pub fn parse(input: &str) -> HydrantResult<Self> {
        let tokens = tokenize(input)?;
        let mut clauses = Vec::new();
        let mut tokens = tokens.into_iter().peekable();

        while let Some(field) = tokens.next() {
            let Token::Word(field) = field else {
                return Err(invalid("expected a field name"));
            };
            let operator = match tokens.next() {
                Some(Token::Word(op)) => FilterOperator::parse(&op)
                    .ok_or_else(|| invalid(format!("unknown operator '{op}'")))?,
                _ => return Err(invalid(format!("missing operator after '{field}'"))),
            };
            let literal = match tokens.next() {
                Some(Token::Quoted(text)) => Value::String(text),
                Some(Token::Word(word)) => parse_literal(&word),
                None => return Err(invalid(format!("missing literal after '{field} {operator}'"))),
            };
            clauses.push(FilterClause {
                field,
                operator,
                literal,
            });

            match tokens.next() {
                None => break,
                Some(Token::Word(word)) if word.eq_ignore_ascii_case("and") => {
                    if tokens.peek().is_none() {
                        return Err(invalid("dangling 'and'"));
                    }
                }
                Some(_) => return Err(invalid("clauses must be joined with 'and'")),
            }
        }

        Ok(Self { clauses })
    }

    /// Returns the clauses.
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Returns `true` if the expression has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates the expression against a serialized entity.
    #[must_use]
    pub fn matches(&self, entity: &Value) -> bool {
        self.clauses.iter().all(|clause| clause.matches(entity))
    }

    /// Serializes `entity` and evaluates the expression against it.
    ///
    /// Entities that fail to serialize never match.
    #[must_use]
    pub fn matches_entity<T: Serialize>(&self, entity: &T) -> bool {
        if self.is_empty() {
            return true;
        }
        serde_json::to_value(entity).is_ok_and(|value| self.matches(&value))
    }
}

impl FromStr for FilterExpression {
    type Err = HydrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FilterExpression {
    type Error = HydrantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FilterExpression> for String {
    fn from(value: FilterExpression) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{} {} ", clause.field, clause.operator)?;
            match &clause.literal {
                Value::String(text) => write!(f, "'{}'", text.replace('\'', "''"))?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
}

fn invalid(message: impl Into<String>) -> HydrantError {
    HydrantError::bad_argument(FILTER_VARIABLE, format!("invalid filter: {}", message.into()))
}

fn tokenize(input: &str) -> HydrantResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == c {
                    // A doubled quote is an escaped quote.
                    if chars.peek() == Some(&c) {
                        chars.next();
                        text.push(c);
                        continue;
                    }
                    closed = true;
                    break;
                }
                text.push(ch);
            }
            if !closed {
                return Err(invalid("unterminated string literal"));
            }
            tokens.push(Token::Quoted(text));
            continue;
        }

        let mut word = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            chars.next();
        }
        tokens.push(Token::Word(word));
    }

    Ok(tokens)
}

fn parse_literal(word: &str) -> Value {
    match word.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Ok(i) = word.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = word.parse::<f64>() {
        return Value::from(f);
    }
    Value::String(word.to_string())
}

fn lookup<'a>(entity: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(entity, |value, segment| {
        let object = value.as_object()?;
        object.get(segment).or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(segment))
                .map(|(_, v)| v)
        })
    })
}

fn compare(actual: &Value, literal: &Value) -> Option<Ordering> {
    match (actual, literal) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
