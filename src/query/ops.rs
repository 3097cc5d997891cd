// SPDX-License-Identifier: MIT

//! Recognized operator sets for conditions and expressions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::QueryError;

/// Operators a condition may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    /// field equals value
    Equals,
    /// $ne
    Different,
    /// $in
    IsOneOf,
    /// $nin
    IsNotOneOf,
    /// $gt
    GreaterThan,
    /// $gte
    GreaterEqual,
    /// $lt
    LessThan,
    /// $lte
    LessEqual,
    /// $exists
    Exists,
    /// $regex
    Pattern,
}

impl ConditionOp {
    pub const ALL: [ConditionOp; 10] = [
        ConditionOp::Equals,
        ConditionOp::Different,
        ConditionOp::IsOneOf,
        ConditionOp::IsNotOneOf,
        ConditionOp::GreaterThan,
        ConditionOp::GreaterEqual,
        ConditionOp::LessThan,
        ConditionOp::LessEqual,
        ConditionOp::Exists,
        ConditionOp::Pattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOp::Equals => "equals",
            ConditionOp::Different => "different",
            ConditionOp::IsOneOf => "is_one_of",
            ConditionOp::IsNotOneOf => "is_not_one_of",
            ConditionOp::GreaterThan => "greater_than",
            ConditionOp::GreaterEqual => "greater_equal",
            ConditionOp::LessThan => "less_than",
            ConditionOp::LessEqual => "less_equal",
            ConditionOp::Exists => "exists",
            ConditionOp::Pattern => "pattern",
        }
    }

    /// Query operator the value is wrapped in; `None` for a bare value
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ConditionOp::Equals => None,
            ConditionOp::Different => Some("$ne"),
            ConditionOp::IsOneOf => Some("$in"),
            ConditionOp::IsNotOneOf => Some("$nin"),
            ConditionOp::GreaterThan => Some("$gt"),
            ConditionOp::GreaterEqual => Some("$gte"),
            ConditionOp::LessThan => Some("$lt"),
            ConditionOp::LessEqual => Some("$lte"),
            ConditionOp::Exists => Some("$exists"),
            ConditionOp::Pattern => Some("$regex"),
        }
    }

    /// Whether the value must be a list
    pub fn requires_list(&self) -> bool {
        matches!(self, ConditionOp::IsOneOf | ConditionOp::IsNotOneOf)
    }
}

impl FromStr for ConditionOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::unknown_operator("condition", s))
    }
}

impl std::fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators an expression node may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionOp {
    Use,
    And,
    Or,
    Nor,
    Not,
    MatchElement,
}

impl ExpressionOp {
    pub const ALL: [ExpressionOp; 6] = [
        ExpressionOp::Use,
        ExpressionOp::And,
        ExpressionOp::Or,
        ExpressionOp::Nor,
        ExpressionOp::Not,
        ExpressionOp::MatchElement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionOp::Use => "use",
            ExpressionOp::And => "and",
            ExpressionOp::Or => "or",
            ExpressionOp::Nor => "nor",
            ExpressionOp::Not => "not",
            ExpressionOp::MatchElement => "match_element",
        }
    }

    /// Query operator wrapping the operand fragments; `None` for `use`
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ExpressionOp::Use => None,
            ExpressionOp::And => Some("$and"),
            ExpressionOp::Or => Some("$or"),
            ExpressionOp::Nor => Some("$nor"),
            ExpressionOp::Not => Some("$not"),
            ExpressionOp::MatchElement => Some("$elemMatch"),
        }
    }

    /// Binary nodes take `left`/`right`, the rest take `condition`
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            ExpressionOp::And | ExpressionOp::Or | ExpressionOp::Nor
        )
    }
}

impl FromStr for ExpressionOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpressionOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::unknown_operator("expression", s))
    }
}

impl std::fmt::Display for ExpressionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
