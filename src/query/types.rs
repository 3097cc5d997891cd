// SPDX-License-Identifier: MIT

//! Definition types for expressions and conditions
//!
//! These mirror the documents callers write (YAML, JSON, or in code) and are
//! read-only for the whole compilation call.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::ops::{ConditionOp, ExpressionOp};

/// Named expressions, iterated in insertion order when merging
pub type ExpressionSet = IndexMap<String, Expression>;

/// Named conditions referenced by expressions
pub type ConditionSet = IndexMap<String, Condition>;

/// A single-key query object produced while evaluating a node
pub type Fragment = Map<String, Value>;

/// The merged query returned by the compiler
pub type Query = Map<String, Value>;

/// A complete query definition: expressions plus the conditions they use
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QueryDefinition {
    #[serde(default)]
    pub expressions: ExpressionSet,
    #[serde(default)]
    pub conditions: ConditionSet,
}

/// A named, reusable predicate over one document field
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    /// Dot-path of the document field, e.g. `owns.real_estate`
    pub prop: String,
    #[schemars(with = "ConditionOp")]
    pub op: String,
    pub value: ConditionValue,
    /// Reinterpret `value` as a date before building the fragment
    #[serde(rename = "isDate", default, skip_serializing_if = "is_false")]
    pub is_date: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Condition {
    pub fn new(
        prop: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            prop: prop.into(),
            op: op.into(),
            value: value.into(),
            is_date: false,
        }
    }

    /// Mark the value as a date
    pub fn as_date(mut self) -> Self {
        self.is_date = true;
        self
    }
}

/// A scalar condition value
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

/// A condition value: a scalar or an ordered list of scalars
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<&ConditionValue> for Value {
    fn from(value: &ConditionValue) -> Self {
        match value {
            ConditionValue::Scalar(scalar) => scalar.into(),
            ConditionValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<Scalar> for ConditionValue {
    fn from(scalar: Scalar) -> Self {
        ConditionValue::Scalar(scalar)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        Scalar::from(s).into()
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        Scalar::from(s).into()
    }
}

impl From<bool> for ConditionValue {
    fn from(b: bool) -> Self {
        Scalar::from(b).into()
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        Scalar::from(n).into()
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ConditionValue {
    fn from(items: Vec<T>) -> Self {
        ConditionValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// The slot of an expression node: a condition name or a nested expression
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum Operand {
    ConditionRef(String),
    SubExpression(Box<Expression>),
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::ConditionRef(name.to_string())
    }
}

impl From<Expression> for Operand {
    fn from(expression: Expression) -> Self {
        Operand::SubExpression(Box::new(expression))
    }
}

/// Deepest expression nesting the builder accepts, counting the root node
pub const MAX_EXPRESSION_DEPTH: usize = 64;

/// A node of a boolean expression tree
///
/// `use`, `not` and `match_element` take their operand in `condition`;
/// `and`, `or` and `nor` take `left` and `right`.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Expression {
    #[schemars(with = "ExpressionOp")]
    pub op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Operand>,
}

impl Expression {
    /// `{ op: "use", condition }`
    pub fn use_condition(name: &str) -> Self {
        Self::unary(ExpressionOp::Use, name)
    }

    /// A node taking its operand in the `condition` slot
    pub fn unary(op: ExpressionOp, operand: impl Into<Operand>) -> Self {
        Self {
            op: op.to_string(),
            condition: Some(operand.into()),
            left: None,
            right: None,
        }
    }

    /// A node taking `left` and `right` operands
    pub fn binary(op: ExpressionOp, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self {
            op: op.to_string(),
            condition: None,
            left: Some(left.into()),
            right: Some(right.into()),
        }
    }
}
