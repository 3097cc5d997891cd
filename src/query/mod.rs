// SPDX-License-Identifier: MIT

//! Query building from reusable conditions and expressions
//!
//! A definition names conditions (leaf predicates over one document field)
//! and expressions (boolean trees over those conditions). Every expression is
//! compiled into a MongoDB-style filter and the results are merged.

pub mod compiler;
pub mod condition;
pub mod engine;
pub mod expression;
pub mod loader;
pub mod ops;
pub mod types;
pub mod validation;

pub use engine::{compile, QueryBuilder};
pub use ops::{ConditionOp, ExpressionOp};
pub use types::{
    Condition, ConditionSet, ConditionValue, Expression, ExpressionSet, Fragment, Operand, Query,
    QueryDefinition, Scalar, MAX_EXPRESSION_DEPTH,
};
