// SPDX-License-Identifier: MIT

//! Validation gate
//!
//! Structurally checks every expression and condition before compilation.
//! The check is a single go/no-go pass; nothing is compiled unless it passes.

mod schema;

use async_trait::async_trait;
use futures::future::{try_join, try_join_all};

use crate::error::QueryError;
use crate::query::types::{ConditionSet, ExpressionSet};

pub use schema::{check_condition, check_expression};

/// Pre-compilation check over a pair of dictionaries
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(
        &self,
        expressions: &ExpressionSet,
        conditions: &ConditionSet,
    ) -> Result<(), QueryError>;
}

/// Validates inputs against the recognized expression and condition grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

#[async_trait]
impl Validator for SchemaValidator {
    async fn validate(
        &self,
        expressions: &ExpressionSet,
        conditions: &ConditionSet,
    ) -> Result<(), QueryError> {
        if expressions.is_empty() {
            return Err(QueryError::empty_input("expressions"));
        }
        if conditions.is_empty() {
            return Err(QueryError::empty_input("conditions"));
        }

        let expression_checks = expressions
            .iter()
            .map(|(name, expression)| async move {
                check_expression(&format!("expressions.{}", name), expression, conditions)
            });
        let condition_checks = conditions
            .iter()
            .map(|(name, condition)| async move {
                check_condition(&format!("conditions.{}", name), condition)
            });

        try_join(try_join_all(expression_checks), try_join_all(condition_checks)).await?;
        Ok(())
    }
}
