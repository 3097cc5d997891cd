// SPDX-License-Identifier: MIT

//! Entry point - validate, then compile
//!
//! Validation always completes before compilation starts, and a rejected
//! definition is never compiled.

use crate::error::{QueryError, Rejected};
use crate::query::compiler::compile_expressions;
use crate::query::types::{ConditionSet, ExpressionSet, Query, QueryDefinition};
use crate::query::validation::{SchemaValidator, Validator};

/// Sequences a validator and the compiler
pub struct QueryBuilder<V = SchemaValidator> {
    validator: V,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            validator: SchemaValidator,
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Validator> QueryBuilder<V> {
    pub fn with_validator(validator: V) -> Self {
        Self { validator }
    }

    /// Validate the dictionaries, then compile them into one query
    pub async fn build(
        &self,
        expressions: &ExpressionSet,
        conditions: &ConditionSet,
    ) -> Result<Query, QueryError> {
        self.validator.validate(expressions, conditions).await?;
        compile_expressions(expressions, conditions)
    }

    /// Build from a loaded definition
    pub async fn build_definition(&self, def: &QueryDefinition) -> Result<Query, QueryError> {
        self.build(&def.expressions, &def.conditions).await
    }

    /// Run only the validation step
    pub async fn check(
        &self,
        expressions: &ExpressionSet,
        conditions: &ConditionSet,
    ) -> Result<(), QueryError> {
        self.validator.validate(expressions, conditions).await
    }
}

/// Validate and compile, reporting any failure as an opaque rejection
pub async fn compile(
    expressions: &ExpressionSet,
    conditions: &ConditionSet,
) -> Result<Query, Rejected> {
    QueryBuilder::new()
        .build(expressions, conditions)
        .await
        .map_err(|err| {
            log::warn!("Rejected query definition: {}", err);
            Rejected
        })
}
