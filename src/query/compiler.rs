// SPDX-License-Identifier: MIT

//! Query compiler - merges every named expression into one query
//!
//! Fragments are shallow-merged in expression order. When two expressions
//! produce the same top-level key, the later one wins.

use crate::error::QueryError;
use crate::query::expression::evaluate;
use crate::query::types::{ConditionSet, ExpressionSet, Query};

/// Compile all expressions into a single merged query
pub fn compile_expressions(
    expressions: &ExpressionSet,
    conditions: &ConditionSet,
) -> Result<Query, QueryError> {
    let mut query = Query::new();

    for (name, expression) in expressions {
        let fragment = evaluate(expression, conditions)?;
        log::debug!("Compiled expression '{}' into {} key(s)", name, fragment.len());
        for (key, value) in fragment {
            query.insert(key, value);
        }
    }

    Ok(query)
}
