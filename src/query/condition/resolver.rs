// SPDX-License-Identifier: MIT

//! Operator lookup table for conditions

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::date;
use crate::error::QueryError;
use crate::query::ops::ConditionOp;
use crate::query::types::{Condition, Fragment};

type Resolve = Box<dyn Fn(Value) -> Value + Send + Sync>;

static OPERATOR_TABLE: Lazy<HashMap<&'static str, Resolve>> = Lazy::new(|| {
    ConditionOp::ALL
        .into_iter()
        .map(|op| {
            let resolve: Resolve = match op.symbol() {
                None => Box::new(|value: Value| value),
                Some(symbol) => Box::new(move |value: Value| {
                    let mut wrapped = Map::new();
                    wrapped.insert(symbol.to_string(), value);
                    Value::Object(wrapped)
                }),
            };
            (op.as_str(), resolve)
        })
        .collect()
});

/// Resolve a condition to its query-operator fragment (without the `prop` key)
pub fn resolve(condition: &Condition) -> Result<Value, QueryError> {
    let value = if condition.is_date {
        date::reinterpret(&condition.value)?
    } else {
        Value::from(&condition.value)
    };

    let resolve = OPERATOR_TABLE
        .get(condition.op.as_str())
        .ok_or_else(|| QueryError::unknown_operator("condition", &condition.op))?;
    Ok(resolve(value))
}

/// Resolve a condition to `{ prop: fragment }`
pub fn field_fragment(condition: &Condition) -> Result<Fragment, QueryError> {
    let mut fragment = Map::new();
    fragment.insert(condition.prop.clone(), resolve(condition)?);
    Ok(fragment)
}
