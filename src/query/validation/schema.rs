//! Grammar rules for expressions and conditions

use std::str::FromStr;

use crate::error::QueryError;
use crate::query::ops::{ConditionOp, ExpressionOp};
use crate::query::types::{
    Condition, ConditionSet, ConditionValue, Expression, Operand, MAX_EXPRESSION_DEPTH,
};

/// Check an expression tree, including every nested operand
///
/// String operands must name a condition present in `conditions`, and the
/// tree may nest at most `MAX_EXPRESSION_DEPTH` levels.
pub fn check_expression(
    path: &str,
    expression: &Expression,
    conditions: &ConditionSet,
) -> Result<(), QueryError> {
    let mut pending = vec![(path.to_string(), expression, 1)];

    while let Some((path, node, depth)) = pending.pop() {
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(QueryError::schema(
                path,
                format!("nested deeper than {} levels", MAX_EXPRESSION_DEPTH),
            ));
        }

        let op = ExpressionOp::from_str(&node.op).map_err(|_| {
            QueryError::schema(
                format!("{}.op", path),
                format!("'{}' is not one of {}", node.op, list(ExpressionOp::ALL)),
            )
        })?;

        let (required, forbidden) = if op.is_binary() {
            (
                vec![("left", &node.left), ("right", &node.right)],
                vec![("condition", &node.condition)],
            )
        } else {
            (
                vec![("condition", &node.condition)],
                vec![("left", &node.left), ("right", &node.right)],
            )
        };

        for (slot, operand) in forbidden {
            if operand.is_some() {
                return Err(QueryError::schema(
                    format!("{}.{}", path, slot),
                    format!("not allowed for '{}'", op),
                ));
            }
        }

        for (slot, operand) in required {
            let slot_path = format!("{}.{}", path, slot);
            match operand {
                None => {
                    return Err(QueryError::schema(
                        slot_path,
                        format!("required for '{}'", op),
                    ))
                }
                Some(Operand::ConditionRef(name)) => {
                    if !conditions.contains_key(name) {
                        return Err(QueryError::schema(
                            slot_path,
                            format!("condition '{}' is not defined", name),
                        ));
                    }
                }
                Some(Operand::SubExpression(child)) => {
                    pending.push((slot_path, &**child, depth + 1))
                }
            }
        }
    }

    Ok(())
}

/// Check a single condition
pub fn check_condition(path: &str, condition: &Condition) -> Result<(), QueryError> {
    if condition.prop.is_empty() {
        return Err(QueryError::schema(
            format!("{}.prop", path),
            "must not be empty",
        ));
    }

    let op = ConditionOp::from_str(&condition.op).map_err(|_| {
        QueryError::schema(
            format!("{}.op", path),
            format!("'{}' is not one of {}", condition.op, list(ConditionOp::ALL)),
        )
    })?;

    match &condition.value {
        ConditionValue::List(items) if items.is_empty() => Err(QueryError::schema(
            format!("{}.value", path),
            "list must contain at least one value",
        )),
        ConditionValue::Scalar(_) if op.requires_list() => Err(QueryError::schema(
            format!("{}.value", path),
            format!("'{}' requires a list", op),
        )),
        _ => Ok(()),
    }
}

fn list<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
