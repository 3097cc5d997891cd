//! Expression tree evaluator
//!
//! Walks the tree with an explicit work stack, depth-first with the left
//! operand fully evaluated before the right one. Trees nested deeper than
//! `MAX_EXPRESSION_DEPTH` are rejected, since dropping the compiled query (and
//! the input tree) still recurses once per level.

use serde_json::{Map, Value};

use crate::error::QueryError;
use crate::query::condition::field_fragment;
use crate::query::ops::ExpressionOp;
use crate::query::types::{ConditionSet, Expression, Fragment, Operand, MAX_EXPRESSION_DEPTH};

enum Task<'a> {
    /// Expand a node at the given depth into its operands
    Visit(&'a Expression, usize),
    /// Resolve an operand of a node at the given depth
    Operand(&'a Operand, usize),
    /// Pop the operand fragments of a node and combine them
    Assemble(ExpressionOp),
}

/// Evaluate an expression against the condition dictionary
pub fn evaluate(
    expression: &Expression,
    conditions: &ConditionSet,
) -> Result<Fragment, QueryError> {
    let mut tasks = vec![Task::Visit(expression, 1)];
    let mut fragments: Vec<Fragment> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(node, depth) => {
                if depth > MAX_EXPRESSION_DEPTH {
                    return Err(QueryError::TooDeep {
                        max: MAX_EXPRESSION_DEPTH,
                    });
                }
                let op: ExpressionOp = node.op.parse()?;
                tasks.push(Task::Assemble(op));
                // reversed so the left operand is popped first
                for operand in operands(node, op)?.into_iter().rev() {
                    tasks.push(Task::Operand(operand, depth));
                }
            }
            Task::Operand(Operand::ConditionRef(name), _) => {
                let condition = conditions
                    .get(name)
                    .ok_or_else(|| QueryError::UnknownCondition(name.clone()))?;
                fragments.push(field_fragment(condition)?);
            }
            Task::Operand(Operand::SubExpression(node), depth) => {
                tasks.push(Task::Visit(node, depth + 1))
            }
            Task::Assemble(op) => {
                let fragment = assemble(op, &mut fragments)?;
                fragments.push(fragment);
            }
        }
    }

    // exactly one fragment remains once the root is assembled
    let root = pop_fragment(&mut fragments)?;
    if !fragments.is_empty() {
        return Err(QueryError::internal(format!(
            "{} fragment(s) left after assembling the root",
            fragments.len()
        )));
    }
    Ok(root)
}

fn operands(node: &Expression, op: ExpressionOp) -> Result<Vec<&Operand>, QueryError> {
    if op.is_binary() {
        Ok(vec![
            required(&node.left, op, "left")?,
            required(&node.right, op, "right")?,
        ])
    } else {
        Ok(vec![required(&node.condition, op, "condition")?])
    }
}

fn required<'a>(
    slot: &'a Option<Operand>,
    op: ExpressionOp,
    name: &str,
) -> Result<&'a Operand, QueryError> {
    slot.as_ref()
        .ok_or_else(|| QueryError::missing_operand(op.as_str(), name))
}

fn assemble(op: ExpressionOp, fragments: &mut Vec<Fragment>) -> Result<Fragment, QueryError> {
    let Some(symbol) = op.symbol() else {
        // `use` passes its operand through
        return pop_fragment(fragments);
    };

    let value = if op.is_binary() {
        let right = pop_fragment(fragments)?;
        let left = pop_fragment(fragments)?;
        Value::Array(vec![Value::Object(left), Value::Object(right)])
    } else {
        Value::Object(pop_fragment(fragments)?)
    };

    let mut fragment = Map::new();
    fragment.insert(symbol.to_string(), value);
    Ok(fragment)
}

fn pop_fragment(fragments: &mut Vec<Fragment>) -> Result<Fragment, QueryError> {
    fragments
        .pop()
        .ok_or_else(|| QueryError::internal("operand fragment missing from the stack"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::Condition;
    use serde_json::json;

    fn conditions() -> ConditionSet {
        let mut conditions = ConditionSet::new();
        conditions.insert(
            "C1".to_string(),
            Condition::new("build.country", "equals", "USA"),
        );
        conditions.insert(
            "C2".to_string(),
            Condition::new("build.model", "different", "APPLE"),
        );
        conditions.insert(
            "C3".to_string(),
            Condition::new("build.year", "greater_equal", 2015i64),
        );
        conditions.insert(
            "C4".to_string(),
            Condition::new("build.tags", "is_one_of", vec!["phone", "tablet"]),
        );
        conditions
    }

    fn eval(expression: &Expression) -> Value {
        Value::Object(evaluate(expression, &conditions()).unwrap())
    }

    #[test]
    fn test_use() {
        let expr = Expression::use_condition("C1");
        assert_eq!(eval(&expr), json!({"build.country": "USA"}));
    }

    #[test]
    fn test_use_with_nested_expression() {
        let expr = Expression::unary(
            ExpressionOp::Use,
            Expression::binary(ExpressionOp::And, "C1", "C3"),
        );
        assert_eq!(
            eval(&expr),
            json!({"$and": [{"build.country": "USA"}, {"build.year": {"$gte": 2015}}]})
        );
    }

    #[test]
    fn test_binary_ops_keep_left_before_right() {
        for op in [ExpressionOp::And, ExpressionOp::Or, ExpressionOp::Nor] {
            let expr = Expression::binary(op, "C1", "C2");
            let key = format!("${}", op);
            let result = eval(&expr);
            assert_eq!(result.as_object().unwrap().len(), 1);
            assert_eq!(
                result[key.as_str()],
                json!([{"build.country": "USA"}, {"build.model": {"$ne": "APPLE"}}])
            );
        }
    }

    #[test]
    fn test_mixed_operand_shapes() {
        let expr = Expression::binary(
            ExpressionOp::And,
            Expression::binary(ExpressionOp::Or, "C3", "C4"),
            "C1",
        );
        assert_eq!(
            eval(&expr),
            json!({"$and": [
                {"$or": [
                    {"build.year": {"$gte": 2015}},
                    {"build.tags": {"$in": ["phone", "tablet"]}}
                ]},
                {"build.country": "USA"}
            ]})
        );
    }

    #[test]
    fn test_not_with_condition_name() {
        let expr = Expression::unary(ExpressionOp::Not, "C2");
        assert_eq!(
            eval(&expr),
            json!({"$not": {"build.model": {"$ne": "APPLE"}}})
        );
    }

    #[test]
    fn test_unary_string_and_inline_use_agree() {
        for op in [ExpressionOp::Not, ExpressionOp::MatchElement] {
            let by_name = Expression::unary(op, "C3");
            let inline = Expression::unary(op, Expression::use_condition("C3"));
            assert_eq!(eval(&by_name), eval(&inline));
        }
    }

    #[test]
    fn test_match_element() {
        let expr = Expression::unary(
            ExpressionOp::MatchElement,
            Expression::binary(ExpressionOp::And, "C3", "C4"),
        );
        assert_eq!(
            eval(&expr),
            json!({"$elemMatch": {"$and": [
                {"build.year": {"$gte": 2015}},
                {"build.tags": {"$in": ["phone", "tablet"]}}
            ]}})
        );
    }

    #[test]
    fn test_nor_with_negated_or() {
        let expr = Expression::binary(
            ExpressionOp::Nor,
            "C1",
            Expression::unary(
                ExpressionOp::Not,
                Expression::binary(ExpressionOp::Or, "C3", "C4"),
            ),
        );
        let result = eval(&expr);
        let nor = result["$nor"].as_array().unwrap();
        assert_eq!(nor.len(), 2);
        assert_eq!(nor[1]["$not"]["$or"].as_array().unwrap().len(), 2);
    }

    fn nested_not(levels: usize) -> Expression {
        let mut expr = Expression::use_condition("C1");
        for _ in 0..levels {
            expr = Expression::unary(ExpressionOp::Not, expr);
        }
        expr
    }

    #[test]
    fn test_tree_at_depth_limit() {
        // the innermost `use` counts as one level
        let expr = nested_not(MAX_EXPRESSION_DEPTH - 1);
        let mut result = Value::Object(evaluate(&expr, &conditions()).unwrap());

        let mut depth = 0;
        while result.get("$not").is_some() {
            result = result["$not"].take();
            depth += 1;
        }
        assert_eq!(depth, MAX_EXPRESSION_DEPTH - 1);
        assert_eq!(result, json!({"build.country": "USA"}));
    }

    #[test]
    fn test_tree_past_depth_limit() {
        let expr = nested_not(MAX_EXPRESSION_DEPTH);
        match evaluate(&expr, &conditions()) {
            Err(QueryError::TooDeep { max }) => assert_eq!(max, MAX_EXPRESSION_DEPTH),
            other => panic!("Expected TooDeep, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_chain_at_depth_limit() {
        let mut expr = Expression::use_condition("C1");
        for _ in 0..(MAX_EXPRESSION_DEPTH - 1) {
            expr = Expression::binary(ExpressionOp::And, "C2", expr);
        }
        let result = eval(&expr);
        assert_eq!(result["$and"][0], json!({"build.model": {"$ne": "APPLE"}}));
    }

    #[test]
    fn test_assemble_with_missing_fragment_fails() {
        let mut fragments = vec![Fragment::new()];
        assert!(matches!(
            assemble(ExpressionOp::Or, &mut fragments),
            Err(QueryError::Internal(_))
        ));
        assert!(matches!(
            assemble(ExpressionOp::Not, &mut Vec::new()),
            Err(QueryError::Internal(_))
        ));
    }

    #[test]
    fn test_unknown_expression_operator() {
        let expr = Expression {
            op: "xor".to_string(),
            condition: None,
            left: Some("C1".into()),
            right: Some("C2".into()),
        };
        assert!(matches!(
            evaluate(&expr, &conditions()),
            Err(QueryError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_unknown_condition_reference() {
        let expr = Expression::binary(ExpressionOp::Or, "C1", "MISSING");
        match evaluate(&expr, &conditions()) {
            Err(QueryError::UnknownCondition(name)) => assert_eq!(name, "MISSING"),
            other => panic!("Expected UnknownCondition, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand() {
        let expr = Expression {
            op: "and".to_string(),
            condition: None,
            left: Some("C1".into()),
            right: None,
        };
        assert!(matches!(
            evaluate(&expr, &conditions()),
            Err(QueryError::MissingOperand { .. })
        ));
    }
}
