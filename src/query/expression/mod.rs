// SPDX-License-Identifier: MIT

//! Expression evaluation
//!
//! Walks a boolean expression tree and produces its query fragment:
//! - `use` resolves a single condition to `{ prop: fragment }`
//! - `and` / `or` / `nor` produce `{ "$op": [left, right] }`
//! - `not` / `match_element` wrap their operand in `$not` / `$elemMatch`

mod evaluator;

pub use evaluator::evaluate;
