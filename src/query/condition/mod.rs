// SPDX-License-Identifier: MIT

//! Condition resolution
//!
//! Turns one named condition into the right-hand side of `{ prop: fragment }`:
//! - `equals` yields the value itself
//! - every other operator wraps it, e.g. `different` yields `{ "$ne": value }`
//! - `isDate` values are reinterpreted as dates first

mod date;
mod resolver;

pub use date::reinterpret;
pub use resolver::{field_fragment, resolve};
