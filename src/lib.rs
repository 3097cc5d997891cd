// SPDX-License-Identifier: MIT

pub mod error;
pub mod query;
pub mod server;
