//! Shared test harness modules for the billboard CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod board_unit;
mod helpers;
mod unit;
