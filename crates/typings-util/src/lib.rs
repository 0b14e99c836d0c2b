#![forbid(unsafe_code)]
//! Cache coordinates, filesystem utilities, and process helpers for typings.

pub mod coordinate;
pub mod error;
pub mod fs;
pub mod process;
