//! Synthesize git history whose commit dates reproduce a contribution calendar.
//!
//! A calendar is normalized ([`calendar::Calendar`]), encoded into a single
//! `git fast-import` stream ([`stream::StreamEncoder`]) and handed to an
//! [`git::Importer`] in one call, so thousands of commits cost one process.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod git;
pub mod heat;
pub mod layout;
pub mod logging;
pub mod model;
pub mod stream;
pub mod util;
pub mod verify;

pub use error::{GreenwallError, ImporterError, Result};
