//! Command dispatch for operator actions
//!
//! This module handles:
//! - Resolving action ids and their options
//! - Building the switcher command for each action
//! - Holding the freeze toggle

mod dispatcher;

pub use dispatcher::{ActionOptions, CommandDispatcher};
