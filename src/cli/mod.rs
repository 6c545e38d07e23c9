//! Arena CLI - unified command-line interface.
//!
//! - `arena list` - One page of contests with their current phases
//! - `arena status` - Current phases, permissions and countdown for a contest
//! - `arena watch` - Live countdown driven by the contest clock
//! - `arena register` / `arena unregister` - Registration through the gate

mod args;
pub mod commands;

pub use args::{Cli, Commands, ListArgs, RegistrationArgs, StatusArgs, WatchArgs};
