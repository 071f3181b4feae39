pub use crate::run::run_inviter;

pub mod config;
pub mod github;
pub mod invite;
pub mod resolve;
pub mod run;
pub mod store;
pub mod tokens;

#[cfg(test)]
mod fake;
