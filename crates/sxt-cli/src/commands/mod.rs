//! Subcommand implementations.

pub(crate) mod biscuit;
pub(crate) mod keys;
pub(crate) mod login;
pub(crate) mod logout;
