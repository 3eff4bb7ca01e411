//! A thin command-line wrapper around `ansible-playbook`.
//!
//! The wrapper checks that the installed `ansible-playbook` matches the pinned
//! version, assembles the SSH transport settings the playbook run relies on,
//! locates the inventory inside an environment directory and then streams the
//! playbook's output to the console, returning its exit code.
//!
//! Everything a run needs travels in a [`RunConfig`] handed to [`run`]; the
//! process environment of the wrapper itself is never modified.

pub mod args;
pub mod config;
pub mod env;
mod external;
pub mod inventory;
pub mod logging;
mod runner;
pub mod version;

pub use config::RunConfig;
pub use external::ExitCode;
pub use runner::run;
