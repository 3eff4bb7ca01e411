//! Pinning of the `ansible-playbook` version.

use crate::env::Environment;
use crate::external::ExternalCommand;
use anyhow::{Result, bail};
use std::path::Path;
use tracing::debug;

/// The only `ansible-playbook` release playbooks are tested against.
pub const REQUIRED_VERSION: &str = "1.7.2-bbg";

/// Extract the version from `ansible-playbook --version` output.
///
/// The first line reads like `ansible-playbook 1.7.2-bbg`; the version is its
/// second space-separated word.
pub fn parse_version(output: &str) -> Option<&str> {
    output
        .lines()
        .next()?
        .split(' ')
        .nth(1)
        .filter(|v| !v.is_empty())
}

/// Fail unless `found` is exactly `required`.
pub fn ensure_version(found: &str, required: &str) -> Result<()> {
    if found != required {
        bail!(
            "You are not using ansible-playbook '{found}'. \
             Current required version is: '{required}'. \
             You may install the correct version with \
             'pip install -U -r requirements.txt'"
        );
    }
    Ok(())
}

/// Ask `program` for its version and compare it against `required`.
pub fn check_version(program: &Path, required: &str, env: &Environment) -> Result<()> {
    let probe = ExternalCommand::resolve(env, program, ["--version"])?;
    let (code, output) = probe.output(env)?;
    if code != 0 {
        bail!(
            "'{} --version' exited with status {code}",
            program.display()
        );
    }

    let found = parse_version(&output).unwrap_or_default();
    debug!("found ansible-playbook version '{found}'");
    ensure_version(found, required)
}
