use crate::config::RunConfig;
use crate::env::SSH_ARGS;
use crate::external::{ExitCode, ExternalCommand};
use crate::inventory::Inventory;
use crate::version::check_version;
use anyhow::Result;
use std::ffi::OsString;
use std::io::Write;
use tracing::debug;

/// Run the playbook described by `config`, streaming its output to `out`.
///
/// Returns the exit code of `ansible-playbook`. Errors mean the playbook was
/// never started: wrong tool version, missing environment or inventory, or a
/// program that cannot be launched.
pub fn run(config: &RunConfig, out: &mut dyn Write) -> Result<ExitCode> {
    check_version(&config.program, &config.required_version, &config.env)?;

    let mut env = config.env.clone();
    env.set_default_vars();

    let inventory = Inventory::locate(&config.environment)?;
    inventory.apply(&mut env);

    if config.forward_agent {
        env.append_var(SSH_ARGS, "-o ForwardAgent=yes");
    }

    let cmd = ExternalCommand::resolve(&env, &config.program, playbook_args(config, &inventory))?;
    debug!("Running command: {cmd} with environment: {:?}", env.vars);
    cmd.stream(&env, out)
}

/// Arguments for `ansible-playbook`, wrapper arguments first.
fn playbook_args(config: &RunConfig, inventory: &Inventory) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--inventory-file".into(),
        inventory.hosts.clone().into(),
        "--user".into(),
        config.user.clone().into(),
        "--module-path".into(),
        config.module_path.clone().into(),
        config.playbook.clone().into(),
    ];
    if config.sudo {
        args.push("--sudo".into());
    }
    args.extend(config.extra_args.iter().map(OsString::from));
    if config.syntax_check {
        args.push("--syntax-check".into());
        args.push("--list-tasks".into());
    }
    args
}
