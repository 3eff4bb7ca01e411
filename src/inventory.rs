//! Layout of an environment directory.
//!
//! An environment directory holds the `hosts` inventory for one deployment
//! target. It may also carry an `ssh_config` next to the inventory, and share a
//! `defaults.yml` with its sibling environments one level up.

use crate::env::{Environment, SSH_ARGS, VAR_DEFAULTS_FILE};
use anyhow::{Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files found in an environment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// The `hosts` inventory file. Always present.
    pub hosts: PathBuf,
    /// `../defaults.yml` relative to the environment, when it is a file.
    pub defaults_file: Option<PathBuf>,
    /// `ssh_config` inside the environment, when it is a file.
    pub ssh_config: Option<PathBuf>,
}

impl Inventory {
    /// Inspect `environment` and collect the files a playbook run uses.
    ///
    /// Fails when the directory itself does not exist, or when it has no
    /// regular `hosts` file.
    pub fn locate(environment: &Path) -> Result<Self> {
        if !environment.exists() {
            bail!("Environment '{}' does not exist", environment.display());
        }

        let hosts = environment.join("hosts");
        if !hosts.is_file() {
            bail!("Inventory file '{}' does not exist", hosts.display());
        }

        let defaults_file = Some(environment.join("../defaults.yml")).filter(|p| p.is_file());
        let ssh_config = Some(environment.join("ssh_config")).filter(|p| p.is_file());
        debug!(
            "inventory: {}, defaults: {:?}, ssh config: {:?}",
            hosts.display(),
            defaults_file,
            ssh_config
        );

        Ok(Self {
            hosts,
            defaults_file,
            ssh_config,
        })
    }

    /// Export the optional side files to the child environment.
    pub fn apply(&self, env: &mut Environment) {
        if let Some(defaults) = &self.defaults_file {
            env.append_var(VAR_DEFAULTS_FILE, defaults);
        }
        if let Some(ssh_config) = &self.ssh_config {
            let mut arg = OsString::from("-F ");
            arg.push(ssh_config);
            env.append_var(SSH_ARGS, arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// `<root>/<name>/` with a `hosts` file inside.
    fn make_environment(root: &TempDir, name: &str) -> PathBuf {
        let dir = root.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("hosts"), "[all]\nlocalhost\n").unwrap();
        dir
    }

    #[test]
    fn test_missing_environment_errors() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope");

        let err = Inventory::locate(&missing).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Environment '{}' does not exist", missing.display())
        );
    }

    #[test]
    fn test_missing_hosts_errors() {
        let root = TempDir::new().unwrap();

        let err = Inventory::locate(root.path()).unwrap_err();
        assert!(err.to_string().starts_with("Inventory file '"));
        assert!(err.to_string().ends_with("hosts' does not exist"));
    }

    #[test]
    fn test_hosts_directory_is_not_an_inventory() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("hosts")).unwrap();

        assert!(Inventory::locate(root.path()).is_err());
    }

    #[test]
    fn test_locate_plain_environment() {
        let root = TempDir::new().unwrap();
        let dir = make_environment(&root, "staging");

        let inventory = Inventory::locate(&dir).unwrap();
        assert_eq!(inventory.hosts, dir.join("hosts"));
        assert_eq!(inventory.defaults_file, None);
        assert_eq!(inventory.ssh_config, None);

        let mut env = Environment::empty(".");
        inventory.apply(&mut env);
        assert!(env.vars.is_empty());
    }

    #[test]
    fn test_side_files_are_exported() {
        let root = TempDir::new().unwrap();
        let dir = make_environment(&root, "production");
        fs::write(root.path().join("defaults.yml"), "---\n").unwrap();
        fs::write(dir.join("ssh_config"), "Host *\n").unwrap();

        let inventory = Inventory::locate(&dir).unwrap();
        let defaults = dir.join("../defaults.yml");
        let ssh_config = dir.join("ssh_config");
        assert_eq!(inventory.defaults_file.as_deref(), Some(defaults.as_path()));
        assert_eq!(inventory.ssh_config.as_deref(), Some(ssh_config.as_path()));

        let mut env = Environment::empty(".");
        env.set_var(SSH_ARGS, "-o ControlPersist=300");
        inventory.apply(&mut env);

        assert_eq!(
            env.get_var(VAR_DEFAULTS_FILE),
            Some(&*defaults.to_string_lossy())
        );
        assert_eq!(
            env.get_var(SSH_ARGS).map(str::to_owned),
            Some(format!("-o ControlPersist=300 -F {}", ssh_config.display()))
        );
    }

    #[test]
    fn test_side_file_directories_are_ignored() {
        let root = TempDir::new().unwrap();
        let dir = make_environment(&root, "dev");
        fs::create_dir(root.path().join("defaults.yml")).unwrap();
        fs::create_dir(dir.join("ssh_config")).unwrap();

        let inventory = Inventory::locate(&dir).unwrap();
        assert_eq!(inventory.defaults_file, None);
        assert_eq!(inventory.ssh_config, None);
    }
}
