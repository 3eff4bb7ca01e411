use std::collections::BTreeMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Variable the playbook run reads its SSH options from.
pub const SSH_ARGS: &str = "ANSIBLE_SSH_ARGS";

/// Variable pointing the playbook run at an extra defaults file.
pub const VAR_DEFAULTS_FILE: &str = "ANSIBLE_VAR_DEFAULTS_FILE";

/// Environment handed to the `ansible-playbook` child process.
///
/// The environment contains:
/// - `vars`: the variables the child will see, seeded from the wrapper's own process.
/// - `current_dir`: the working directory the child is started in.
///
/// Values are kept as raw OS strings so variables that are not valid unicode
/// still reach the child. Changes made here never leak back into the
/// wrapper's process environment.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, ANSIBLE_SSH_ARGS).
    pub vars: BTreeMap<OsString, OsString>,
    /// The working directory for the child process.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars_os().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// An environment with no variables, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            current_dir: current_dir.into(),
        }
    }

    /// Get the value of an environment variable, if it is valid unicode.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.get_var_os(key)?.to_str()
    }

    /// Get the raw value of an environment variable.
    pub fn get_var_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Set or override an environment variable.
    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Append `val` to `key`, separated from any existing value by one space.
    ///
    /// When `key` is unset it is simply set to `val`.
    pub fn append_var(&mut self, key: impl Into<OsString>, val: impl AsRef<OsStr>) {
        let val = val.as_ref();
        self.vars
            .entry(key.into())
            .and_modify(|existing| {
                existing.push(" ");
                existing.push(val);
            })
            .or_insert_with(|| val.to_owned());
    }

    /// Apply the variables every playbook run needs.
    ///
    /// Output is forced unbuffered and colored so it can be streamed line by
    /// line, and SSH connections are multiplexed through persistent control
    /// sockets under `~/.ssh/controlmasters`.
    pub fn set_default_vars(&mut self) {
        self.append_var("PYTHONUNBUFFERED", "1");
        self.append_var("ANSIBLE_FORCE_COLOR", "yes");
        self.append_var(SSH_ARGS, "-o ControlMaster=auto");
        self.append_var(SSH_ARGS, "-o ControlPath=~/.ssh/controlmasters/u-%r@%h:%p");
        self.append_var(SSH_ARGS, "-o ControlPersist=300");
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
