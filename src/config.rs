use crate::args::Invocation;
use crate::env::Environment;
use crate::version::REQUIRED_VERSION;
use std::path::PathBuf;

/// Variable overriding the `ansible-playbook` program the wrapper runs.
pub const PROGRAM_VAR: &str = "URSULA_ANSIBLE_PLAYBOOK";

/// Everything a single playbook run depends on.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the `hosts` inventory.
    pub environment: PathBuf,
    /// Playbook file handed to `ansible-playbook`.
    pub playbook: PathBuf,
    /// Add `-o ForwardAgent=yes` to the SSH options.
    pub forward_agent: bool,
    /// Only syntax-check the playbook and list its tasks.
    pub syntax_check: bool,
    /// Log at debug level unless `RUST_LOG` says otherwise.
    pub debug: bool,
    /// Passed through to `ansible-playbook` after the wrapper's own arguments.
    pub extra_args: Vec<String>,
    /// Program to run, resolved through `PATH` when it is a bare name.
    pub program: PathBuf,
    pub required_version: String,
    pub user: String,
    pub module_path: PathBuf,
    pub sudo: bool,
    /// Base environment of the child; defaults are appended on top of it.
    pub env: Environment,
}

impl RunConfig {
    /// Configuration for `playbook` in `environment` with every default applied.
    pub fn new(environment: impl Into<PathBuf>, playbook: impl Into<PathBuf>, env: Environment) -> Self {
        let program = env
            .get_var_os(PROGRAM_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ansible-playbook"));
        Self {
            environment: environment.into(),
            playbook: playbook.into(),
            forward_agent: false,
            syntax_check: false,
            debug: false,
            extra_args: Vec::new(),
            program,
            required_version: REQUIRED_VERSION.to_owned(),
            user: "root".to_owned(),
            module_path: PathBuf::from("./library"),
            sudo: false,
            env,
        }
    }

    /// Build the configuration from parsed command line arguments.
    pub fn from_invocation(invocation: Invocation, env: Environment) -> Self {
        let Invocation { args, extra_args } = invocation;
        Self {
            forward_agent: args.ursula_forward,
            syntax_check: args.ursula_test,
            debug: args.ursula_debug,
            extra_args,
            ..Self::new(args.environment, args.playbook, env)
        }
    }
}
