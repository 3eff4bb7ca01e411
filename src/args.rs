//! Command line surface of the wrapper.
//!
//! Only the two positionals, the `--ursula-*` switches below and the help
//! flags belong to the wrapper. Everything else on the command line is handed
//! to `ansible-playbook` untouched, in its original order.

use argh::{EarlyExit, FromArgs};

/// Options the wrapper understands itself.
const OWN_OPTIONS: [&str; 4] = ["--ursula-forward", "--ursula-test", "--ursula-debug", "--help"];

#[derive(FromArgs, Debug, PartialEq)]
/// A CLI wrapper for ansible.
///
/// Any option not listed here is passed through to ansible-playbook.
pub struct Args {
    #[argh(positional)]
    /// the environment you want to use
    pub environment: String,

    #[argh(positional)]
    /// the playbook to run
    pub playbook: String,

    #[argh(switch)]
    /// forward the local SSH agent to the managed hosts
    pub ursula_forward: bool,

    #[argh(switch)]
    /// only check the playbook syntax and list its tasks
    pub ursula_test: bool,

    #[argh(switch)]
    /// run this tool in debug mode
    pub ursula_debug: bool,
}

/// Parsed wrapper arguments plus the arguments destined for `ansible-playbook`.
#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub args: Args,
    pub extra_args: Vec<String>,
}

impl Invocation {
    /// Parse the wrapper's own arguments out of `args`, keeping the rest.
    ///
    /// `command` is the program name shown in help output. Help requests and
    /// usage errors come back as [`EarlyExit`], exactly like [`FromArgs`].
    pub fn parse(command: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        let (ours, extra_args) = split_known(args);
        let args = Args::from_args(&[command], &ours.into_argv())?;
        Ok(Self { args, extra_args })
    }

    /// Parse the arguments of the current process, exiting on help or usage errors.
    pub fn from_env() -> Self {
        let raw: Vec<String> = std::env::args().collect();
        let command = raw
            .first()
            .and_then(|arg0| std::path::Path::new(arg0).file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("ursula");
        let rest: Vec<&str> = raw.iter().skip(1).map(String::as_str).collect();

        match Self::parse(command, &rest) {
            Ok(invocation) => invocation,
            Err(EarlyExit { output, status }) => match status {
                Ok(()) => {
                    println!("{output}");
                    std::process::exit(0);
                }
                Err(()) => {
                    eprintln!("{output}\nRun {command} --help for more information.");
                    std::process::exit(1);
                }
            },
        }
    }
}

/// The wrapper's share of the command line.
#[derive(Debug, Default)]
struct Known<'a> {
    options: Vec<&'a str>,
    positionals: Vec<&'a str>,
}

impl<'a> Known<'a> {
    /// Options first, then `--`, then positionals, so a positional such as
    /// `help` is never taken for an option.
    fn into_argv(self) -> Vec<&'a str> {
        let mut argv = self.options;
        argv.push("--");
        argv.extend(self.positionals);
        argv
    }
}

/// Split `args` into the wrapper's arguments and pass-through arguments.
///
/// - `--ursula-forward`, `--ursula-test`, `--ursula-debug` and `--help` are
///   always the wrapper's; `-h` is taken as `--help`.
/// - `--` stops the split; whatever follows is passed through.
/// - The first two bare words are the positionals, as long as no pass-through
///   option was seen before them. After a pass-through option, bare words are
///   taken as its values and passed through too.
fn split_known<'a>(args: &[&'a str]) -> (Known<'a>, Vec<String>) {
    let mut known = Known::default();
    let mut extra = Vec::new();
    let mut passing_through = false;

    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if arg == "--" {
            extra.extend(iter.map(|a| a.to_string()));
            break;
        } else if arg == "-h" {
            known.options.push("--help");
        } else if OWN_OPTIONS.contains(&arg) {
            known.options.push(arg);
        } else if arg.starts_with('-') && arg != "-" {
            passing_through = true;
            extra.push(arg.to_string());
        } else if known.positionals.len() < 2 && !passing_through {
            known.positionals.push(arg);
        } else {
            extra.push(arg.to_string());
        }
    }
    (known, extra)
}
