use crate::env::Environment;
use anyhow::{Context, Result, anyhow};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Conventional process exit code.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// A resolved program plus the arguments it will be started with.
pub(crate) struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Resolve `name` against the `PATH` of `env`.
    pub fn resolve<I, S>(env: &Environment, name: &Path, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let search_paths = env.get_var_os("PATH").unwrap_or_default();
        let program = find_command_path(search_paths, name)
            .ok_or_else(|| anyhow!("command not found: {}", name.display()))?
            .into_owned();
        Ok(Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    fn command(&self, env: &Environment) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env_clear()
            .envs(&env.vars)
            .current_dir(&env.current_dir)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Run to completion and return the exit code with everything written to stdout.
    pub fn output(self, env: &Environment) -> Result<(ExitCode, String)> {
        let output = self
            .command(env)
            .stdout(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run {self}"))?;
        Ok((
            exit_code(output.status),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }

    /// Run to completion, copying the child's stdout and stderr to `out` one line at a time.
    ///
    /// Both streams share one pipe, so lines keep the order the child wrote
    /// them in. Trailing whitespace is stripped from every line and `out` is
    /// flushed after each one, so progress shows up as soon as the child
    /// reports it.
    pub fn stream(self, env: &Environment, out: &mut dyn Write) -> Result<ExitCode> {
        let (output, writer) = io::pipe().context("failed to create output pipe")?;
        let mut cmd = self.command(env);
        cmd.stdout(writer.try_clone()?).stderr(writer);
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {self}"))?;
        // Our copies of the write end must go away, or the read below never sees EOF.
        drop(cmd);

        let mut reader = BufReader::new(output);
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .with_context(|| format!("failed to read output of {self}"))?;
            if read == 0 {
                break;
            }
            out.write_all(line.trim_ascii_end())?;
            out.write_all(b"\n")?;
            out.flush()?;
        }

        let exit_status = child.wait()?;
        Ok(exit_code(exit_status))
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a program path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/ansible-playbook`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
pub(crate) fn find_command_path<'a>(
    search_paths: &OsStr,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
