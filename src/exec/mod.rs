//! Execution interfaces.

use crate::cmd::CommandSpec;
use crate::error::DialogError;
use crate::stream::ProgressHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    /// Captured stdout without its trailing line breaks.
    pub fn text(&self) -> &str {
        self.stdout.trim_end_matches(['\n', '\r'])
    }

    pub fn success(&self) -> bool { self.status == 0 }
}

pub trait Executor {
    /// Run to completion and capture output.
    fn exec(&self, cmd: &CommandSpec) -> Result<ExecResult, DialogError>;

    /// Start a long-lived dialog with a writable stdin and return immediately.
    fn spawn(&self, cmd: &CommandSpec) -> Result<ProgressHandle, DialogError>;
}

/// Plans commands without running them.
pub struct Planner<'a, R: crate::render::Renderer> { pub renderer: &'a R }

impl<'a, R: crate::render::Renderer> Planner<'a, R> {
    pub fn plan(&self, cmd: &CommandSpec) -> Result<String, DialogError> {
        self.renderer.render_cmd(cmd)
    }
}

#[cfg(feature = "exec")]
mod std_exec {
    use std::path::{Path, PathBuf};
    use std::process::{Command, Stdio};

    use tracing::{debug, warn};

    use super::*;
    use crate::render::{PosixRenderer, Renderer};

    /// Runs commands through `<shell> -c` using the POSIX renderer.
    #[derive(Debug, Clone)]
    pub struct StdExecutor {
        pub shell: PathBuf,
        pub renderer: PosixRenderer,
    }

    impl Default for StdExecutor {
        fn default() -> Self { StdExecutor { shell: PathBuf::from("/bin/sh"), renderer: PosixRenderer } }
    }

    impl StdExecutor {
        pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
            StdExecutor { shell: shell.into(), ..Default::default() }
        }

        fn shell_command(&self, line: String) -> Command {
            let mut c = Command::new(&self.shell);
            c.arg("-c").arg(line);
            c
        }
    }

    impl Executor for StdExecutor {
        fn exec(&self, cmd: &CommandSpec) -> Result<ExecResult, DialogError> {
            ensure_program(&cmd.program)?;
            let line = self.renderer.render_exec(cmd)?;
            debug!(command = %line, "running dialog");
            let output = self
                .shell_command(line)
                .stdin(Stdio::null())
                .output()
                .map_err(|source| DialogError::Spawn { program: self.shell.display().to_string(), source })?;
            let res = ExecResult {
                status: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            if res.status > 1 || res.status < 0 {
                warn!(status = res.status, stderr = %res.stderr.trim_end(), "dialog exited abnormally");
            }
            Ok(res)
        }

        fn spawn(&self, cmd: &CommandSpec) -> Result<ProgressHandle, DialogError> {
            ensure_program(&cmd.program)?;
            let line = self.renderer.render_exec(cmd)?;
            let child = self
                .shell_command(line.clone())
                .stdin(Stdio::piped())
                .spawn()
                .map_err(|source| DialogError::Spawn { program: self.shell.display().to_string(), source })?;
            debug!(command = %line, pid = child.id(), "progress dialog started");
            ProgressHandle::from_child(child)
        }
    }

    /// Fail before spawning when the executable is missing; the shell would
    /// otherwise report it as exit 127 mixed into the output.
    pub fn ensure_program(program: &str) -> Result<PathBuf, DialogError> {
        let p = Path::new(program);
        if p.components().count() > 1 {
            if p.is_file() { return Ok(p.to_path_buf()); }
            return Err(DialogError::NotFound { path: p.to_path_buf() });
        }
        which::which(program).map_err(|_| DialogError::NotFound { path: p.to_path_buf() })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn missing_absolute_path() {
            let err = ensure_program("/definitely/not/here/zenity").unwrap_err();
            assert!(matches!(err, DialogError::NotFound { .. }));
        }

        #[test]
        fn missing_bare_name() {
            let err = ensure_program("zenity-that-does-not-exist-4f2a").unwrap_err();
            assert!(matches!(err, DialogError::NotFound { .. }));
        }

        #[cfg(unix)]
        #[test]
        fn runs_through_shell() {
            let mut cmd = CommandSpec::new("/bin/sh");
            cmd.trailing.push(vec!["-c".into(), "echo out; echo err >&2; exit 3".into()]);
            let res = StdExecutor::default().exec(&cmd).unwrap();
            assert_eq!(res.status, 3);
            assert_eq!(res.text(), "out");
            assert_eq!(res.stderr.trim_end(), "err");

            cmd.merge_stderr = true;
            let res = StdExecutor::default().exec(&cmd).unwrap();
            assert_eq!(res.stdout, "out\nerr\n");
        }
    }
}

#[cfg(feature = "exec")]
pub use std_exec::{ensure_program, StdExecutor};
