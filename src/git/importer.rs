use super::init::InitScript;
use crate::error::{GreenwallError, ImporterError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// Anything that can turn a finished fast-import stream into history inside `working_dir`.
pub trait Importer {
    fn import(&self, stream: &[u8], working_dir: &Path) -> std::result::Result<(), ImporterError>;
}

/// The `git` command line, optionally at a custom path.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Result<Self> {
        let program = program.into();
        // bare names go through PATH; anything with a directory must exist
        if program.components().count() > 1 && !program.exists() {
            return Err(GreenwallError::validation(format!(
                "git executable not found at {}",
                program.display()
            )));
        }
        Ok(Self { program })
    }

    /// `git --version`, trimmed. Fails when git cannot be run at all.
    pub fn version(&self) -> std::result::Result<String, ImporterError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(&["--version"], e))?;
        self.check(&["--version"], &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn run(&self, dir: &Path, args: &[&str]) -> std::result::Result<(), ImporterError> {
        debug!(dir = %dir.display(), args = ?args, "running git");
        let output = self
            .command(dir)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(args, e))?;
        self.check(args, &output)
    }

    pub fn apply(&self, script: &InitScript, dir: &Path) -> std::result::Result<(), ImporterError> {
        for directive in script.directives() {
            let args = directive.args();
            match self.run(dir, &args) {
                Ok(()) => {}
                Err(e) if !directive.is_required() => {
                    warn!(error = %e, "ignoring failed optional git setting");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn checkout(&self, dir: &Path, branch: &str) -> std::result::Result<(), ImporterError> {
        let short = branch.strip_prefix("refs/heads/").unwrap_or(branch);
        self.run(dir, &["checkout", "--quiet", "-f", short])
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    fn spawn_error(&self, args: &[&str], err: std::io::Error) -> ImporterError {
        ImporterError {
            command: self.describe(args),
            status: "not started".to_string(),
            diagnostic: err.to_string(),
        }
    }

    fn check(&self, args: &[&str], output: &Output) -> std::result::Result<(), ImporterError> {
        if output.status.success() {
            return Ok(());
        }
        Err(ImporterError {
            command: self.describe(args),
            status: output.status.to_string(),
            diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl Importer for GitCli {
    fn import(&self, stream: &[u8], working_dir: &Path) -> std::result::Result<(), ImporterError> {
        let args = ["fast-import", "--quiet", "--done"];
        let mut child = self
            .command(working_dir)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(&args, e))?;

        // stdin is fed from its own thread while wait_with_output drains stdout and stderr
        let stdin = child.stdin.take();
        let (write_result, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(stream),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stream writer panicked")));
            (written, output)
        });
        let output = output.map_err(|e| self.spawn_error(&args, e))?;
        self.check(&args, &output)?;
        write_result.map_err(|e| ImporterError {
            command: self.describe(&args),
            status: output.status.to_string(),
            diagnostic: format!("failed to write stream: {e}"),
        })
    }
}
