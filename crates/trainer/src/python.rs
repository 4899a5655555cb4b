use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::{Command, Stdio};

use crate::error::{Result, TrainerError};

/// The interpreter the training frameworks are installed into.
#[derive(Debug, Clone)]
pub struct PythonEnv {
    pub executable: String,
}

impl PythonEnv {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.executable)
    }

    fn spawn_error(&self, err: std::io::Error) -> TrainerError {
        if err.kind() == ErrorKind::NotFound {
            TrainerError::PythonNotFound(self.executable.clone())
        } else {
            TrainerError::Io(err)
        }
    }

    /// Whether `import <module>` succeeds in this interpreter.
    pub fn has_module(&self, module: &str) -> Result<bool> {
        let status = self
            .command()
            .arg("-c")
            .arg(format!("import {}", module))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        log::debug!("import {} via {}: {}", module, self.executable, status);
        Ok(status.success())
    }

    pub fn require_module(&self, module: &str, package: &str) -> Result<()> {
        if self.has_module(module)? {
            return Ok(());
        }
        Err(TrainerError::MissingDependency {
            package: package.to_string(),
            install: format!("pip install {}", package),
        })
    }

    /// Run the interpreter with inherited stdio and wait for it.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = self
            .command()
            .args(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(TrainerError::ProcessFailed {
                code: status.code(),
            })
        }
    }
}
