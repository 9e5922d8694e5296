//! Configuration file validators.
//!
//! The resolver only needs a yes/no answer about a file, so validation sits
//! behind the [`ConfigValidator`] trait. [`ProcessValidator`] runs an
//! external checker and looks only at its exit status; [`InProcessValidator`]
//! performs the same check without leaving the process.

use crate::config::{CollectionKind, FragmentLoader};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default time an external validator may run before it is treated as failed.
pub const DEFAULT_VALIDATOR_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Accepts or rejects a configuration file.
pub trait ConfigValidator {
    /// Check the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the file was rejected.
    fn validate(&self, path: &Path) -> Result<()>;
}

impl<V: ConfigValidator + ?Sized> ConfigValidator for &V {
    fn validate(&self, path: &Path) -> Result<()> {
        (**self).validate(path)
    }
}

impl<V: ConfigValidator + ?Sized> ConfigValidator for Box<V> {
    fn validate(&self, path: &Path) -> Result<()> {
        (**self).validate(path)
    }
}

/// Runs an external executable as the validator.
///
/// The executable receives the file path as its last argument. Exit status 0
/// means valid; anything else, including running past the timeout, means
/// invalid. Output is discarded.
///
/// # Examples
///
/// ```no_run
/// use strata::validation::{ConfigValidator, ProcessValidator};
/// use std::path::Path;
/// use std::time::Duration;
///
/// let validator = ProcessValidator::new("/opt/strata/bin/strata")
///     .with_args(["validate", "--quiet"])
///     .with_timeout(Duration::from_secs(5));
/// validator.validate(Path::new("/opt/strata/configs/layers.yaml")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ProcessValidator {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ProcessValidator {
    /// Creates a validator running `program` with the default timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_VALIDATOR_TIMEOUT,
        }
    }

    /// Arguments placed before the file path.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn rejection(path: &Path, message: String) -> Error {
        Error::Validation {
            field: path.display().to_string(),
            message,
        }
    }
}

impl ConfigValidator for ProcessValidator {
    fn validate(&self, path: &Path) -> Result<()> {
        log::debug!(
            "running validator {} on {}",
            self.program.display(),
            path.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Self::rejection(
                    path,
                    format!("failed to run validator {}: {e}", self.program.display()),
                )
            })?;

        let started = Instant::now();
        let status = loop {
            let polled = child.try_wait().map_err(|e| {
                Self::rejection(path, format!("failed to wait for validator: {e}"))
            })?;
            if let Some(status) = polled {
                break status;
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                log::warn!(
                    "validator {} timed out after {:?} on {}",
                    self.program.display(),
                    self.timeout,
                    path.display()
                );
                return Err(Self::rejection(
                    path,
                    format!("validator timed out after {:?}", self.timeout),
                ));
            }
            thread::sleep(POLL_INTERVAL.min(self.timeout - elapsed));
        };

        if status.success() {
            return Ok(());
        }
        let message = match status.code() {
            Some(code) => format!("validator exited with status {code}"),
            None => "validator was terminated by a signal".to_string(),
        };
        Err(Self::rejection(path, message))
    }
}

/// Checks a file loads as a collapsed configuration, without a subprocess.
///
/// The file must be a regular file and a mapping of string lists. Sets are
/// rejected since collapsed output only ever contains lists. An empty file is
/// an empty configuration and is accepted.
///
/// # Examples
///
/// ```no_run
/// use strata::validation::{ConfigValidator, InProcessValidator};
/// use std::path::Path;
///
/// InProcessValidator.validate(Path::new("configs/channels.yaml")).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessValidator;

impl ConfigValidator for InProcessValidator {
    fn validate(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(Error::Validation {
                field: path.display().to_string(),
                message: "not a file".into(),
            });
        }

        let Some(fragment) = FragmentLoader::load_file(path)? else {
            return Ok(());
        };

        for (key, collection) in &fragment.entries {
            if collection.kind() != CollectionKind::List {
                return Err(Error::Validation {
                    field: key.clone(),
                    message: format!(
                        "{} holds a {}, expected a list",
                        path.display(),
                        collection.kind()
                    ),
                });
            }
        }
        Ok(())
    }
}
