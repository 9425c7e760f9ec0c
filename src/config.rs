//! Configuration for fdict
//!
//! Describes where a dictionary keeps its record log and how the file is
//! opened. Defaults to a private temporary file.

use std::path::{Path, PathBuf};

use crate::error::{FdictError, Result};

/// Prefix used for temporary backing files
pub const DEFAULT_TEMP_PREFIX: &str = "fdict-";

/// Main configuration for a FileDictionary instance
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backing file of the record log
    pub backing: Backing,
}

/// Where the record log lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backing {
    /// Uniquely named temporary file, deleted when the dictionary is closed.
    Temporary {
        /// Directory to create the file in (system temp dir when `None`)
        dir: Option<PathBuf>,
        /// File name prefix
        prefix: String,
    },

    /// Caller-named file, left on disk when the dictionary is closed.
    Named {
        path: PathBuf,
        mode: OpenMode,
        share: SharePolicy,
    },
}

impl Default for Backing {
    fn default() -> Self {
        Backing::Temporary {
            dir: None,
            prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

/// How a named backing file is opened or created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create a new file; fail if it already exists
    CreateNew,

    /// Create a new file, truncating an existing one
    Create,

    /// Open an existing file; fail if it is missing
    Open,

    /// Open the file if it exists, create it otherwise
    OpenOrCreate,

    /// Open an existing file and truncate it to zero length
    Truncate,
}

/// What other handles may do with a named backing file while it is open.
///
/// Enforced with advisory locks, so only cooperating handles (other
/// dictionaries, or anything else using `flock`-style locks) observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharePolicy {
    /// Exclusive access: no other locking handle may open the file
    None,

    /// Other handles may hold a shared lock, nobody may hold it exclusively
    Read,

    /// No lock is taken
    #[default]
    ReadWrite,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config for a caller-named file
    pub fn named(path: impl Into<PathBuf>, mode: OpenMode, share: SharePolicy) -> Self {
        Self {
            backing: Backing::Named {
                path: path.into(),
                mode,
                share,
            },
        }
    }

    /// Check the arguments before any file is touched
    pub fn validate(&self) -> Result<()> {
        match &self.backing {
            Backing::Temporary { dir, .. } => {
                if let Some(dir) = dir {
                    if !dir.is_dir() {
                        return Err(FdictError::InvalidArgument(format!(
                            "temporary directory {:?} is not a directory",
                            dir
                        )));
                    }
                }
                Ok(())
            }
            Backing::Named { path, .. } => {
                if path.as_os_str().is_empty() {
                    return Err(FdictError::InvalidArgument(
                        "backing file path is empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// True if the backing file is deleted on close
    pub fn is_temporary(&self) -> bool {
        matches!(self.backing, Backing::Temporary { .. })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Keep the record log in a temporary file inside `dir`
    pub fn temp_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let prefix = self.current_prefix();
        self.config.backing = Backing::Temporary {
            dir: Some(dir.as_ref().to_path_buf()),
            prefix,
        };
        self
    }

    /// Set the temporary file name prefix
    pub fn temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        let dir = match &self.config.backing {
            Backing::Temporary { dir, .. } => dir.clone(),
            Backing::Named { .. } => None,
        };
        self.config.backing = Backing::Temporary {
            dir,
            prefix: prefix.into(),
        };
        self
    }

    /// Keep the record log in a caller-named file
    ///
    /// Defaults to `OpenMode::OpenOrCreate` and `SharePolicy::ReadWrite`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        let (mode, share) = self.current_named_options();
        self.config.backing = Backing::Named {
            path: path.into(),
            mode,
            share,
        };
        self
    }

    /// Set the open mode (named files only)
    pub fn open_mode(mut self, open_mode: OpenMode) -> Self {
        if let Backing::Named { mode, .. } = &mut self.config.backing {
            *mode = open_mode;
        }
        self
    }

    /// Set the sharing policy (named files only)
    pub fn share(mut self, policy: SharePolicy) -> Self {
        if let Backing::Named { share, .. } = &mut self.config.backing {
            *share = policy;
        }
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    fn current_prefix(&self) -> String {
        match &self.config.backing {
            Backing::Temporary { prefix, .. } => prefix.clone(),
            Backing::Named { .. } => DEFAULT_TEMP_PREFIX.to_string(),
        }
    }

    fn current_named_options(&self) -> (OpenMode, SharePolicy) {
        match &self.config.backing {
            Backing::Named { mode, share, .. } => (*mode, *share),
            Backing::Temporary { .. } => (OpenMode::OpenOrCreate, SharePolicy::ReadWrite),
        }
    }
}
