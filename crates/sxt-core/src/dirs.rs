//! Directory layout for SxT client state.
//!
//! ```text
//! ~/.sxt/                 (SxtHome, or $SXT_HOME)
//! ├── sessions/           (one JSON record per user id, 0600)
//! ├── logs/               (log files when logging to file)
//! └── config.toml         (user configuration)
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory.
pub const SXT_HOME_ENV: &str = "SXT_HOME";

/// SxT home directory (`~/.sxt/` or `$SXT_HOME`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SxtHome {
    root: PathBuf,
}

impl SxtHome {
    /// Resolve the home directory.
    ///
    /// Checks `$SXT_HOME` first, then falls back to `$HOME/.sxt/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `$SXT_HOME` is relative, or if neither variable is set.
    pub fn resolve() -> io::Result<Self> {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using a custom variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> io::Result<Self> {
        let root = if let Some(custom) = lookup(SXT_HOME_ENV) {
            let p = PathBuf::from(&custom);
            if !p.is_absolute() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "SXT_HOME must be an absolute path",
                ));
            }
            p
        } else {
            let home = lookup("HOME").ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "neither SXT_HOME nor HOME environment variable is set",
                )
            })?;
            PathBuf::from(home).join(".sxt")
        };

        Ok(Self { root })
    }

    /// Create from an explicit path (useful for testing).
    #[must_use]
    pub fn from_path(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ensure the directory structure exists, owner-only on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or permission setting fails.
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.sessions_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(self.root(), perms.clone())?;
            std::fs::set_permissions(self.sessions_dir(), perms.clone())?;
            std::fs::set_permissions(self.logs_dir(), perms)?;
        }
        Ok(())
    }

    /// Root directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sessions directory (`~/.sxt/sessions/`).
    #[must_use]
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    /// Logs directory (`~/.sxt/logs/`).
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// User configuration file (`~/.sxt/config.toml`).
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_sxt_home() {
        let home = SxtHome::resolve_with(|name| match name {
            "SXT_HOME" => Some("/opt/sxt".into()),
            "HOME" => Some("/home/alice".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(home.root(), Path::new("/opt/sxt"));
    }

    #[test]
    fn test_resolve_falls_back_to_home() {
        let home = SxtHome::resolve_with(|name| (name == "HOME").then(|| "/home/alice".into()))
            .unwrap();
        assert_eq!(home.root(), Path::new("/home/alice/.sxt"));
        assert_eq!(home.config_path(), Path::new("/home/alice/.sxt/config.toml"));
    }

    #[test]
    fn test_resolve_rejects_relative() {
        let err = SxtHome::resolve_with(|name| (name == "SXT_HOME").then(|| "rel/dir".into()))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = SxtHome::resolve_with(|_| None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_ensure_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let home = SxtHome::from_path(dir.path().join("sxt"));
        home.ensure().unwrap();

        assert!(home.sessions_dir().is_dir());
        assert!(home.logs_dir().is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(home.root()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }
}
