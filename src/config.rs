//! Where book lists live on disk.

use std::ffi::OsString;
use std::path::PathBuf;

/// File name used for the user's book list.
pub const BOOKS_FILENAME: &str = "books.xml";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "BOOKREPORT_CONFIG_DIR";

const APP_DIR: &str = "bookreport";

/// Per-user configuration directory.
///
/// `$BOOKREPORT_CONFIG_DIR` wins, then the platform config directory, then a
/// dot directory in the home directory, then the current directory.
pub fn user_config_dir() -> PathBuf {
    config_dir_from(std::env::var_os(CONFIG_DIR_ENV))
}

/// Full path of `filename` inside [`user_config_dir`].
pub fn resolve(filename: &str) -> PathBuf {
    user_config_dir().join(filename)
}

fn config_dir_from(env_override: Option<OsString>) -> PathBuf {
    pick_dir(env_override, dirs::config_dir(), dirs::home_dir())
}

fn pick_dir(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = config_dir {
        return dir.join(APP_DIR);
    }
    if let Some(home) = home_dir {
        return home.join(format!(".{APP_DIR}"));
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(path: &str) -> Option<PathBuf> {
        Some(PathBuf::from(path))
    }

    #[test]
    fn test_env_override_wins() {
        let dir = pick_dir(Some(OsString::from("/tmp/books-here")), some("/cfg"), some("/home/me"));
        assert_eq!(dir, PathBuf::from("/tmp/books-here"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let dir = pick_dir(Some(OsString::new()), some("/cfg"), some("/home/me"));
        assert_eq!(dir, PathBuf::from("/cfg/bookreport"));
    }

    #[test]
    fn test_platform_config_dir() {
        assert_eq!(pick_dir(None, some("/cfg"), some("/home/me")), PathBuf::from("/cfg/bookreport"));
    }

    #[test]
    fn test_home_dot_dir_without_config_dir() {
        assert_eq!(pick_dir(None, None, some("/home/me")), PathBuf::from("/home/me/.bookreport"));
    }

    #[test]
    fn test_current_dir_as_last_resort() {
        assert_eq!(pick_dir(None, None, None), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_honors_override() {
        let dir = config_dir_from(Some(OsString::from("/tmp/books-here")));
        assert_eq!(dir.join(BOOKS_FILENAME), PathBuf::from("/tmp/books-here/books.xml"));
    }
}
