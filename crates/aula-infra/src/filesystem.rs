//! Data directory layout.

use std::path::{Path, PathBuf};

pub const DATA_DIR_VAR: &str = "AULA_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `AULA_DATA_DIR` environment variable
/// 2. `~/.aula`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_VAR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".aula");
    }

    // Last resort: current directory
    PathBuf::from(".aula")
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is the only one touching AULA_DATA_DIR and restores it.
        unsafe {
            std::env::set_var(DATA_DIR_VAR, "/tmp/test-aula");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-aula"));
        unsafe {
            std::env::remove_var(DATA_DIR_VAR);
        }
    }

    #[test]
    fn test_config_path() {
        assert_eq!(
            config_path(Path::new("/home/user/.aula")),
            PathBuf::from("/home/user/.aula/config.toml")
        );
    }
}
