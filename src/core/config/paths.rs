use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub user_data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub secrets_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = discover_project_root();
        let log_dir = env::var("PROBA_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root.join("logs"));
        Self::from_parts(project_root, log_dir)
    }

    /// Lays out all paths under an explicit root, creating the writable dirs.
    pub fn under(root: &Path) -> Self {
        Self::from_parts(root.to_path_buf(), root.join("logs"))
    }

    fn from_parts(project_root: PathBuf, log_dir: PathBuf) -> Self {
        let user_data_dir = project_root.join(".proba");
        let secrets_path = user_data_dir.join("secrets.yaml");

        for dir in [&user_data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            project_root,
            user_data_dir,
            log_dir,
            secrets_path,
        }
    }

    pub fn session_token_path(&self) -> PathBuf {
        self.user_data_dir.join(".session_token")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_project_root() -> PathBuf {
    if let Ok(root) = env::var("PROBA_ROOT") {
        return PathBuf::from(root);
    }

    if let Ok(cwd) = env::current_dir() {
        if cwd.join("config.yml").exists() {
            return cwd;
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.yml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}
