// Configuration inputs (spec §6 "Configuration inputs").
//
// Grounded on `services/server/src/main.rs`'s convention of reading deploy
// knobs from the environment with sane defaults — but kept out of the
// library itself: `Hub::new` takes an explicit `HubConfig`, the same way
// `AppState::new` takes an explicit `PgPool` rather than reading
// `DATABASE_URL` itself. Only `src/bin/standalone.rs` touches `std::env`.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HubConfig {
    pub local_files_dir: PathBuf,
    pub local_url_prefix: String,
    pub update_key: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            local_files_dir: default_local_files_dir(),
            local_url_prefix: "/local".to_owned(),
            update_key: None,
        }
    }
}

fn default_local_files_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("local")
}

impl HubConfig {
    #[must_use]
    pub fn flags_dir(&self) -> PathBuf {
        self.local_files_dir.join("flags")
    }

    #[must_use]
    pub fn logos_dir(&self) -> PathBuf {
        self.local_files_dir.join("logos")
    }

    #[must_use]
    pub fn pictures_dir(&self) -> PathBuf {
        self.local_files_dir.join("pictures")
    }

    #[must_use]
    pub fn styles_dir(&self) -> PathBuf {
        self.local_files_dir.join("styles")
    }

    #[must_use]
    pub fn resource_dir(&self, subdir: &str) -> PathBuf {
        self.local_files_dir.join(subdir)
    }
}

#[must_use]
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}
