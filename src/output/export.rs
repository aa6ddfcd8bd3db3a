use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;

use crate::model::{HarmfulProduct, LeaderboardRow};

/// Document consumed by the leaderboard screen of the mobile client.
///
/// ```json
/// {
///   "leaderboard": [{"user_id": "user_001", "score": 9.0}],
///   "harmful_products_user_001": [{"product_name": "Soda", ...}]
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardExport {
    pub leaderboard: Vec<LeaderboardRow>,
    #[serde(flatten)]
    pub harmful: BTreeMap<String, Vec<HarmfulProduct>>,
}

impl LeaderboardExport {
    pub fn new(leaderboard: Vec<LeaderboardRow>) -> Self {
        Self {
            leaderboard,
            harmful: BTreeMap::new(),
        }
    }

    /// Attach one user's harmful products under `harmful_products_<user>`.
    /// A user with no purchases gets no key at all.
    pub fn with_harmful(mut self, user_id: &str, products: Vec<HarmfulProduct>) -> Self {
        if !products.is_empty() {
            self.harmful
                .insert(format!("harmful_products_{}", user_id), products);
        }
        self
    }
}

/// Write the export as pretty JSON.
///
/// Uses atomic-write-file so a reader never sees a half-written document.
pub fn write_export(path: &Path, export: &LeaderboardExport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, export).context("Failed to serialize export")?;

    file.commit()
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    Ok(())
}
