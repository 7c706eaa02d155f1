use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use shared::domain::OrderLine;

pub mod tsv;

/// Durable backing copy of the order dataset, kept as a tab-separated file at
/// a fixed local path.
///
/// Every accepted mutation rewrites the whole file; there is no appending and
/// no partial write. A single active writer is assumed.
#[derive(Debug, Clone)]
pub struct TsvStore {
    path: PathBuf,
}

impl TsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and parses the cache file. A missing, unreadable or corrupt
    /// cache is a deployment problem and surfaces as an error.
    pub fn load(&self) -> Result<Vec<OrderLine>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read dataset cache '{}'", self.path.display()))?;
        let rows = tsv::parse(&raw)
            .with_context(|| format!("failed to parse dataset cache '{}'", self.path.display()))?;
        Ok(rows)
    }

    /// Replaces the entire cache file with the given rows. The write goes
    /// through a temp file in the same directory and lands with a rename.
    pub fn save(&self, rows: &[OrderLine]) -> Result<()> {
        let rendered = tsv::render(rows);
        let tmp = self.path.with_extension("tsv.tmp");
        fs::write(&tmp, rendered)
            .with_context(|| format!("failed to write dataset cache '{}'", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("failed to replace dataset cache '{}'", self.path.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
