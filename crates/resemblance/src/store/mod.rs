use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub const REFERENCE_DIR: &str = "reference";
pub const CURRENT_DIR: &str = "current";
pub const DIFFERENCE_DIR: &str = "difference";

/// Which diagnostic image to address under `difference/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Debug,
    Mask,
}

impl DiagnosticKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Mask => "mask",
        }
    }
}

/// Reference/current/difference image directories under one root.
///
/// Ids are `/`-separated relative paths without the `.png` extension.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn remove_if_present(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to remove file");
    }
}

/// Recursively walk a directory, collecting all `.png` files as ids.
fn collect_png_ids(base: &Path, dir: &Path, ids: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_png_ids(base, &path, ids);
        } else if path.extension().is_some_and(|e| e == "png")
            && let Ok(rel) = path.strip_prefix(base)
        {
            let id = rel.with_extension("");
            let id: Vec<String> = id
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            ids.insert(id.join("/"));
        }
    }
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, subdir: &str, id: &str) -> PathBuf {
        self.root.join(subdir).join(format!("{id}.png"))
    }

    pub fn reference_path(&self, id: &str) -> PathBuf {
        self.file_path(REFERENCE_DIR, id)
    }

    pub fn current_path(&self, id: &str) -> PathBuf {
        self.file_path(CURRENT_DIR, id)
    }

    pub fn difference_path(&self, id: &str, kind: DiagnosticKind) -> PathBuf {
        self.root
            .join(DIFFERENCE_DIR)
            .join(format!("{id}.{}.png", kind.suffix()))
    }

    /// Store a reference image and drop any stale current/difference files for it.
    pub fn write_reference(&self, id: &str, png: &[u8]) -> Result<()> {
        write_file(&self.reference_path(id), png)?;
        self.clean_output(id);
        Ok(())
    }

    #[cfg(test)]
    pub fn write_current(&self, id: &str, png: &[u8]) -> Result<()> {
        write_file(&self.current_path(id), png)
    }

    pub fn write_difference(&self, id: &str, kind: DiagnosticKind, png: &[u8]) -> Result<()> {
        write_file(&self.difference_path(id, kind), png)
    }

    pub fn read_reference(&self, id: &str) -> Option<Vec<u8>> {
        std::fs::read(self.reference_path(id)).ok()
    }

    pub fn read_current(&self, id: &str) -> Option<Vec<u8>> {
        std::fs::read(self.current_path(id)).ok()
    }

    pub fn has_difference(&self, id: &str) -> bool {
        self.difference_path(id, DiagnosticKind::Debug).exists()
    }

    /// Remove the current image and diagnostics for `id`.
    pub fn clean_output(&self, id: &str) {
        remove_if_present(&self.current_path(id));
        self.clean_difference(id);
    }

    pub fn clean_difference(&self, id: &str) {
        remove_if_present(&self.difference_path(id, DiagnosticKind::Debug));
        remove_if_present(&self.difference_path(id, DiagnosticKind::Mask));
    }

    pub fn list_current_ids(&self) -> BTreeSet<String> {
        let dir = self.root.join(CURRENT_DIR);
        let mut ids = BTreeSet::new();
        collect_png_ids(&dir, &dir, &mut ids);
        ids
    }

    pub fn list_reference_ids(&self) -> BTreeSet<String> {
        let dir = self.root.join(REFERENCE_DIR);
        let mut ids = BTreeSet::new();
        collect_png_ids(&dir, &dir, &mut ids);
        ids
    }
}
