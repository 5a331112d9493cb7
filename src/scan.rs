//! Page discovery
//!
//! Walks directories with the `ignore` crate so `.gitignore` and hidden
//! entries are respected, keeping only HTML pages.

use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::core::paths::{display_path, is_html, resolve};

/// Collect HTML pages under `paths` (files or directories, relative to
/// `root`). With no paths, the whole root is walked. Sorted and deduplicated.
pub fn find_pages(root: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let targets: Vec<PathBuf> = if paths.is_empty() {
        vec![root.to_path_buf()]
    } else {
        paths.iter().map(|p| resolve(root, p)).collect()
    };

    let mut pages = Vec::new();
    for target in targets {
        if target.is_file() {
            // Explicit files are taken as given, whatever their extension
            pages.push(target);
            continue;
        }
        if !target.is_dir() {
            bail!("No such file or directory: {}", display_path(&target, root));
        }

        for entry in WalkBuilder::new(&target).build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && is_html(path) {
                pages.push(path.to_path_buf());
            }
        }
    }

    pages.sort();
    pages.dedup();
    tracing::debug!(count = pages.len(), "pages discovered");
    Ok(pages)
}
