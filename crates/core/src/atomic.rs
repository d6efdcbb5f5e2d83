// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-file replacement via temp file and rename.
//!
//! Readers of the target path see either the previous complete file or the
//! new complete file, never a partial write.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `contents`.
///
/// The temp file lives next to the target so the rename never crosses a
/// filesystem boundary. It is removed if anything fails before the rename.
pub fn atomic_write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_path_for(path);
    let result = (|| {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

/// `dir/.name.<pid>.tmp`, unique per writing process.
fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
