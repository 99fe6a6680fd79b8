use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Create the parent directory of an output file if it doesn't exist;
/// error if a non-directory exists there.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        if !parent.is_dir() {
            bail!("Path exists but is not a directory: {}", parent.display());
        }
    } else {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Copy the `.prj` sidecar of `source` next to `target`, if there is one.
pub(crate) fn copy_prj(source: &Path, target: &Path) -> Result<bool> {
    let prj = source.with_extension("prj");
    if !prj.is_file() {
        return Ok(false);
    }
    let dest = target.with_extension("prj");
    fs::copy(&prj, &dest)
        .with_context(|| format!("Failed to copy {} to {}", prj.display(), dest.display()))?;
    Ok(true)
}
