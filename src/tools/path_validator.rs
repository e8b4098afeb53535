use crate::tools::FileSystem;
use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(file_system: &dyn FileSystem, path: &Path) -> Result<()> {
    if !file_system.exists(path) || !file_system.is_directory(path) {
        bail!("Provided path is not an existing directory: {}", path.display());
    }
    Ok(())
}
