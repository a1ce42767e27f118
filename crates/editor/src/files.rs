//! Backups and atomic replacement of deck files

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

/// Sibling path with `suffix` appended to the file name
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Copy a file to its backup, returning where it went
pub fn backup(path: &Path, suffix: &str) -> Result<PathBuf> {
    let target = sibling(path, suffix);
    fs::copy(path, &target)?;
    debug!("Backed up {} to {}", path.display(), target.display());
    Ok(target)
}

/// Replace a file's contents in one step
///
/// The text goes to a temporary sibling first, which is then renamed over
/// the target, so readers see either the old or the new file.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let temporary = sibling(path, &format!(".{}.tmp", std::process::id()));
    if let Err(e) = fs::write(&temporary, text) {
        let _ = fs::remove_file(&temporary);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temporary, path) {
        let _ = fs::remove_file(&temporary);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod files_tests {
    use super::*;

    #[test]
    fn sibling_names() {
        assert_eq!(sibling(Path::new("decks/inp.i"), ".bak"), PathBuf::from("decks/inp.i.bak"));
    }

    #[test]
    fn backup_then_replace() {
        let dir = std::env::temp_dir().join(format!("idate-files-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let deck = dir.join("inp.i");
        fs::write(&deck, "old\n").unwrap();

        let saved = backup(&deck, ".bak").unwrap();
        write_atomic(&deck, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&saved).unwrap(), "old\n");
        assert_eq!(fs::read_to_string(&deck).unwrap(), "new\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
