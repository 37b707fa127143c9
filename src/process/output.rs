//! Atomic artifact persistence.
//!
//! Every artifact is first written in full to a temporary file next to its
//! destination. Only when all of them are staged are they renamed into place,
//! so a failed run leaves previous outputs untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::diagnostic::{Result, TokenError};

/// A file waiting to be renamed into place.
struct Staged {
    file: NamedTempFile,
    target: PathBuf,
}

fn stage(target: &Path, contents: &str) -> Result<Staged> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| TokenError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| TokenError::io(dir, e))?;
    if let Some(permissions) = target_permissions(target) {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| TokenError::io(target, e))?;
    }
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| TokenError::io(target, e))?;

    Ok(Staged {
        file,
        target: target.to_path_buf(),
    })
}

/// Permissions the renamed file should carry.
///
/// An existing target keeps its mode; a new one gets the usual `0644`
/// instead of the owner-only mode temporary files are created with.
fn target_permissions(target: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(target) {
        return Some(meta.permissions());
    }
    new_file_permissions()
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Write every `(path, contents)` pair, all or nothing up to the final renames.
pub fn write_artifacts(files: &[(PathBuf, String)]) -> Result<Vec<PathBuf>> {
    let staged = files
        .iter()
        .map(|(path, contents)| stage(path, contents))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(staged.len());
    for Staged { file, target } in staged {
        file.persist(&target)
            .map_err(|e| TokenError::io(&target, e.error))?;
        debug!("event=write path={}", target.display());
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("dist/web/tokens.css");
        let ts = dir.path().join("dist/native/tokens.ts");

        let written = write_artifacts(&[(css.clone(), ":root {\n}\n".into()), (ts.clone(), "x".into())]).unwrap();

        assert_eq!(written, [css.clone(), ts.clone()]);
        assert_eq!(fs::read_to_string(&css).unwrap(), ":root {\n}\n");
        assert_eq!(fs::read_to_string(&ts).unwrap(), "x");
    }

    #[test]
    fn test_overwrite_existing() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("tokens.css");
        fs::write(&css, "old").unwrap();

        write_artifacts(&[(css.clone(), "new".into())]).unwrap();
        assert_eq!(fs::read_to_string(&css).unwrap(), "new");
        // no stray temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_artifacts_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let css = dir.path().join("dist/tokens.css");
        write_artifacts(&[(css.clone(), "x".into())]).unwrap();

        let mode = fs::metadata(&css).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let css = dir.path().join("tokens.css");
        fs::write(&css, "old").unwrap();
        fs::set_permissions(&css, fs::Permissions::from_mode(0o664)).unwrap();

        write_artifacts(&[(css.clone(), "new".into())]).unwrap();
        let mode = fs::metadata(&css).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
    }

    #[test]
    fn test_unwritable_target_leaves_others_untouched() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("tokens.css");
        fs::write(&css, "old").unwrap();
        // a file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_artifacts(&[(css.clone(), "new".into()), (blocker.join("tokens.ts"), "x".into())]).unwrap_err();
        assert!(matches!(err, TokenError::Io { .. }));
        assert_eq!(fs::read_to_string(&css).unwrap(), "old");
    }
}
