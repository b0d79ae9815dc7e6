//! Real link execution: `link(2)` a temp name next to the destination,
//! then `rename(2)` it over the destination. This is what makes
//! consolidation atomic from an external observer's point of view —
//! nobody ever sees `to_path` missing (grounded on dupe-krill's
//! `dedupe()` temp-rename dance).

use hardlinkable_core::{ExecError, LinkExecutor, LinkOp};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_name_for(dest: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    let suffix = format!(".hardlinkable-tmp-{pid}-{n}");
    dest.with_file_name(format!(
        "{}{}",
        dest.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        suffix
    ))
}

#[derive(Debug, Default)]
pub struct RealLinkExecutor;

impl LinkExecutor for RealLinkExecutor {
    fn link(&mut self, op: &LinkOp) -> Result<(), ExecError> {
        let temp_path = temp_name_for(&op.to_path);

        if let Err(source) = fs::hard_link(&op.from_path, &temp_path) {
            return Err(ExecError::Link {
                from: op.from_path.clone(),
                to: op.to_path.clone(),
                source,
            });
        }

        if let Err(source) = fs::rename(&temp_path, &op.to_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(ExecError::Rename {
                to: op.to_path.clone(),
                source,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn links_and_replaces_target() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a");
        let dest = dir.path().join("b");
        fs::write(&source, b"same content").unwrap();
        fs::write(&dest, b"same content").unwrap();

        let mut exec = RealLinkExecutor;
        let op = LinkOp {
            from_path: source.clone(),
            to_path: dest.clone(),
            from_inode: hardlinkable_core::InodeId::new(0, 1),
            to_inode: hardlinkable_core::InodeId::new(0, 2),
        };
        exec.link(&op).unwrap();

        let meta_a = fs::metadata(&source).unwrap();
        let meta_b = fs::metadata(&dest).unwrap();
        use std::os::unix::fs::MetadataExt;
        assert_eq!(meta_a.ino(), meta_b.ino());
        assert!(!dir.path().join("b.hardlinkable-tmp-0-0").exists());
    }

    #[test]
    fn missing_source_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("missing");
        let dest = dir.path().join("b");
        fs::write(&dest, b"x").unwrap();

        let mut exec = RealLinkExecutor;
        let op = LinkOp {
            from_path: source,
            to_path: dest,
            from_inode: hardlinkable_core::InodeId::new(0, 1),
            to_inode: hardlinkable_core::InodeId::new(0, 2),
        };
        assert!(exec.link(&op).is_err());

        let leftover = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().contains("hardlinkable-tmp"));
        assert!(!leftover);
    }
}
