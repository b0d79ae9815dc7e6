//! Inode identity and the metadata snapshot captured at first discovery.

use std::ffi::OsString;

/// `(device_id, inode_number)`. Two pathnames sharing an `InodeId` are
/// already hard-linked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InodeId {
    pub dev: u64,
    pub ino: u64,
}

impl InodeId {
    pub fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }
}

impl std::fmt::Display for InodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.dev, self.ino)
    }
}

/// Metadata captured when a pathname is first admitted. `mtime` is split
/// into seconds and nanoseconds so sub-second precision participates in
/// comparisons on platforms that provide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSnapshot {
    pub size: u64,
    pub mtime_secs: i64,
    pub mtime_nanos: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,
    pub is_regular: bool,
}

impl StatSnapshot {
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            size: meta.size(),
            mtime_secs: meta.mtime(),
            mtime_nanos: meta.mtime_nsec() as u32,
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            nlink: meta.nlink(),
            is_regular: meta.file_type().is_file(),
        }
    }

    pub fn dev_ino(meta: &std::fs::Metadata) -> InodeId {
        use std::os::unix::fs::MetadataExt;
        InodeId::new(meta.dev(), meta.ino())
    }

    /// Permission bits only, ignoring the file-type bits `mode` also carries.
    pub fn perm_bits(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// An order-independent fingerprint of a file's extended attributes.
/// `None` means xattrs are not tracked by the active policy (or the
/// filesystem/platform has none); `Some` is always sorted by name so two
/// fingerprints compare equal regardless of the order the attributes were
/// read in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct XattrFingerprint(pub Option<Vec<(OsString, Vec<u8>)>>);

impl XattrFingerprint {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn from_pairs(mut pairs: Vec<(OsString, Vec<u8>)>) -> Self {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self(Some(pairs))
    }
}
