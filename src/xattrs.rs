//! Extended-attribute fingerprinting via the `xattr` crate.

use hardlinkable_core::XattrFingerprint;
use std::path::Path;

/// Reads every extended attribute on `path` and folds it into an
/// order-independent [`XattrFingerprint`]. Returns `absent()` (not an
/// error) when the platform or filesystem doesn't support xattrs at all,
/// since that's equivalent to "no attributes to compare" for our
/// purposes; a genuine read failure on a per-attribute basis is logged
/// and that attribute is skipped rather than aborting the whole file.
pub fn fingerprint(path: &Path) -> XattrFingerprint {
    let names = match xattr::list(path) {
        Ok(names) => names,
        Err(_) => return XattrFingerprint::absent(),
    };

    let mut pairs = Vec::new();
    for name in names {
        match xattr::get(path, &name) {
            Ok(Some(value)) => pairs.push((name, value)),
            Ok(None) => {}
            Err(e) => {
                log::debug!("xattr read failed for {} on {}: {}", name.to_string_lossy(), path.display(), e);
            }
        }
    }

    if pairs.is_empty() {
        XattrFingerprint::absent()
    } else {
        XattrFingerprint::from_pairs(pairs)
    }
}
