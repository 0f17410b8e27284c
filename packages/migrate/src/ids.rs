use crc32fast::Hasher;

/// Deterministic id for a row or cell that was persisted without one
///
/// Derived from the node's structural path (`r0/c1/r0`), so migrating the
/// same input twice yields the same ids.
pub fn structural_id(path: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"folio://");
    hasher.update(path.as_bytes());
    format!("{:08x}", hasher.finalize())
}
