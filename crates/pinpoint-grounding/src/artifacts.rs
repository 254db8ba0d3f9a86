use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Returns a fresh `<prefix>_<timestamp>_<seq>.<extension>` path inside `dir`.
///
/// The sequence number is process-wide, so two calls within the same second never
/// collide.
pub(crate) fn artifact_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%m-%d_%H-%M-%S");
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    dir.join(format!("{prefix}_{timestamp}_{seq}.{extension}"))
}
