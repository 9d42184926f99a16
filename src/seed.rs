//! Master seed resolution.
//!
//! The seed is a raw byte buffer at a well-known path. It is created once
//! with owner-only permissions and read back verbatim on every operation;
//! nothing here caches or interprets it.

use getrandom::fill;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Length of a freshly generated master seed (32 bytes).
pub const SEED_LEN: usize = 32;

const SEED_DIR: &str = ".credparser";
const SEED_FILE: &str = "master.seed";

/// Returns the default seed location: `$HOME/.credparser/master.seed`.
pub fn default_seed_path() -> io::Result<PathBuf> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| io::Error::other("could not determine home directory"))?;
    Ok(base.home_dir().join(SEED_DIR).join(SEED_FILE))
}

/// Reads the master seed, creating it first if it does not exist.
///
/// Creation uses an exclusive create so that two processes racing on the
/// same path cannot clobber each other's seed; the loser of the race reads
/// the winner's file.
///
/// # Errors
///
/// Returns an I/O error if the path is unreadable or uncreatable for any
/// reason other than already existing.
pub fn resolve(path: Option<&Path>) -> io::Result<Vec<u8>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_seed_path()?,
    };

    if !path.exists() {
        match create(&path) {
            Ok(()) => debug!(path = %path.display(), "created new master seed"),
            // Another process created the seed between our check and the
            // exclusive open. Its file may still be mid-write, so settle on
            // a full-length read before returning it.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                check_permissions(&path);
                return read_settled(&path);
            }
            Err(e) => return Err(e),
        }
    }

    check_permissions(&path);
    fs::read(&path)
}

/// Re-reads a seed another process is still creating until all `SEED_LEN`
/// bytes have landed, then returns whatever is there.
fn read_settled(path: &Path) -> io::Result<Vec<u8>> {
    let mut seed = fs::read(path)?;
    for _ in 0..50 {
        if seed.len() >= SEED_LEN {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
        seed = fs::read(path)?;
    }
    Ok(seed)
}

fn create(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut seed = [0u8; SEED_LEN];
    fill(&mut seed).map_err(|_| io::Error::other("OS random generator unavailable"))?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(&seed)?;
    file.sync_all()?;
    Ok(())
}

/// A seed readable by group/other is worth flagging but not fatal.
#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::MetadataExt;
    use tracing::warn;

    if let Ok(meta) = fs::metadata(path) {
        if meta.mode() & 0o077 != 0 {
            warn!(
                path = %path.display(),
                "master seed file is readable by group/other"
            );
        }
    }
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) {}
