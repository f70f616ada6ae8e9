pub mod config;
pub mod guard;

mod comments;
mod likes;
mod photos;
mod relations;
mod users;
mod views;

use aperture_db::Database;
use aperture_media::BlobStore;
use aperture_types::{Error, Result};

pub use config::Config;
pub use guard::AccessGuard;

/// Most photos returned for a single profile.
pub const MAX_PROFILE_PHOTOS: i64 = 100_000;
/// Most comments returned for a single photo.
pub const MAX_COMMENT_COUNT: i64 = 100_000;
/// Most entries returned for a single stream fetch.
pub const MAX_STREAM_LEN: i64 = 100;

/// The operation surface an HTTP layer mounts. Every call that acts on or
/// reveals content takes the caller's bearer credential and runs the guard
/// before touching a store.
pub struct Service {
    db: Database,
    blobs: BlobStore,
    guard: AccessGuard,
}

impl Service {
    pub fn new(config: &Config) -> Result<Self> {
        let db = Database::open(&config.db_path)?;
        let blobs = BlobStore::new(&config.media_root)?;
        let guard = AccessGuard::new(&config.token_secret, config.token_ttl);
        Ok(Self { db, blobs, guard })
    }

    /// Liveness probe: verifies the database answers.
    pub fn ping(&self) -> Result<()> {
        self.db.ping()
    }

    /// Authenticates the credential and applies the ban gate for content
    /// owned by `owner_id`. Returns the viewer's identity.
    fn authorize_viewer(&self, credential: &str, owner_id: i64) -> Result<i64> {
        let viewer = self.guard.authenticate(credential)?;
        if self.db.ban_exists(owner_id, viewer)? {
            return Err(Error::Blocked);
        }
        Ok(viewer)
    }
}
