use aperture_types::{Error, Result};

use crate::Service;

impl Service {
    /// Likes a photo as the authenticated caller. Liking twice fails.
    pub fn like_photo(&self, credential: &str, photo_owner_id: i64, photo_id: i64) -> Result<()> {
        let liker = self.guard.authenticate(credential)?;
        // A well-signed token can outlive its account.
        if !self.db.user_exists(liker)? {
            return Err(Error::UserNotFound);
        }
        if !self.db.photo_exists(photo_owner_id, photo_id)? {
            return Err(Error::PhotoNotFound);
        }
        self.db.create_like(photo_owner_id, photo_id, liker)
    }

    /// Withdraws the caller's like. Unliking an unliked photo is a no-op.
    pub fn unlike_photo(&self, credential: &str, photo_owner_id: i64, photo_id: i64) -> Result<()> {
        let liker = self.guard.authenticate(credential)?;
        self.db.delete_like(photo_owner_id, photo_id, liker)
    }
}
