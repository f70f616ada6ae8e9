use aperture_types::{Error, Profile, Result, StreamEntry};

use crate::{MAX_PROFILE_PHOTOS, MAX_STREAM_LEN, Service};

impl Service {
    /// A user's page as seen by the authenticated viewer: identity, counts
    /// and photos with their stats, newest first.
    pub fn profile(&self, credential: &str, owner_id: i64) -> Result<Profile> {
        self.authorize_viewer(credential, owner_id)?;
        let user = self
            .db
            .get_user_by_id(owner_id)?
            .ok_or(Error::UserNotFound)?;
        let (uploads, followers, following) = self.db.get_profile_counts(owner_id)?;
        let photos = self.db.get_owner_photo_views(owner_id, MAX_PROFILE_PHOTOS)?;
        Ok(Profile {
            user,
            photos,
            uploads,
            followers,
            following,
        })
    }

    /// The caller's home stream: photos of everyone they follow, newest
    /// first, capped at [`MAX_STREAM_LEN`] entries.
    pub fn stream(&self, credential: &str, user_id: i64) -> Result<Vec<StreamEntry>> {
        self.guard.verify_actor(credential, user_id)?;
        if !self.db.user_exists(user_id)? {
            return Err(Error::UserNotFound);
        }
        self.db.get_stream(user_id, MAX_STREAM_LEN)
    }
}
