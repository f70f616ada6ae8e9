use aperture_types::{Comment, Error, Result};

use crate::{MAX_COMMENT_COUNT, Service};

impl Service {
    /// Comments on a photo; the author is the authenticated caller.
    pub fn add_comment(
        &self,
        credential: &str,
        photo_owner_id: i64,
        photo_id: i64,
        content: &str,
    ) -> Result<Comment> {
        let author = self.guard.authenticate(credential)?;
        self.db
            .create_comment(photo_owner_id, photo_id, author, content)
    }

    /// A photo's comments with their author usernames, ban-gated.
    pub fn photo_comments(
        &self,
        credential: &str,
        photo_owner_id: i64,
        photo_id: i64,
    ) -> Result<Vec<Comment>> {
        self.authorize_viewer(credential, photo_owner_id)?;
        if !self.db.photo_exists(photo_owner_id, photo_id)? {
            return Err(Error::PhotoNotFound);
        }
        self.db
            .get_photo_comments(photo_owner_id, photo_id, MAX_COMMENT_COUNT)
    }

    /// Deletes a comment; only its author may do so.
    pub fn delete_comment(
        &self,
        credential: &str,
        photo_owner_id: i64,
        photo_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        let actor = self.guard.authenticate(credential)?;
        let author = self
            .db
            .get_comment_owner(photo_owner_id, photo_id, comment_id)?;
        if actor != author {
            return Err(Error::InvalidCredential);
        }
        self.db.delete_comment(photo_owner_id, photo_id, comment_id)
    }
}
