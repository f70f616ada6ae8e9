use aperture_media::{ImageFormat, ImageSource};
use aperture_types::{Error, Photo, PhotoStats, Result};

use crate::Service;

impl Service {
    /// Publishes a photo to the caller's own page.
    pub fn upload_photo(
        &self,
        credential: &str,
        owner_id: i64,
        image: &dyn ImageSource,
        format: ImageFormat,
    ) -> Result<Photo> {
        self.guard.verify_actor(credential, owner_id)?;
        self.db.upload_photo(&self.blobs, owner_id, image, format)
    }

    /// Removes one of the caller's own photos.
    pub fn delete_photo(&self, credential: &str, owner_id: i64, photo_id: i64) -> Result<()> {
        self.guard.verify_actor(credential, owner_id)?;
        self.db.delete_photo(&self.blobs, owner_id, photo_id)
    }

    /// Serves a photo's bytes, provided the owner has not banned the viewer.
    /// The format comes from the stored bytes themselves.
    pub fn photo_content(
        &self,
        credential: &str,
        owner_id: i64,
        photo_id: i64,
    ) -> Result<(Vec<u8>, ImageFormat)> {
        self.authorize_viewer(credential, owner_id)?;
        let photo = self
            .db
            .get_photo(owner_id, photo_id)?
            .ok_or(Error::PhotoNotFound)?;
        let bytes = self.blobs.read(&photo.storage_ref)?;
        let format = ImageFormat::detect(&bytes).ok_or(Error::Decode)?;
        Ok((bytes, format))
    }

    /// Like and comment counts for one photo, ban-gated like the content.
    pub fn photo_stats(
        &self,
        credential: &str,
        owner_id: i64,
        photo_id: i64,
    ) -> Result<PhotoStats> {
        self.authorize_viewer(credential, owner_id)?;
        if !self.db.photo_exists(owner_id, photo_id)? {
            return Err(Error::PhotoNotFound);
        }
        self.db.get_photo_stats(owner_id, photo_id)
    }
}
