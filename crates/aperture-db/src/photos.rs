use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::warn;

use aperture_media::{BlobStore, ImageFormat, ImageSource};
use aperture_types::{Error, Photo, Result};

use crate::users::user_exists;
use crate::{Database, datetime_from_ms};

impl Database {
    /// Stores a photo's bytes and row atomically and returns the new photo.
    ///
    /// Photo ids are dense per owner, so the next id is the owner's current
    /// photo count; count and insert run in one IMMEDIATE transaction so
    /// concurrent uploads cannot race the sequence. A row is never left
    /// behind without its bytes, nor bytes without their row.
    pub fn upload_photo(
        &self,
        blobs: &BlobStore,
        owner_id: i64,
        image: &dyn ImageSource,
        format: ImageFormat,
    ) -> Result<Photo> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !user_exists(&tx, owner_id)? {
                return Err(Error::UserNotFound);
            }

            let photo_id = next_photo_id(&tx, owner_id)?;
            let bytes = image.encode(format)?;
            let blob_ref = blobs.put(owner_id, &bytes, format)?;
            let created_at_ms = Utc::now().timestamp_millis();

            let stored = tx
                .execute(
                    "INSERT INTO photos (user_id, photo_id, path, created_at_ms)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![owner_id, photo_id, blob_ref, created_at_ms],
                )
                .map_err(Error::from)
                .and_then(|_| tx.commit().map_err(Error::from));

            if let Err(e) = stored {
                if let Err(cleanup) = blobs.delete(&blob_ref) {
                    warn!("Orphan blob {} left after failed upload: {}", blob_ref, cleanup);
                }
                return Err(e);
            }

            Ok(Photo {
                owner_id,
                photo_id,
                storage_ref: blob_ref,
                created_at: datetime_from_ms(created_at_ms),
            })
        })
    }

    /// Deletes a photo row plus its blob and closes the id gap, all in one
    /// transaction. Comments and likes follow via the FK cascades.
    pub fn delete_photo(&self, blobs: &BlobStore, owner_id: i64, photo_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let blob_ref: String = tx
                .query_row(
                    "SELECT path FROM photos WHERE user_id = ?1 AND photo_id = ?2",
                    (owner_id, photo_id),
                    |row| row.get(0),
                )
                .optional()?
                .ok_or(Error::PhotoNotFound)?;

            tx.execute(
                "DELETE FROM photos WHERE user_id = ?1 AND photo_id = ?2",
                (owner_id, photo_id),
            )?;
            blobs.delete(&blob_ref)?;

            // Close the id gap. Two passes through the negative range keep
            // the composite primary key collision-free mid-update.
            tx.execute(
                "UPDATE photos SET photo_id = -(photo_id - 1)
                 WHERE user_id = ?1 AND photo_id > ?2",
                (owner_id, photo_id),
            )?;
            tx.execute(
                "UPDATE photos SET photo_id = -photo_id
                 WHERE user_id = ?1 AND photo_id < 0",
                [owner_id],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_photo(&self, owner_id: i64, photo_id: i64) -> Result<Option<Photo>> {
        self.with_conn(|conn| query_photo(conn, owner_id, photo_id))
    }

    pub fn photo_exists(&self, owner_id: i64, photo_id: i64) -> Result<bool> {
        self.with_conn(|conn| photo_exists(conn, owner_id, photo_id))
    }

    /// An owner's photos, newest first.
    pub fn get_owner_photos(&self, owner_id: i64, limit: i64) -> Result<Vec<Photo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT photo_id, path, created_at_ms FROM photos
                 WHERE user_id = ?1
                 ORDER BY created_at_ms DESC, photo_id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![owner_id, limit], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?
                .collect::<std::result::Result<Vec<(i64, String, i64)>, _>>()?;

            Ok(rows
                .into_iter()
                .map(|(photo_id, storage_ref, ms)| Photo {
                    owner_id,
                    photo_id,
                    storage_ref,
                    created_at: datetime_from_ms(ms),
                })
                .collect())
        })
    }
}

pub(crate) fn photo_exists(conn: &Connection, owner_id: i64, photo_id: i64) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM photos WHERE user_id = ?1 AND photo_id = ?2)",
        (owner_id, photo_id),
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn next_photo_id(conn: &Connection, owner_id: i64) -> Result<i64> {
    // Dense ids: the next id equals the current count.
    let count = conn.query_row(
        "SELECT COUNT(*) FROM photos WHERE user_id = ?1",
        [owner_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn query_photo(conn: &Connection, owner_id: i64, photo_id: i64) -> Result<Option<Photo>> {
    let photo = conn
        .query_row(
            "SELECT path, created_at_ms FROM photos WHERE user_id = ?1 AND photo_id = ?2",
            (owner_id, photo_id),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .map(|(storage_ref, ms): (String, i64)| Photo {
            owner_id,
            photo_id,
            storage_ref,
            created_at: datetime_from_ms(ms),
        });
    Ok(photo)
}
