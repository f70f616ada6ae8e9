use aperture_types::{Error, Result};

use crate::{Database, on_conflict};

impl Database {
    pub fn like_exists(&self, photo_owner_id: i64, photo_id: i64, user_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM likes
                 WHERE photo_owner = ?1 AND photo_id = ?2 AND user_id = ?3)",
                (photo_owner_id, photo_id, user_id),
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn create_like(&self, photo_owner_id: i64, photo_id: i64, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO likes (photo_owner, photo_id, user_id) VALUES (?1, ?2, ?3)",
                (photo_owner_id, photo_id, user_id),
            )
            .map_err(|e| on_conflict(e, Error::AlreadyExists))?;
            Ok(())
        })
    }

    /// Removes a like. Removing an absent like is a no-op.
    pub fn delete_like(&self, photo_owner_id: i64, photo_id: i64, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM likes WHERE photo_owner = ?1 AND photo_id = ?2 AND user_id = ?3",
                (photo_owner_id, photo_id, user_id),
            )?;
            Ok(())
        })
    }
}
