use rusqlite::TransactionBehavior;

use aperture_types::{Error, Result};

use crate::{Database, on_conflict};

impl Database {
    pub fn follow_exists(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2)",
                (follower_id, followed_id),
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn create_follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        if follower_id == followed_id {
            return Err(Error::SelfReference);
        }
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                (follower_id, followed_id),
            )
            .map_err(|e| on_conflict(e, Error::AlreadyExists))?;
            Ok(())
        })
    }

    /// Removes a follow edge. Removing an absent edge is a no-op.
    pub fn delete_follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                (follower_id, followed_id),
            )?;
            Ok(())
        })
    }

    pub fn ban_exists(&self, banner_id: i64, banned_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM bans WHERE banner_id = ?1 AND banned_id = ?2)",
                (banner_id, banned_id),
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Inserts a ban and retracts the banned user's follow of the banner
    /// in the same transaction; either both changes commit or neither.
    pub fn create_ban(&self, banner_id: i64, banned_id: i64) -> Result<()> {
        if banner_id == banned_id {
            return Err(Error::SelfReference);
        }
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                (banned_id, banner_id),
            )?;
            tx.execute(
                "INSERT INTO bans (banner_id, banned_id) VALUES (?1, ?2)",
                (banner_id, banned_id),
            )
            .map_err(|e| on_conflict(e, Error::AlreadyExists))?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Lifts a ban. Lifting an absent ban is a no-op.
    pub fn delete_ban(&self, banner_id: i64, banned_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM bans WHERE banner_id = ?1 AND banned_id = ?2",
                (banner_id, banned_id),
            )?;
            Ok(())
        })
    }
}
