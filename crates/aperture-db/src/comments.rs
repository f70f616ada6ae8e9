use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use aperture_types::{COMMENT_MAX, Comment, Error, Result};

use crate::Database;
use crate::photos::photo_exists;

impl Database {
    /// Appends a comment to a photo and returns it with its assigned id.
    ///
    /// Comment ids are dense per photo; like photo uploads, the count and
    /// the insert share one IMMEDIATE transaction.
    pub fn create_comment(
        &self,
        photo_owner_id: i64,
        photo_id: i64,
        comment_owner_id: i64,
        content: &str,
    ) -> Result<Comment> {
        if content.is_empty() || content.len() > COMMENT_MAX {
            return Err(Error::InvalidContent);
        }
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !photo_exists(&tx, photo_owner_id, photo_id)? {
                return Err(Error::PhotoNotFound);
            }
            let owner_username: String = tx
                .query_row(
                    "SELECT username FROM users WHERE user_id = ?1",
                    [comment_owner_id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or(Error::UserNotFound)?;

            let comment_id: i64 = tx.query_row(
                "SELECT COUNT(*) FROM comments WHERE photo_owner = ?1 AND photo_id = ?2",
                (photo_owner_id, photo_id),
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT INTO comments (photo_owner, photo_id, comment_id, comment_owner, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![photo_owner_id, photo_id, comment_id, comment_owner_id, content],
            )?;
            tx.commit()?;

            Ok(Comment {
                photo_owner_id,
                photo_id,
                comment_id,
                owner_id: comment_owner_id,
                owner_username,
                content: content.to_string(),
            })
        })
    }

    /// Deletes a comment and closes the id gap among its photo's comments.
    pub fn delete_comment(&self, photo_owner_id: i64, photo_id: i64, comment_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let affected = tx.execute(
                "DELETE FROM comments
                 WHERE photo_owner = ?1 AND photo_id = ?2 AND comment_id = ?3",
                (photo_owner_id, photo_id, comment_id),
            )?;
            if affected == 0 {
                return Err(Error::CommentNotFound);
            }

            // Same two-pass renumbering as photo deletion.
            tx.execute(
                "UPDATE comments SET comment_id = -(comment_id - 1)
                 WHERE photo_owner = ?1 AND photo_id = ?2 AND comment_id > ?3",
                (photo_owner_id, photo_id, comment_id),
            )?;
            tx.execute(
                "UPDATE comments SET comment_id = -comment_id
                 WHERE photo_owner = ?1 AND photo_id = ?2 AND comment_id < 0",
                (photo_owner_id, photo_id),
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_comment_owner(&self, photo_owner_id: i64, photo_id: i64, comment_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT comment_owner FROM comments
                 WHERE photo_owner = ?1 AND photo_id = ?2 AND comment_id = ?3",
                (photo_owner_id, photo_id, comment_id),
                |row| row.get(0),
            )
            .optional()?
            .ok_or(Error::CommentNotFound)
        })
    }

    /// A photo's comments in id order, each with its author's username.
    pub fn get_photo_comments(
        &self,
        photo_owner_id: i64,
        photo_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.with_conn(|conn| query_photo_comments(conn, photo_owner_id, photo_id, limit))
    }
}

fn query_photo_comments(
    conn: &Connection,
    photo_owner_id: i64,
    photo_id: i64,
    limit: i64,
) -> Result<Vec<Comment>> {
    // JOIN users to fetch the author username in a single query (eliminates N+1)
    let mut stmt = conn.prepare(
        "SELECT c.comment_id, c.comment_owner, u.username, c.content
         FROM comments c
         LEFT JOIN users u ON c.comment_owner = u.user_id
         WHERE c.photo_owner = ?1 AND c.photo_id = ?2
         ORDER BY c.comment_id
         LIMIT ?3",
    )?;

    let rows = stmt
        .query_map(params![photo_owner_id, photo_id, limit], |row| {
            Ok(Comment {
                photo_owner_id,
                photo_id,
                comment_id: row.get(0)?,
                owner_id: row.get(1)?,
                owner_username: row
                    .get::<_, Option<String>>(2)?
                    .unwrap_or_else(|| "unknown".to_string()),
                content: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_media::{BlobStore, ImageFormat, RawImage};

    fn fixture_with_photo() -> (Database, i64, i64, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let blobs = BlobStore::new(dir.path().join("media")).unwrap();

        let alice = db.create_user("alice").unwrap();
        let bob = db.create_user("bob").unwrap();
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(&[0u8; 8]);
        let image = RawImage::new(bytes, ImageFormat::Jpeg).unwrap();
        db.upload_photo(&blobs, alice, &image, ImageFormat::Jpeg).unwrap();

        (db, alice, bob, dir)
    }

    #[test]
    fn comments_get_dense_ids_in_insertion_order() {
        let (db, alice, bob, _dir) = fixture_with_photo();

        let c0 = db.create_comment(alice, 0, bob, "first").unwrap();
        let c1 = db.create_comment(alice, 0, alice, "second").unwrap();
        assert_eq!((c0.comment_id, c1.comment_id), (0, 1));

        let comments = db.get_photo_comments(alice, 0, 100).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "first");
        assert_eq!(comments[0].owner_username, "bob");
        assert_eq!(comments[1].content, "second");
        assert_eq!(comments[1].owner_username, "alice");
    }

    #[test]
    fn content_length_is_enforced_in_bytes() {
        let (db, alice, bob, _dir) = fixture_with_photo();

        assert!(matches!(
            db.create_comment(alice, 0, bob, ""),
            Err(Error::InvalidContent)
        ));
        let too_long = "x".repeat(COMMENT_MAX + 1);
        assert!(matches!(
            db.create_comment(alice, 0, bob, &too_long),
            Err(Error::InvalidContent)
        ));

        // Exactly at the limit is fine; multi-byte characters count as bytes.
        let at_limit = "x".repeat(COMMENT_MAX);
        db.create_comment(alice, 0, bob, &at_limit).unwrap();
        let snowmen = "\u{2603}".repeat(43); // 129 bytes
        assert!(matches!(
            db.create_comment(alice, 0, bob, &snowmen),
            Err(Error::InvalidContent)
        ));
    }

    #[test]
    fn delete_renumbers_the_remaining_comments() {
        let (db, alice, bob, _dir) = fixture_with_photo();

        db.create_comment(alice, 0, bob, "a").unwrap();
        db.create_comment(alice, 0, bob, "b").unwrap();
        db.create_comment(alice, 0, bob, "c").unwrap();

        db.delete_comment(alice, 0, 0).unwrap();

        let comments = db.get_photo_comments(alice, 0, 100).unwrap();
        let summary: Vec<(i64, &str)> = comments
            .iter()
            .map(|c| (c.comment_id, c.content.as_str()))
            .collect();
        assert_eq!(summary, vec![(0, "b"), (1, "c")]);

        // The freed id is reused by the next comment.
        let next = db.create_comment(alice, 0, bob, "d").unwrap();
        assert_eq!(next.comment_id, 2);
    }

    #[test]
    fn delete_missing_comment_fails() {
        let (db, alice, _bob, _dir) = fixture_with_photo();

        assert!(matches!(
            db.delete_comment(alice, 0, 5),
            Err(Error::CommentNotFound)
        ));
        assert!(matches!(
            db.get_comment_owner(alice, 0, 5),
            Err(Error::CommentNotFound)
        ));
    }

    #[test]
    fn commenting_requires_photo_and_user() {
        let (db, alice, bob, _dir) = fixture_with_photo();

        assert!(matches!(
            db.create_comment(alice, 9, bob, "where?"),
            Err(Error::PhotoNotFound)
        ));
        assert!(matches!(
            db.create_comment(alice, 0, 999, "who?"),
            Err(Error::UserNotFound)
        ));
    }

    #[test]
    fn comment_owner_is_recorded() {
        let (db, alice, bob, _dir) = fixture_with_photo();

        db.create_comment(alice, 0, bob, "mine").unwrap();
        assert_eq!(db.get_comment_owner(alice, 0, 0).unwrap(), bob);
    }
}
