use rusqlite::{Connection, params};

use aperture_types::{Photo, PhotoStats, PhotoView, Result, StreamEntry};

use crate::{Database, datetime_from_ms};

impl Database {
    /// Upload, follower and following counts for a profile header.
    pub fn get_profile_counts(&self, user_id: i64) -> Result<(i64, i64, i64)> {
        self.with_conn(|conn| {
            let counts = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM photos WHERE user_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE followed_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE follower_id = ?1)",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
            Ok(counts)
        })
    }

    pub fn get_photo_stats(&self, owner_id: i64, photo_id: i64) -> Result<PhotoStats> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM likes
                      WHERE photo_owner = ?1 AND photo_id = ?2),
                    (SELECT COUNT(*) FROM comments
                      WHERE photo_owner = ?1 AND photo_id = ?2)",
                (owner_id, photo_id),
                |row| {
                    Ok(PhotoStats {
                        likes: row.get(0)?,
                        comments: row.get(1)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    /// An owner's photos, newest first, decorated with their counts.
    pub fn get_owner_photo_views(&self, owner_id: i64, limit: i64) -> Result<Vec<PhotoView>> {
        self.with_conn(|conn| query_photo_views(conn, owner_id, limit))
    }

    /// Photos of every user the viewer follows, newest first.
    pub fn get_stream(&self, viewer_id: i64, limit: i64) -> Result<Vec<StreamEntry>> {
        self.with_conn(|conn| query_stream(conn, viewer_id, limit))
    }
}

fn query_photo_views(conn: &Connection, owner_id: i64, limit: i64) -> Result<Vec<PhotoView>> {
    // Correlated count subqueries keep this a single round trip.
    let mut stmt = conn.prepare(
        "SELECT p.photo_id, p.path, p.created_at_ms,
                (SELECT COUNT(*) FROM likes l
                  WHERE l.photo_owner = p.user_id AND l.photo_id = p.photo_id),
                (SELECT COUNT(*) FROM comments c
                  WHERE c.photo_owner = p.user_id AND c.photo_id = p.photo_id)
         FROM photos p
         WHERE p.user_id = ?1
         ORDER BY p.created_at_ms DESC, p.photo_id DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![owner_id, limit], |row| {
            Ok(PhotoView {
                photo: Photo {
                    owner_id,
                    photo_id: row.get(0)?,
                    storage_ref: row.get(1)?,
                    created_at: datetime_from_ms(row.get(2)?),
                },
                stats: PhotoStats {
                    likes: row.get(3)?,
                    comments: row.get(4)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_stream(conn: &Connection, viewer_id: i64, limit: i64) -> Result<Vec<StreamEntry>> {
    let mut stmt = conn.prepare(
        "SELECT p.user_id, p.photo_id, u.username, p.path, p.created_at_ms,
                (SELECT COUNT(*) FROM likes l
                  WHERE l.photo_owner = p.user_id AND l.photo_id = p.photo_id),
                (SELECT COUNT(*) FROM comments c
                  WHERE c.photo_owner = p.user_id AND c.photo_id = p.photo_id)
         FROM photos p
         JOIN users u ON u.user_id = p.user_id
         WHERE p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
         ORDER BY p.created_at_ms DESC, p.photo_id DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![viewer_id, limit], |row| {
            Ok(StreamEntry {
                photo: Photo {
                    owner_id: row.get(0)?,
                    photo_id: row.get(1)?,
                    storage_ref: row.get(3)?,
                    created_at: datetime_from_ms(row.get(4)?),
                },
                owner_username: row.get(2)?,
                stats: PhotoStats {
                    likes: row.get(5)?,
                    comments: row.get(6)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
