use rusqlite::Connection;
use tracing::info;

use aperture_types::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS follows (
            follower_id INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            followed_id INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            PRIMARY KEY (follower_id, followed_id)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_followed
            ON follows(followed_id);

        CREATE TABLE IF NOT EXISTS bans (
            banner_id   INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            banned_id   INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            PRIMARY KEY (banner_id, banned_id)
        );

        CREATE TABLE IF NOT EXISTS photos (
            user_id         INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            photo_id        INTEGER NOT NULL,
            path            TEXT NOT NULL,
            created_at_ms   INTEGER NOT NULL,
            PRIMARY KEY (user_id, photo_id)
        );

        CREATE INDEX IF NOT EXISTS idx_photos_created
            ON photos(created_at_ms);

        CREATE TABLE IF NOT EXISTS likes (
            photo_owner INTEGER NOT NULL,
            photo_id    INTEGER NOT NULL,
            user_id     INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            PRIMARY KEY (photo_owner, photo_id, user_id),
            FOREIGN KEY (photo_owner, photo_id) REFERENCES photos(user_id, photo_id)
                ON DELETE CASCADE ON UPDATE CASCADE
        );

        CREATE TABLE IF NOT EXISTS comments (
            photo_owner     INTEGER NOT NULL,
            photo_id        INTEGER NOT NULL,
            comment_id      INTEGER NOT NULL,
            comment_owner   INTEGER NOT NULL REFERENCES users(user_id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            content         TEXT NOT NULL,
            PRIMARY KEY (photo_owner, photo_id, comment_id),
            FOREIGN KEY (photo_owner, photo_id) REFERENCES photos(user_id, photo_id)
                ON DELETE CASCADE ON UPDATE CASCADE
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
