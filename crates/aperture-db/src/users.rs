use rusqlite::{Connection, OptionalExtension};

use aperture_types::{Error, Result, User};

use crate::{Database, on_conflict};

impl Database {
    /// Inserts a new user and returns its generated id.
    /// The UNIQUE constraint on usernames is the arbiter of naming races.
    pub fn create_user(&self, username: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute("INSERT INTO users (username) VALUES (?1)", [username])
                .map_err(|e| on_conflict(e, Error::UsernameTaken))?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| user_exists(conn, id))
    }

    pub fn get_username_by_id(&self, id: i64) -> Result<String> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT username FROM users WHERE user_id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(Error::UserNotFound)
        })
    }

    /// Changes a username in place. A concurrent claim of the same name
    /// surfaces as `UsernameTaken` straight from the engine, never as a
    /// partial write.
    pub fn rename_user(&self, id: i64, new_username: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let affected = conn
                .execute(
                    "UPDATE users SET username = ?1 WHERE user_id = ?2",
                    (new_username, id),
                )
                .map_err(|e| on_conflict(e, Error::UsernameTaken))?;
            if affected == 0 {
                return Err(Error::UserNotFound);
            }
            Ok(())
        })
    }
}

pub(crate) fn user_exists(conn: &Connection, id: i64) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, username FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, username FROM users WHERE user_id = ?1",
            [id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
