use aperture_types::{Error, Result, Session, User, validate_username};

use crate::Service;

impl Service {
    /// Logs a user in by name, creating the account on first sight, and
    /// returns the identity with a freshly issued credential.
    pub fn login(&self, username: &str) -> Result<Session> {
        validate_username(username)?;
        let user = match self.db.get_user_by_username(username)? {
            Some(user) => user,
            None => match self.db.create_user(username) {
                Ok(id) => User {
                    id,
                    username: username.to_string(),
                },
                // Lost a creation race; the account exists now.
                Err(Error::UsernameTaken) => self
                    .db
                    .get_user_by_username(username)?
                    .ok_or(Error::UsernameTaken)?,
                Err(e) => return Err(e),
            },
        };
        let token = self.guard.issue(user.id)?;
        Ok(Session { user, token })
    }

    /// Public lookup of a user by exact username.
    pub fn user_by_username(&self, username: &str) -> Result<User> {
        self.db
            .get_user_by_username(username)?
            .ok_or(Error::UserNotFound)
    }

    /// Changes the caller's own username.
    pub fn rename_user(&self, credential: &str, user_id: i64, new_username: &str) -> Result<()> {
        self.guard.verify_actor(credential, user_id)?;
        validate_username(new_username)?;
        self.db.rename_user(user_id, new_username)
    }
}
