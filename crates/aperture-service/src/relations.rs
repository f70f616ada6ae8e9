use aperture_types::{Error, Result};

use crate::Service;

impl Service {
    /// Follows another user on behalf of the authenticated follower.
    pub fn follow(&self, credential: &str, follower_id: i64, followed_id: i64) -> Result<()> {
        self.guard.verify_actor(credential, follower_id)?;
        if follower_id == followed_id {
            return Err(Error::SelfReference);
        }
        if !self.db.user_exists(follower_id)? || !self.db.user_exists(followed_id)? {
            return Err(Error::UserNotFound);
        }
        // A user the target has banned cannot follow them.
        if self.db.ban_exists(followed_id, follower_id)? {
            return Err(Error::Blocked);
        }
        self.db.create_follow(follower_id, followed_id)
    }

    /// Stops following. Unfollowing an unfollowed user is a no-op.
    pub fn unfollow(&self, credential: &str, follower_id: i64, followed_id: i64) -> Result<()> {
        self.guard.verify_actor(credential, follower_id)?;
        self.db.delete_follow(follower_id, followed_id)
    }

    pub fn is_following(
        &self,
        credential: &str,
        follower_id: i64,
        followed_id: i64,
    ) -> Result<bool> {
        self.guard.verify_actor(credential, follower_id)?;
        self.db.follow_exists(follower_id, followed_id)
    }

    /// Bans a user; their follow of the banner is retracted in the same
    /// store transaction.
    pub fn ban(&self, credential: &str, banner_id: i64, banned_id: i64) -> Result<()> {
        self.guard.verify_actor(credential, banner_id)?;
        if banner_id == banned_id {
            return Err(Error::SelfReference);
        }
        if !self.db.user_exists(banner_id)? || !self.db.user_exists(banned_id)? {
            return Err(Error::UserNotFound);
        }
        self.db.create_ban(banner_id, banned_id)
    }

    /// Lifts a ban. Lifting an absent ban is a no-op.
    pub fn unban(&self, credential: &str, banner_id: i64, banned_id: i64) -> Result<()> {
        self.guard.verify_actor(credential, banner_id)?;
        self.db.delete_ban(banner_id, banned_id)
    }
}
