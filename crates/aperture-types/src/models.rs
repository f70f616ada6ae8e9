use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 16;

/// Maximum comment body length in bytes.
pub const COMMENT_MAX: usize = 128;

/// Usernames are 3-16 ASCII alphanumeric characters.
pub fn validate_username(username: &str) -> Result<()> {
    let ok = (USERNAME_MIN..=USERNAME_MAX).contains(&username.len())
        && username.bytes().all(|b| b.is_ascii_alphanumeric());
    if ok { Ok(()) } else { Err(Error::InvalidUsername) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Photo ids are dense per owner: an owner with N photos holds ids 0..N-1.
/// `storage_ref` is the opaque key of the backing bytes in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub owner_id: i64,
    pub photo_id: i64,
    pub storage_ref: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoStats {
    pub likes: i64,
    pub comments: i64,
}

/// A photo decorated with its derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoView {
    pub photo: Photo,
    pub stats: PhotoStats,
}

/// Comment ids are dense per photo, mirroring the photo id scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub photo_owner_id: i64,
    pub photo_id: i64,
    pub comment_id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    pub photo: Photo,
    pub owner_username: String,
    pub stats: PhotoStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user: User,
    pub photos: Vec<PhotoView>,
    pub uploads: i64,
    pub followers: i64,
    pub following: i64,
}

/// A logged-in identity plus its signed bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}
