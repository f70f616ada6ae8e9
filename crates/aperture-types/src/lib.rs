pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    COMMENT_MAX, Comment, Photo, PhotoStats, PhotoView, Profile, Session, StreamEntry, USERNAME_MAX,
    USERNAME_MIN, User, validate_username,
};
