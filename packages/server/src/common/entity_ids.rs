//! Typed ID definitions for domain entities.
//!
//! ```rust,ignore
//! use crate::common::PostId;
//!
//! let post_id = PostId::new();
//! ```

pub use super::id::Id;

/// Marker type for campus feed posts.
pub struct Post;

pub type PostId = Id<Post>;
