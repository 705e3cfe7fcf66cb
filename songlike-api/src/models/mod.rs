//! Domain models shared by the clients and the workflow

pub mod video_id;

pub use video_id::{VideoId, VideoIdError};

/// A song identified by one of the lookup phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongMatch {
    pub title: String,
    pub artist: String,
    /// Streaming-service track id (base-62, as used in `/me/tracks?ids=`)
    pub spotify_id: String,
}
