//! Production implementations of the external service seams

pub mod audd_client;
pub mod ffmpeg_transcoder;
pub mod odesli_client;
pub(crate) mod process;
pub mod spotify_client;
pub mod ytdlp_downloader;

pub use audd_client::AuddClient;
pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use odesli_client::OdesliClient;
pub use spotify_client::SpotifyClient;
pub use ytdlp_downloader::YtDlpDownloader;

/// User-Agent sent to every external HTTP API
pub const USER_AGENT: &str = concat!("songlike/", env!("CARGO_PKG_VERSION"));
