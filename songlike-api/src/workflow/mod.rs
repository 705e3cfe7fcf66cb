//! Request workflow: link lookup, recognition fallback, like

pub mod like_song;
pub mod recognition;

pub use like_song::{LikeSongWorkflow, WorkflowError};
pub use recognition::{PipelineError, PipelineSettings, RecognitionPipeline};
