//! Clip extraction via the `ffmpeg` command-line tool
//!
//! Equivalent to:
//! `ffmpeg -y -i <input> -vn -ss 00:00:00 -t 00:00:24 -f mp3 <output>`

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::services::process::{describe_status, stderr_tail};
use crate::types::{AudioTranscoder, TranscodeError};

/// ffmpeg backed transcoder
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path, clip: Duration) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg("-ss")
            .arg("00:00:00")
            .arg("-t")
            .arg(format_timestamp(clip))
            .arg("-f")
            .arg("mp3")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// `HH:MM:SS` (sub-second precision dropped)
fn format_timestamp(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[async_trait::async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn extract_clip(
        &self,
        input: &Path,
        output: &Path,
        clip: Duration,
    ) -> Result<(), TranscodeError> {
        debug!(
            input = %input.display(),
            output = %output.display(),
            clip_secs = clip.as_secs(),
            "Running ffmpeg"
        );

        let result = self
            .command(input, output, clip)
            .output()
            .await
            .map_err(TranscodeError::Spawn)?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: describe_status(&result.status),
                stderr: stderr_tail(&result.stderr),
            });
        }

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(TranscodeError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(Duration::from_secs(24)), "00:00:24");
        assert_eq!(format_timestamp(Duration::from_secs(90)), "00:01:30");
        assert_eq!(format_timestamp(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_timestamp(Duration::from_millis(24_900)), "00:00:24");
    }

    #[test]
    fn test_command_arguments() {
        let transcoder = FfmpegTranscoder::new("/opt/ffmpeg/bin/ffmpeg");
        let cmd = transcoder.command(
            Path::new("/tmp/x/in.m4a"),
            Path::new("/tmp/x/out.mp3"),
            Duration::from_secs(24),
        );
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "/opt/ffmpeg/bin/ffmpeg");

        let args: Vec<String> = std_cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let t_pos = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t_pos + 1], "00:00:24");
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i_pos + 1], "/tmp/x/in.m4a");
        assert_eq!(args.last().unwrap(), "/tmp/x/out.mp3");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/bin/ffmpeg");
        let err = transcoder
            .extract_clip(
                Path::new("/tmp/in.m4a"),
                Path::new("/tmp/out.mp3"),
                Duration::from_secs(24),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn(_)));
    }
}
