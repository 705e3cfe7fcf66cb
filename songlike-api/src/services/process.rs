//! Helpers for reporting external tool failures

use std::process::ExitStatus;

/// Maximum number of stderr lines kept in an error message
const STDERR_TAIL_LINES: usize = 12;

/// Human-readable exit status ("exit code 1", "signal 9")
pub(crate) fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {}", signal);
        }
    }

    "unknown status".to_string()
}

/// Last few non-empty lines of a tool's stderr
pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let input: String = (0..30).map(|i| format!("line {}\n\n", i)).collect();
        let tail = stderr_tail(input.as_bytes());
        assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
        assert!(tail.ends_with("line 29"));
        assert!(!tail.contains("line 17\n"));
    }

    #[test]
    fn test_stderr_tail_lossy_utf8() {
        let tail = stderr_tail(&[b'o', b'k', 0xff, b'\n']);
        assert!(tail.starts_with("ok"));
    }
}
