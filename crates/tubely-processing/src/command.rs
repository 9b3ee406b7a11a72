//! Helpers shared by the tool wrappers

use std::path::Path;

use crate::ProcessingError;

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Validate that a path doesn't contain shell metacharacters or traversal
pub fn validate_path(path: &Path) -> Result<(), ProcessingError> {
    let path_str = path.to_string_lossy();
    if path_str.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(ProcessingError::InvalidPath(format!(
            "Path contains dangerous characters: {}",
            path_str
        )));
    }

    if path_str.contains("..") {
        return Err(ProcessingError::InvalidPath(format!(
            "Path contains directory traversal: {}",
            path_str
        )));
    }

    Ok(())
}

/// Validate a configured tool binary (a bare name or an absolute path).
pub fn validate_binary(binary: &str) -> Result<(), ProcessingError> {
    validate_path(Path::new(binary))?;

    if binary.is_empty()
        || !binary.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        })
    {
        return Err(ProcessingError::InvalidPath(format!(
            "Tool path contains unsafe characters: {}",
            binary
        )));
    }

    Ok(())
}

/// Last few lines of a tool's stderr, enough to log without flooding.
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().rev().take(5).collect();
    lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_metacharacters() {
        assert!(validate_path(Path::new("/tmp/a;rm -rf /")).is_err());
        assert!(validate_path(Path::new("/tmp/../etc/passwd")).is_err());
        assert!(validate_path(Path::new("/tmp/tubely-upload-x/video.mp4")).is_ok());
    }

    #[test]
    fn test_binary_validation() {
        assert!(validate_binary("ffprobe").is_ok());
        assert!(validate_binary("/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_binary("ffmpeg --evil").is_err());
        assert!(validate_binary("").is_err());
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr = b"1\n2\n3\n4\n5\n6\n7";
        assert_eq!(stderr_tail(stderr), "3\n4\n5\n6\n7");
    }
}
