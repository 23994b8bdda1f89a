use super::VoiceError;
use std::fs;
use std::io::{self, Write};
use std::process::{Child, Command, Stdio};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Placeholder replaced with the output file path in recorder commands
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Microphone capture producing a webm clip
pub trait AudioCapture {
    fn start(&mut self) -> Result<(), VoiceError>;

    /// Finish the session and hand back everything captured
    fn stop(&mut self) -> Result<Vec<u8>, VoiceError>;

    fn is_recording(&self) -> bool;
}

struct Session {
    child: Child,
    output: NamedTempFile,
}

/// Records through an external ffmpeg-style process writing webm to a
/// temporary file. Stopping sends `q` on stdin so the process flushes and
/// finalizes the container before the file is read.
pub struct FfmpegRecorder {
    program: String,
    args: Vec<String>,
    session: Option<Session>,
}

impl FfmpegRecorder {
    /// Build from a whitespace-separated command line containing `{output}`
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            session: None,
        })
    }

    /// Default capture command for this platform
    pub fn default_command_line() -> &'static str {
        if cfg!(target_os = "macos") {
            "ffmpeg -y -loglevel error -f avfoundation -i :0 -c:a libopus -f webm {output}"
        } else {
            "ffmpeg -y -loglevel error -f pulse -i default -c:a libopus -f webm {output}"
        }
    }

    fn resolved_args(&self, output: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, output))
            .collect()
    }
}

impl AudioCapture for FfmpegRecorder {
    fn start(&mut self) -> Result<(), VoiceError> {
        if self.session.is_some() {
            return Err(VoiceError::AlreadyRecording);
        }

        let output = tempfile::Builder::new()
            .prefix("taskipin-")
            .suffix(".webm")
            .tempfile()
            .map_err(VoiceError::Microphone)?;
        let args = self.resolved_args(&output.path().to_string_lossy());

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                warn!(error = %e, program = %self.program, "failed to start recorder");
                VoiceError::Microphone(e)
            })?;

        debug!(program = %self.program, "recording started");
        self.session = Some(Session { child, output });
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<u8>, VoiceError> {
        let Some(mut session) = self.session.take() else {
            return Err(VoiceError::NotRecording);
        };

        if let Some(mut stdin) = session.child.stdin.take() {
            // The recorder may already have exited; its output still counts
            let _ = stdin.write_all(b"q");
        }
        let status = session.child.wait().map_err(VoiceError::Microphone)?;
        if !status.success() {
            warn!(%status, "recorder exited unsuccessfully");
        }

        let audio = fs::read(session.output.path()).map_err(VoiceError::Microphone)?;
        debug!(bytes = audio.len(), "recording stopped");
        if audio.is_empty() {
            if status.success() {
                return Err(VoiceError::NoAudio);
            }
            return Err(VoiceError::Microphone(io::Error::new(
                io::ErrorKind::Other,
                format!("recorder exited with {status}"),
            )));
        }
        Ok(audio)
    }

    fn is_recording(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.child.kill();
            let _ = session.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_parsing() {
        let recorder = FfmpegRecorder::from_command_line("rec -q {output} trim 0 5").unwrap();
        assert_eq!(recorder.program, "rec");
        assert_eq!(
            recorder.resolved_args("/tmp/a.webm"),
            vec!["-q", "/tmp/a.webm", "trim", "0", "5"]
        );
        assert!(FfmpegRecorder::from_command_line("   ").is_none());
    }

    #[test]
    fn test_default_command_writes_webm() {
        let line = FfmpegRecorder::default_command_line();
        assert!(line.contains(OUTPUT_PLACEHOLDER));
        assert!(line.contains("webm"));
    }

    #[test]
    fn test_missing_program_is_microphone_error() {
        let mut recorder =
            FfmpegRecorder::from_command_line("taskipin-no-such-recorder {output}").unwrap();
        let err = recorder.start().unwrap_err();
        assert!(matches!(err, VoiceError::Microphone(_)));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_stop_without_start() {
        let mut recorder = FfmpegRecorder::from_command_line("ffmpeg {output}").unwrap();
        assert!(matches!(recorder.stop(), Err(VoiceError::NotRecording)));
    }

    #[cfg(unix)]
    #[test]
    fn test_records_output_of_process() {
        // `sh -c` writes a fake clip into the output path, then waits for stdin
        let mut recorder = FfmpegRecorder {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "printf webmdata > \"$0\"; cat > /dev/null".to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
            ],
            session: None,
        };

        recorder.start().unwrap();
        assert!(recorder.is_recording());
        assert!(matches!(recorder.start(), Err(VoiceError::AlreadyRecording)));

        let audio = recorder.stop().unwrap();
        assert_eq!(audio, b"webmdata");
        assert!(!recorder.is_recording());
    }
}
