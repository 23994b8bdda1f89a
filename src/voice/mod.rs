//! Voice command path: record audio, transcribe it, classify the transcript
//! into an intent and apply that intent to the task store.

pub mod bridge;
pub mod client;
pub mod intent;
pub mod recorder;

use thiserror::Error;

pub use bridge::{apply_command, process_audio, VoiceBridge, VoiceOutcome, VoiceRound, VoiceStatus};
pub use client::{OpenAiClient, SpeechApi};
pub use intent::{parse_intent, VoiceAction, VoiceCommand};
pub use recorder::{AudioCapture, FfmpegRecorder};

pub const TRANSCRIPTION_FAILED: &str = "Failed to transcribe audio";
pub const PARSE_FAILED: &str = "Failed to parse command";

/// User-facing failures of the voice path
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Please set your OpenAI API key in settings")]
    MissingApiKey,

    #[error("Failed to access microphone")]
    Microphone(#[source] std::io::Error),

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("Still processing the previous command")]
    Busy,

    #[error("No audio was captured")]
    NoAudio,

    /// Remote message verbatim, or the generic transcription failure
    #[error("{0}")]
    Transcription(String),

    /// Remote message verbatim, or the generic parse failure
    #[error("{0}")]
    IntentParsing(String),

    #[error("Failed to process audio")]
    Processing,
}
