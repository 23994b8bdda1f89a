use super::intent::{parse_intent, VoiceCommand, SYSTEM_PROMPT};
use super::{VoiceError, PARSE_FAILED, TRANSCRIPTION_FAILED};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1/";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const CHAT_MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.3;

/// External transcription + intent-parsing service
pub trait SpeechApi: Send + Sync {
    /// Turn a webm audio clip into text
    fn transcribe(&self, audio: Vec<u8>) -> Result<String, VoiceError>;

    /// Classify a transcript into a command
    fn parse_command(&self, transcript: &str) -> Result<VoiceCommand, VoiceError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

/// Extract `error.message` from an error response body
pub fn remote_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.is_empty())
}

/// Message to surface for a non-success response
fn failure_message(res: Response, fallback: &str) -> String {
    let status = res.status();
    let body = res.text().unwrap_or_default();
    warn!(%status, "speech api request failed");
    remote_error_message(&body).unwrap_or_else(|| fallback.to_string())
}

/// Client for an OpenAI-compatible API
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str, fallback: &str) -> Result<Url, String> {
        self.base_url.join(path).map_err(|e| {
            warn!(error = %e, path, "invalid api url");
            fallback.to_string()
        })
    }
}

impl SpeechApi for OpenAiClient {
    fn transcribe(&self, audio: Vec<u8>) -> Result<String, VoiceError> {
        let url = self
            .endpoint("audio/transcriptions", TRANSCRIPTION_FAILED)
            .map_err(VoiceError::Transcription)?;

        let file = multipart::Part::bytes(audio)
            .file_name("audio.webm")
            .mime_str("audio/webm")
            .map_err(|e| {
                warn!(error = %e, "invalid audio mime type");
                VoiceError::Transcription(TRANSCRIPTION_FAILED.to_string())
            })?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("model", TRANSCRIPTION_MODEL);

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| {
                warn!(error = %e, "transcription request failed");
                VoiceError::Transcription(TRANSCRIPTION_FAILED.to_string())
            })?;

        if !res.status().is_success() {
            return Err(VoiceError::Transcription(failure_message(res, TRANSCRIPTION_FAILED)));
        }

        let body: TranscriptionResponse = res.json().map_err(|e| {
            warn!(error = %e, "unexpected transcription response");
            VoiceError::Transcription(TRANSCRIPTION_FAILED.to_string())
        })?;
        debug!(chars = body.text.len(), "transcribed audio");
        Ok(body.text)
    }

    fn parse_command(&self, transcript: &str) -> Result<VoiceCommand, VoiceError> {
        let url = self
            .endpoint("chat/completions", PARSE_FAILED)
            .map_err(VoiceError::IntentParsing)?;

        let request = ChatRequest {
            model: CHAT_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(transcript.to_string()),
                },
            ],
            temperature: TEMPERATURE,
        };

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                warn!(error = %e, "intent request failed");
                VoiceError::IntentParsing(PARSE_FAILED.to_string())
            })?;

        if !res.status().is_success() {
            return Err(VoiceError::IntentParsing(failure_message(res, PARSE_FAILED)));
        }

        let body: ChatResponse = res.json().map_err(|e| {
            warn!(error = %e, "unexpected intent response");
            VoiceError::IntentParsing(PARSE_FAILED.to_string())
        })?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VoiceError::IntentParsing(PARSE_FAILED.to_string()))?;

        Ok(parse_intent(&content))
    }
}
