use super::client::SpeechApi;
use super::intent::{VoiceAction, VoiceCommand};
use super::recorder::AudioCapture;
use super::VoiceError;
use crate::store::TaskStore;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    Idle,
    Listening,
    Processing,
}

/// Result of one transcription + intent round trip
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRound {
    pub transcript: String,
    pub command: VoiceCommand,
}

/// What applying a command did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    TaskCreated(String),
    TaskCompleted(String),
    TaskDeleted(String),
    GroupCreated(String),
    NoMatch,
    Ignored,
}

/// Transcribe then classify, strictly in that order
pub fn process_audio(api: &dyn SpeechApi, audio: Vec<u8>) -> Result<VoiceRound, VoiceError> {
    let transcript = api.transcribe(audio)?;
    let command = api.parse_command(&transcript)?;
    Ok(VoiceRound { transcript, command })
}

/// Map a parsed intent onto store operations
pub fn apply_command(store: &mut TaskStore, command: &VoiceCommand) -> VoiceOutcome {
    let title = command
        .task_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match command.action {
        VoiceAction::Create => {
            let Some(title) = title else {
                return VoiceOutcome::Ignored;
            };
            match store.add_task(title, command.task_description.as_deref(), None) {
                Some(_) => VoiceOutcome::TaskCreated(title.to_string()),
                None => VoiceOutcome::Ignored,
            }
        }
        VoiceAction::Complete => {
            let Some(needle) = title else {
                return VoiceOutcome::Ignored;
            };
            let found = store
                .tasks()
                .iter()
                .find(|t| !t.completed && t.title_contains(needle))
                .map(|t| (t.id.clone(), t.title.clone()));
            match found {
                Some((id, title)) => {
                    store.complete_task(&id);
                    VoiceOutcome::TaskCompleted(title)
                }
                None => VoiceOutcome::NoMatch,
            }
        }
        VoiceAction::Delete => {
            let Some(needle) = title else {
                return VoiceOutcome::Ignored;
            };
            let found = store
                .tasks()
                .iter()
                .find(|t| t.title_contains(needle))
                .map(|t| (t.id.clone(), t.title.clone()));
            match found {
                Some((id, title)) => {
                    store.delete_task(&id);
                    VoiceOutcome::TaskDeleted(title)
                }
                None => VoiceOutcome::NoMatch,
            }
        }
        VoiceAction::CreateGroup => {
            let Some(name) = command.group_name.as_deref() else {
                return VoiceOutcome::Ignored;
            };
            match store.add_group(name, None) {
                Some(_) => VoiceOutcome::GroupCreated(name.trim().to_string()),
                None => VoiceOutcome::Ignored,
            }
        }
        VoiceAction::Update | VoiceAction::Unknown => VoiceOutcome::Ignored,
    }
}

/// One capture session at a time, processed off the UI thread.
///
/// The round trip runs on a worker thread; its result comes back through a
/// channel that the event loop drains with [`VoiceBridge::poll`], so store
/// mutations stay on the caller's thread.
pub struct VoiceBridge {
    capture: Box<dyn AudioCapture>,
    pending: Option<Receiver<Result<VoiceRound, VoiceError>>>,
}

impl VoiceBridge {
    pub fn new(capture: Box<dyn AudioCapture>) -> Self {
        Self {
            capture,
            pending: None,
        }
    }

    pub fn status(&self) -> VoiceStatus {
        if self.capture.is_recording() {
            VoiceStatus::Listening
        } else if self.pending.is_some() {
            VoiceStatus::Processing
        } else {
            VoiceStatus::Idle
        }
    }

    /// Begin capturing. Requires a credential before the microphone is touched.
    pub fn start_recording(&mut self, api_key: &str) -> Result<(), VoiceError> {
        if api_key.trim().is_empty() {
            return Err(VoiceError::MissingApiKey);
        }
        if self.pending.is_some() {
            return Err(VoiceError::Busy);
        }
        if self.capture.is_recording() {
            return Err(VoiceError::AlreadyRecording);
        }
        self.capture.start()?;
        info!("voice recording started");
        Ok(())
    }

    /// Stop capturing and submit everything recorded so far
    pub fn stop_recording(&mut self, api: Arc<dyn SpeechApi>) -> Result<(), VoiceError> {
        if !self.capture.is_recording() {
            return Err(VoiceError::NotRecording);
        }
        let audio = self.capture.stop()?;
        debug!(bytes = audio.len(), "submitting recording");

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = process_audio(api.as_ref(), audio);
            // The receiver is gone only if the app is shutting down
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
        Ok(())
    }

    /// Collect a finished round trip, if any
    pub fn poll(&mut self) -> Option<Result<VoiceRound, VoiceError>> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                if let Err(e) = &result {
                    warn!(error = %e, "voice command failed");
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                warn!("voice worker ended without a result");
                Some(Err(VoiceError::Processing))
            }
        }
    }

    /// Block until the pending round trip finishes
    #[cfg(test)]
    fn wait(&mut self) -> Option<Result<VoiceRound, VoiceError>> {
        let rx = self.pending.take()?;
        Some(rx.recv().unwrap_or(Err(VoiceError::Processing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::voice::intent::parse_intent;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCapture {
        recording: bool,
        starts: usize,
    }

    impl AudioCapture for FakeCapture {
        fn start(&mut self) -> Result<(), VoiceError> {
            self.recording = true;
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) -> Result<Vec<u8>, VoiceError> {
            self.recording = false;
            Ok(b"audio".to_vec())
        }

        fn is_recording(&self) -> bool {
            self.recording
        }
    }

    struct FakeApi {
        transcript: Result<String, String>,
        reply: String,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeApi {
        fn replying(transcript: &str, reply: &str) -> Self {
            Self {
                transcript: Ok(transcript.to_string()),
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl SpeechApi for FakeApi {
        fn transcribe(&self, audio: Vec<u8>) -> Result<String, VoiceError> {
            assert_eq!(audio, b"audio");
            self.calls.lock().unwrap().push("transcribe");
            self.transcript.clone().map_err(VoiceError::Transcription)
        }

        fn parse_command(&self, _transcript: &str) -> Result<VoiceCommand, VoiceError> {
            self.calls.lock().unwrap().push("parse");
            Ok(parse_intent(&self.reply))
        }
    }

    fn create_test_store() -> TaskStore {
        TaskStore::open(Box::new(MemoryStorage::new()))
    }

    fn command(action: VoiceAction, title: Option<&str>) -> VoiceCommand {
        VoiceCommand {
            action,
            task_title: title.map(str::to_string),
            ..VoiceCommand::unknown()
        }
    }

    #[test]
    fn test_missing_api_key_blocks_recording() {
        let mut bridge = VoiceBridge::new(Box::new(FakeCapture::default()));
        let err = bridge.start_recording("  ").unwrap_err();
        assert!(matches!(err, VoiceError::MissingApiKey));
        assert_eq!(bridge.status(), VoiceStatus::Idle);
    }

    #[test]
    fn test_only_one_recording_at_a_time() {
        let mut bridge = VoiceBridge::new(Box::new(FakeCapture::default()));
        bridge.start_recording("sk-test").unwrap();
        assert_eq!(bridge.status(), VoiceStatus::Listening);
        assert!(matches!(
            bridge.start_recording("sk-test"),
            Err(VoiceError::AlreadyRecording)
        ));
    }

    #[test]
    fn test_round_trip_through_worker() {
        let mut bridge = VoiceBridge::new(Box::new(FakeCapture::default()));
        let api = Arc::new(FakeApi::replying(
            "add buy milk",
            r#"{"action":"create","taskTitle":"buy milk"}"#,
        ));

        bridge.start_recording("sk-test").unwrap();
        bridge.stop_recording(api.clone()).unwrap();
        assert!(matches!(bridge.start_recording("sk-test"), Err(VoiceError::Busy)));

        let round = bridge.wait().unwrap().unwrap();
        assert_eq!(round.transcript, "add buy milk");
        assert_eq!(round.command.action, VoiceAction::Create);
        assert_eq!(*api.calls.lock().unwrap(), vec!["transcribe", "parse"]);
        assert_eq!(bridge.status(), VoiceStatus::Idle);
    }

    #[test]
    fn test_transcription_failure_skips_parsing() {
        let api = FakeApi {
            transcript: Err("Invalid file format.".to_string()),
            reply: String::new(),
            calls: Mutex::new(Vec::new()),
        };
        let err = process_audio(&api, b"audio".to_vec()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid file format.");
        assert_eq!(*api.calls.lock().unwrap(), vec!["transcribe"]);
    }

    #[test]
    fn test_stop_without_recording() {
        let mut bridge = VoiceBridge::new(Box::new(FakeCapture::default()));
        let api = Arc::new(FakeApi::replying("", "{}"));
        assert!(matches!(bridge.stop_recording(api), Err(VoiceError::NotRecording)));
        assert!(bridge.poll().is_none());
    }

    #[test]
    fn test_apply_create() {
        let mut store = create_test_store();
        let mut cmd = command(VoiceAction::Create, Some("call mom"));
        cmd.task_description = Some("ask about dinner".to_string());

        let outcome = apply_command(&mut store, &cmd);
        assert_eq!(outcome, VoiceOutcome::TaskCreated("call mom".to_string()));
        assert_eq!(store.tasks()[0].description.as_deref(), Some("ask about dinner"));
        assert_eq!(store.tasks()[0].group_id, None);
    }

    #[test]
    fn test_apply_complete_matches_substring() {
        let mut store = create_test_store();
        store.add_task("Walk dog", None, None);
        let id = store.add_task("Buy milk", None, None).unwrap();

        let outcome = apply_command(&mut store, &command(VoiceAction::Complete, Some("MILK")));
        assert_eq!(outcome, VoiceOutcome::TaskCompleted("Buy milk".to_string()));
        assert!(store.tasks().iter().find(|t| t.id == id).unwrap().completed);
        assert!(!store.tasks()[0].completed);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].task_title, "Buy milk");
    }

    #[test]
    fn test_apply_complete_skips_completed_tasks() {
        let mut store = create_test_store();
        let done = store.add_task("Buy milk", None, None).unwrap();
        store.complete_task(&done);
        let open = store.add_task("Buy milk again", None, None).unwrap();

        apply_command(&mut store, &command(VoiceAction::Complete, Some("milk")));
        assert!(store.tasks().iter().find(|t| t.id == open).unwrap().completed);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_apply_delete_includes_completed() {
        let mut store = create_test_store();
        let done = store.add_task("Old milk", None, None).unwrap();
        store.complete_task(&done);
        store.add_task("Fresh milk", None, None);

        let outcome = apply_command(&mut store, &command(VoiceAction::Delete, Some("milk")));
        assert_eq!(outcome, VoiceOutcome::TaskDeleted("Old milk".to_string()));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].title, "Fresh milk");
    }

    #[test]
    fn test_apply_no_match_is_silent() {
        let mut store = create_test_store();
        store.add_task("Walk dog", None, None);

        assert_eq!(
            apply_command(&mut store, &command(VoiceAction::Complete, Some("milk"))),
            VoiceOutcome::NoMatch
        );
        assert_eq!(
            apply_command(&mut store, &command(VoiceAction::Delete, Some("milk"))),
            VoiceOutcome::NoMatch
        );
        assert_eq!(store.tasks().len(), 1);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_apply_create_group_and_ignored_actions() {
        let mut store = create_test_store();
        let mut cmd = command(VoiceAction::CreateGroup, None);
        cmd.group_name = Some("work tasks".to_string());
        assert_eq!(
            apply_command(&mut store, &cmd),
            VoiceOutcome::GroupCreated("work tasks".to_string())
        );
        assert_eq!(store.groups()[0].name, "work tasks");

        assert_eq!(
            apply_command(&mut store, &command(VoiceAction::Update, Some("work"))),
            VoiceOutcome::Ignored
        );
        assert_eq!(
            apply_command(&mut store, &VoiceCommand::unknown()),
            VoiceOutcome::Ignored
        );
        assert_eq!(
            apply_command(&mut store, &command(VoiceAction::Create, Some("  "))),
            VoiceOutcome::Ignored
        );
        assert!(store.tasks().is_empty());
    }
}
