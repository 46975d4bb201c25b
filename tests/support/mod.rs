//! Scripted collaborator doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use jarvo::dialog::{ClarificationDialog, InteractionGate};
use jarvo::dispatch::params::StatKind;
use jarvo::dispatch::ActionRouter;
use jarvo::intent::IntentMatcher;
use jarvo::logbook::CommandLog;
use jarvo::services::{
    BrightnessControl, LanguageModelClient, MediaControl, OsActions, Speaker, Transcriber,
    VolumeControl, WindowControl,
};
use jarvo::CommandLoop;

/// One scripted listen result.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(&'static str),
    Silence,
    Fail,
}

/// Transcriber that plays back a scripted reply sequence. Optionally
/// records the interaction-gate state at every listen so tests can verify
/// the gate was held while a dialog was asking questions.
pub struct ScriptedTranscriber {
    replies: Mutex<VecDeque<Reply>>,
    pub listens: AtomicUsize,
    observe_gate: Option<InteractionGate>,
    pub gate_states: Mutex<Vec<bool>>,
}

impl ScriptedTranscriber {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            listens: AtomicUsize::new(0),
            observe_gate: None,
            gate_states: Mutex::new(Vec::new()),
        }
    }

    pub fn observing(replies: Vec<Reply>, gate: InteractionGate) -> Self {
        let mut t = Self::new(replies);
        t.observe_gate = Some(gate);
        t
    }

    pub fn listen_count(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn listen(&self, _timeout: Duration, _phrase_limit: Duration) -> Result<Option<String>> {
        self.listens.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.observe_gate {
            self.gate_states.lock().unwrap().push(gate.is_held());
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(Some(text.to_string())),
            Some(Reply::Silence) | None => Ok(None),
            Some(Reply::Fail) => Err(anyhow!("speech backend unavailable")),
        }
    }

    fn engine_name(&self) -> &str {
        "scripted"
    }
}

/// Speaker that records everything it is asked to say.
#[derive(Default)]
pub struct RecordingSpeaker {
    lines: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

/// Language-model double: canned answer or scripted failure. Records
/// generate_code parameters for inspection.
pub struct MockLlm {
    pub answer: Option<&'static str>,
    pub code_requests: Mutex<Vec<(String, String, String)>>,
}

impl MockLlm {
    pub fn answering(answer: &'static str) -> Self {
        Self {
            answer: Some(answer),
            code_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            answer: None,
            code_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModelClient for MockLlm {
    async fn ask(&self, _question: &str) -> Result<String> {
        match self.answer {
            Some(answer) => Ok(answer.to_string()),
            None => Err(anyhow!("backend unreachable")),
        }
    }

    async fn generate_code(&self, prompt: &str, language: &str, filename: &str) -> Result<String> {
        self.code_requests.lock().unwrap().push((
            prompt.to_string(),
            language.to_string(),
            filename.to_string(),
        ));
        match self.answer {
            Some(_) => Ok(format!("Code written to {filename}")),
            None => Err(anyhow!("backend unreachable")),
        }
    }
}

/// OS-action double that records every invocation as a call string.
#[derive(Default)]
pub struct MockOs {
    pub calls: Mutex<Vec<String>>,
    pub fail_all: AtomicBool,
}

impl MockOs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let os = Self::default();
        os.fail_all.store(true, Ordering::SeqCst);
        os
    }

    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, ok: String) -> Result<String> {
        self.calls.lock().unwrap().push(call.clone());
        if self.fail_all.load(Ordering::SeqCst) {
            Err(anyhow!("os action refused: {call}"))
        } else {
            Ok(ok)
        }
    }
}

#[async_trait]
impl OsActions for MockOs {
    async fn open_app(&self, name: &str) -> Result<String> {
        self.record(format!("open_app:{name}"), format!("Opened {name}"))
    }
    async fn close_app(&self, name: &str) -> Result<String> {
        self.record(format!("close_app:{name}"), format!("Closed {name}"))
    }
    async fn volume(&self, control: VolumeControl) -> Result<String> {
        self.record(format!("volume:{control:?}"), "Volume changed.".to_string())
    }
    async fn media(&self, control: MediaControl) -> Result<String> {
        self.record(format!("media:{control:?}"), "Media controlled.".to_string())
    }
    async fn brightness(&self, control: BrightnessControl) -> Result<String> {
        self.record(
            format!("brightness:{control:?}"),
            "Brightness changed.".to_string(),
        )
    }
    async fn lock_screen(&self) -> Result<String> {
        self.record("lock_screen".to_string(), "Locked the screen.".to_string())
    }
    async fn empty_recycle_bin(&self) -> Result<String> {
        self.record(
            "empty_recycle_bin".to_string(),
            "Recycle bin emptied.".to_string(),
        )
    }
    async fn system_stats(&self, kind: StatKind) -> Result<String> {
        self.record(format!("system_stats:{kind:?}"), "Stats read.".to_string())
    }
    async fn window(&self, control: WindowControl) -> Result<String> {
        self.record(format!("window:{control:?}"), "Window managed.".to_string())
    }
    async fn local_ip(&self) -> Result<String> {
        self.record("local_ip".to_string(), "192.168.1.2".to_string())
    }
    async fn open_url(&self, url: &str) -> Result<String> {
        self.record(format!("open_url:{url}"), format!("Opened {url}"))
    }
}

pub const TEST_TIMEOUT: Duration = Duration::from_millis(50);

/// Everything a loop-level test needs to drive the core with doubles.
pub struct Harness {
    pub command_loop: CommandLoop,
    pub speaker: Arc<RecordingSpeaker>,
    pub os: Arc<MockOs>,
    pub gate: InteractionGate,
    pub log_path: std::path::PathBuf,
    _log_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(transcriber: Arc<ScriptedTranscriber>, llm: Arc<MockLlm>) -> Self {
        Self::with_os(transcriber, llm, Arc::new(MockOs::new()))
    }

    pub fn with_os(
        transcriber: Arc<ScriptedTranscriber>,
        llm: Arc<MockLlm>,
        os: Arc<MockOs>,
    ) -> Self {
        let speaker = Arc::new(RecordingSpeaker::new());
        let gate = InteractionGate::new();
        let dialog = ClarificationDialog::new(
            transcriber.clone(),
            speaker.clone(),
            gate.clone(),
            TEST_TIMEOUT,
            TEST_TIMEOUT,
        );
        let router = Arc::new(ActionRouter::new(
            os.clone(),
            llm.clone(),
            speaker.clone(),
            dialog,
        ));
        let log_dir = tempfile::tempdir().expect("tempdir");
        let log_path = log_dir.path().join("command_log.txt");
        let log = Arc::new(CommandLog::open(&log_path).expect("open log"));
        let command_loop = CommandLoop::new(
            Arc::new(IntentMatcher::standard()),
            router,
            transcriber,
            speaker.clone(),
            llm,
            log,
            gate.clone(),
            TEST_TIMEOUT,
            TEST_TIMEOUT,
        );
        Self {
            command_loop,
            speaker,
            os,
            gate,
            log_path,
            _log_dir: log_dir,
        }
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap_or_default()
    }
}
