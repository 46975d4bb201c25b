//! Multi-turn clarification support.
//!
//! The gate is the ONLY mutable state shared between the command loop and a
//! running dialog. While it is held the loop must not start a new listen, or
//! two consumers would fight over the microphone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::services::{Speaker, Transcriber};

/// Process-wide "a clarification dialog owns the conversation" flag.
///
/// Acquisition is scoped: `hold()` returns a guard that clears the flag on
/// drop, so every exit path (including panics inside the dialog) releases
/// the gate.
#[derive(Debug, Clone, Default)]
pub struct InteractionGate {
    held: Arc<AtomicBool>,
}

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    pub fn hold(&self) -> GateGuard {
        if self
            .held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Invariant: at most one dialog at a time. A second holder means
            // a routing bug upstream, but we still guard rather than poison.
            warn!("interaction gate acquired while already held");
        }
        GateGuard {
            held: Arc::clone(&self.held),
        }
    }
}

pub struct GateGuard {
    held: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::SeqCst);
    }
}

/// Ask/answer protocol for handlers that need follow-up parameters.
///
/// Callers wrap the whole exchange in `begin()` so the command loop defers
/// new listens for the duration.
pub struct ClarificationDialog {
    transcriber: Arc<dyn Transcriber>,
    speaker: Arc<dyn Speaker>,
    gate: InteractionGate,
    listen_timeout: Duration,
    phrase_time_limit: Duration,
}

impl ClarificationDialog {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        speaker: Arc<dyn Speaker>,
        gate: InteractionGate,
        listen_timeout: Duration,
        phrase_time_limit: Duration,
    ) -> Self {
        Self {
            transcriber,
            speaker,
            gate,
            listen_timeout,
            phrase_time_limit,
        }
    }

    /// Take the gate for the lifetime of the returned guard.
    pub fn begin(&self) -> GateGuard {
        self.gate.hold()
    }

    /// Ask and listen, retrying once on silence. Exactly two attempts; the
    /// caller's default is returned if both come back empty.
    pub async fn ask_with_default(&self, question: &str, default_answer: &str) -> String {
        for _ in 0..2 {
            self.speaker.speak(question);
            if let Some(answer) = self.listen_once().await {
                return answer;
            }
        }
        default_answer.to_string()
    }

    /// Ask and listen once; silence means the caller gets nothing.
    pub async fn ask_optional(&self, question: &str) -> Option<String> {
        self.speaker.speak(question);
        self.listen_once().await
    }

    async fn listen_once(&self) -> Option<String> {
        match self
            .transcriber
            .listen(self.listen_timeout, self.phrase_time_limit)
            .await
        {
            Ok(Some(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!("clarification listen failed: {e}");
                None
            }
        }
    }
}
