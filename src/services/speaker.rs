use tracing::debug;

/// Text-to-speech output seam. `speak` is fire-and-forget: implementations
/// must return as soon as the utterance is enqueued.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

/// Default output when no TTS engine is wired in: print the line and, where
/// a system `say` binary exists, hand it off without waiting.
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str) {
        println!("[JARVO] {text}");
        debug!("speak: {text}");
        // Best effort; the spoken line is already on the console.
        let _ = tokio::process::Command::new("say")
            .arg(text)
            .kill_on_drop(false)
            .spawn();
    }
}
