use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

/// One-utterance speech capture. The real speech stack lives outside this
/// crate; the loop only needs "wait up to `timeout` for some text".
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Wait for one utterance. `Ok(None)` means nothing was heard before
    /// the timeout, which is not an error.
    async fn listen(
        &self,
        timeout: Duration,
        phrase_time_limit: Duration,
    ) -> Result<Option<String>>;

    /// Names of selectable input devices, if the backend has any.
    fn input_devices(&self) -> Vec<String> {
        Vec::new()
    }

    fn select_input(&self, _index: usize) -> Result<()> {
        Err(anyhow!("this transcriber has no selectable input devices"))
    }

    fn engine_name(&self) -> &str;
}

/// Line-at-a-time stand-in for the microphone stack, used when no speech
/// backend is wired in. Reads one line from stdin per listen, bounded by
/// the listen timeout.
pub struct StdinTranscriber {
    reader: Mutex<tokio::io::Lines<BufReader<tokio::io::Stdin>>>,
}

impl StdinTranscriber {
    pub fn new() -> Self {
        Self {
            reader: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for StdinTranscriber {
    async fn listen(
        &self,
        timeout: Duration,
        _phrase_time_limit: Duration,
    ) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        match tokio::time::timeout(timeout, reader.next_line()).await {
            Ok(Ok(Some(line))) => Ok(Some(line)),
            Ok(Ok(None)) => Ok(None), // stdin closed
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(None), // timeout: no input detected
        }
    }

    fn engine_name(&self) -> &str {
        "typed"
    }
}
