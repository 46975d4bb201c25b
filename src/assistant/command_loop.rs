use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dialog::InteractionGate;
use crate::dispatch::{ActionRouter, RouteOutcome};
use crate::intent::{ActionId, IntentMatcher};
use crate::logbook::CommandLog;
use crate::services::{LanguageModelClient, Speaker, Transcriber};

const FOLLOW_UP_PROMPTS: &[&str] = &[
    "What do you want me to do next?",
    "Anything else?",
    "What's the next task?",
];

/// How long the loop sleeps between gate checks while a clarification
/// dialog owns the conversation.
const GATE_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
enum JobKind {
    Dispatch(ActionId),
    AiFallback,
}

/// A recognized command, logged and ready to execute on a background task.
#[derive(Debug, Clone)]
struct Job {
    command: String,
    kind: JobKind,
}

/// Outer driver: obtain an utterance, classify it, dispatch it in the
/// background, keep listening. Terminates only on `stop_assistant`.
#[derive(Clone)]
pub struct CommandLoop {
    matcher: Arc<IntentMatcher>,
    router: Arc<ActionRouter>,
    transcriber: Arc<dyn Transcriber>,
    speaker: Arc<dyn Speaker>,
    llm: Arc<dyn LanguageModelClient>,
    log: Arc<CommandLog>,
    gate: InteractionGate,
    cancel: CancellationToken,
    listen_timeout: Duration,
    phrase_time_limit: Duration,
}

impl CommandLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        matcher: Arc<IntentMatcher>,
        router: Arc<ActionRouter>,
        transcriber: Arc<dyn Transcriber>,
        speaker: Arc<dyn Speaker>,
        llm: Arc<dyn LanguageModelClient>,
        log: Arc<CommandLog>,
        gate: InteractionGate,
        listen_timeout: Duration,
        phrase_time_limit: Duration,
    ) -> Self {
        Self {
            matcher,
            router,
            transcriber,
            speaker,
            llm,
            log,
            gate,
            cancel: CancellationToken::new(),
            listen_timeout,
            phrase_time_limit,
        }
    }

    /// Token cancelled when `stop_assistant` runs. In-flight background
    /// handlers are not aborted; only the loop observes it.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process one command end to end. Used by the single-shot text mode
    /// and by the loops below (which run it on a detached task).
    pub async fn handle_command(&self, raw: &str) {
        if let Some(job) = self.prepare(raw) {
            self.execute(job).await;
        }
    }

    /// Voice loop: wait for one utterance, classify + log, dispatch in the
    /// background, continue. Defers listening entirely while the
    /// interaction gate is held.
    pub async fn run_voice(&self) {
        info!(
            "voice loop started (engine: {})",
            self.transcriber.engine_name()
        );
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            if self.gate.is_held() {
                tokio::time::sleep(GATE_POLL).await;
                continue;
            }

            let heard = tokio::select! {
                _ = self.cancel.cancelled() => break,
                heard = self.transcriber.listen(self.listen_timeout, self.phrase_time_limit) => heard,
            };

            match heard {
                Ok(Some(text)) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    // The gate may have been raised while we were capturing;
                    // that utterance belongs to the dialog, not to us.
                    if self.gate.is_held() {
                        debug!("discarding utterance captured during clarification");
                        continue;
                    }
                    self.spawn_job(&text);
                }
                Ok(None) => debug!("no input detected before listen timeout"),
                Err(e) => {
                    warn!("listen failed: {e}");
                    self.speaker.speak("Sorry, I didn't understand. Try rephrasing.");
                }
            }
        }
        info!("command loop terminated");
    }

    /// Typed REPL on stdin. Commands run on background tasks just like
    /// spoken ones so a slow handler never blocks the prompt.
    pub async fn run_interactive_text(&self) {
        self.run_text_repl(BufReader::new(tokio::io::stdin())).await;
    }

    /// REPL over any line source; `run_interactive_text` wires stdin in.
    pub async fn run_text_repl<R>(&self, reader: R)
    where
        R: AsyncBufRead + Unpin,
    {
        println!("Interactive text mode. Type 'exit' to quit.");
        let mut lines = reader.lines();
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            print!("> ");
            let _ = std::io::stdout().flush();
            let line = tokio::select! {
                _ = self.cancel.cancelled() => break,
                line = lines.next_line() => line,
            };
            match line {
                Ok(Some(input)) => {
                    let input = input.trim().to_string();
                    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                        break;
                    }
                    println!("Processing...");
                    self.spawn_job(&input);
                }
                Ok(None) => break, // stdin closed
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
        info!("interactive text mode terminated");
    }

    fn spawn_job(&self, raw: &str) {
        if let Some(job) = self.prepare(raw) {
            let runner = self.clone();
            tokio::spawn(async move { runner.execute(job).await });
        }
    }

    /// Recognition phase, run synchronously so log entries land in the
    /// order commands were recognized, not the order handlers finish.
    fn prepare(&self, raw: &str) -> Option<Job> {
        let command = raw.trim();
        if command.is_empty() {
            self.speaker.speak("No input detected. Please try again.");
            self.log_entry(command, "no_input");
            self.follow_up();
            return None;
        }
        let kind = match self.matcher.resolve(command) {
            Some(action) => {
                self.log_entry(command, action.tag());
                JobKind::Dispatch(action)
            }
            None => JobKind::AiFallback,
        };
        Some(Job {
            command: command.to_string(),
            kind,
        })
    }

    async fn execute(&self, job: Job) {
        match job.kind {
            JobKind::Dispatch(action) => match self.router.route(action, &job.command).await {
                RouteOutcome::Handled(message) => {
                    debug!("handled '{}': {message}", job.command);
                    self.follow_up();
                }
                RouteOutcome::Stop(farewell) => {
                    self.speaker.speak(&farewell);
                    self.cancel.cancel();
                }
            },
            JobKind::AiFallback => {
                // The fallback tag depends on the outcome, so this entry is
                // logged here rather than at recognition time.
                match self.llm.ask(&job.command).await {
                    Ok(answer) => {
                        self.speaker.speak(&answer);
                        self.log_entry(&job.command, "ai_fallback");
                    }
                    Err(e) => {
                        warn!("ai fallback failed: {e}");
                        self.speaker.speak("Sorry, I didn't understand. Try rephrasing.");
                        self.log_entry(&job.command, &format!("unknown_action: {e}"));
                    }
                }
                self.follow_up();
            }
        }
    }

    fn follow_up(&self) {
        // A clarification dialog owns the conversation; no prompting over it.
        if self.gate.is_held() {
            return;
        }
        if let Some(prompt) = FOLLOW_UP_PROMPTS.choose(&mut rand::thread_rng()) {
            self.speaker.speak(prompt);
        }
    }

    fn log_entry(&self, command: &str, tag: &str) {
        if let Err(e) = self.log.append(command, tag) {
            warn!("command log append failed: {e}");
        }
    }
}
