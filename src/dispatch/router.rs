use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dialog::ClarificationDialog;
use crate::intent::ActionId;
use crate::services::{
    BrightnessControl, LanguageModelClient, MediaControl, OsActions, Speaker, VolumeControl,
    WindowControl,
};

use super::params::{self, StatKind};

const JOKES: &[&str] = &[
    "Why don't skeletons fight each other? They don't have the guts.",
    "I have a stepladder because my real ladder left when I was a kid.",
    "Why don't graveyards ever get overcrowded? People are dying to get in.",
    "My boss told me to have a good day, so I went home.",
    "Why don't cannibals eat clowns? Because they taste funny.",
    "I'm great at multitasking. I can waste time, be unproductive, and procrastinate all at once.",
    "Why did the scarecrow win an award? Because he was outstanding in his field.",
    "Parallel lines have so much in common. It's a shame they'll never meet.",
    "I threw a boomerang a few years ago. I now live in constant fear.",
    "I asked my date to meet me at the gym, but she never showed up. I guess the two of us aren't going to work out.",
];

/// How a routed action resolved. `Stop` is the one distinguishable exit:
/// the loop speaks the farewell and terminates instead of continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Handled(String),
    Stop(String),
}

/// Maps an action to a concrete handler invocation. Owns the parameter
/// extraction over the raw command text; every collaborator failure is
/// caught here and turned into a descriptive result message, so `route`
/// itself never fails.
pub struct ActionRouter {
    os: Arc<dyn OsActions>,
    llm: Arc<dyn LanguageModelClient>,
    speaker: Arc<dyn Speaker>,
    dialog: ClarificationDialog,
}

impl ActionRouter {
    pub fn new(
        os: Arc<dyn OsActions>,
        llm: Arc<dyn LanguageModelClient>,
        speaker: Arc<dyn Speaker>,
        dialog: ClarificationDialog,
    ) -> Self {
        Self {
            os,
            llm,
            speaker,
            dialog,
        }
    }

    pub async fn route(&self, action: ActionId, command: &str) -> RouteOutcome {
        let dispatch_id = Uuid::new_v4();
        info!(%dispatch_id, action = action.tag(), "dispatching command");

        match action {
            ActionId::StopAssistant => {
                RouteOutcome::Stop("Okay, stopping now. Goodbye!".to_string())
            }

            ActionId::IncreaseVolume => {
                self.done(self.unwrap_or_failure(self.os.volume(VolumeControl::Up).await, "Error controlling volume"))
            }
            ActionId::DecreaseVolume => {
                self.done(self.unwrap_or_failure(self.os.volume(VolumeControl::Down).await, "Error controlling volume"))
            }
            ActionId::MuteAudio => {
                self.done(self.unwrap_or_failure(self.os.volume(VolumeControl::Mute).await, "Error controlling volume"))
            }

            ActionId::OpenApp => {
                let name = params::app_name(command);
                let message = match self.os.open_app(&name).await {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(%dispatch_id, "open_app failed: {e}");
                        format!("Failed to open {name}.")
                    }
                };
                self.done(message)
            }
            ActionId::CloseApp => {
                let name = params::app_name(command);
                let message = match self.os.close_app(&name).await {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(%dispatch_id, "close_app failed: {e}");
                        format!("Failed to close {name}.")
                    }
                };
                self.done(message)
            }

            ActionId::SetTimer => {
                let seconds = params::timer_seconds(command);
                let speaker = Arc::clone(&self.speaker);
                // Fire-and-forget: nothing awaits this, so the completion
                // announcement is the task's own responsibility.
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(seconds)).await;
                    speaker.speak("Timer finished!");
                });
                self.done(format!("Timer set for {seconds} seconds."))
            }

            ActionId::TellJoke => {
                let joke = JOKES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or("I'm out of jokes.");
                self.done(joke.to_string())
            }
            ActionId::TellTime => {
                self.done(format!("The time is {}", Local::now().format("%I:%M %p")))
            }
            ActionId::TellDate => {
                self.done(format!("Today is {}", Local::now().format("%A, %B %d, %Y")))
            }
            ActionId::GetIp => {
                let message = match self.os.local_ip().await {
                    Ok(ip) => format!("Your IP address is {ip}"),
                    Err(e) => {
                        warn!(%dispatch_id, "local_ip failed: {e}");
                        "Could not determine your IP address.".to_string()
                    }
                };
                self.done(message)
            }

            ActionId::GenerateCode => self.generate_code(command).await,

            ActionId::AskAi => {
                let message = match self.llm.ask(command).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!(%dispatch_id, "ask_ai failed: {e}");
                        "Sorry, I couldn't process that question right now.".to_string()
                    }
                };
                self.done(message)
            }

            ActionId::PlayYoutube => match params::youtube_query(command) {
                Some(query) => {
                    let url = format!(
                        "https://www.youtube.com/results?search_query={}",
                        query.replace(' ', "+")
                    );
                    let message = match self.os.open_url(&url).await {
                        Ok(_) => format!("Playing {query} on YouTube"),
                        Err(e) => {
                            warn!(%dispatch_id, "open_url failed: {e}");
                            format!("Failed to play {query} on YouTube.")
                        }
                    };
                    self.done(message)
                }
                // Bare "play": treat as plain media resume, not a search.
                None => {
                    let message = match self.os.media(MediaControl::PlayPause).await {
                        Ok(_) => "Resumed playback.".to_string(),
                        Err(e) => {
                            warn!(%dispatch_id, "media control failed: {e}");
                            "Error controlling media.".to_string()
                        }
                    };
                    self.done(message)
                }
            },

            ActionId::MediaPlayPause => {
                self.done(self.unwrap_or_failure(self.os.media(MediaControl::PlayPause).await, "Error controlling media"))
            }
            ActionId::MediaNext => {
                self.done(self.unwrap_or_failure(self.os.media(MediaControl::Next).await, "Error controlling media"))
            }
            ActionId::MediaPrev => {
                self.done(self.unwrap_or_failure(self.os.media(MediaControl::Prev).await, "Error controlling media"))
            }

            ActionId::SystemLock => {
                self.done(self.unwrap_or_failure(self.os.lock_screen().await, "Error locking screen"))
            }
            ActionId::SystemBrightnessUp => {
                self.done(self.unwrap_or_failure(
                    self.os.brightness(BrightnessControl::Up).await,
                    "Failed to adjust brightness",
                ))
            }
            ActionId::SystemBrightnessDown => {
                self.done(self.unwrap_or_failure(
                    self.os.brightness(BrightnessControl::Down).await,
                    "Failed to adjust brightness",
                ))
            }
            ActionId::SystemRecycleBin => {
                self.done(self.unwrap_or_failure(self.os.empty_recycle_bin().await, "Error emptying recycle bin"))
            }
            ActionId::SystemStats => {
                let kind = StatKind::from_command(command);
                self.done(self.unwrap_or_failure(self.os.system_stats(kind).await, "Error getting stats"))
            }
            ActionId::WindowMinimize => {
                self.done(self.unwrap_or_failure(
                    self.os.window(WindowControl::MinimizeAll).await,
                    "Error managing windows",
                ))
            }
            ActionId::WindowSwitch => {
                self.done(self.unwrap_or_failure(
                    self.os.window(WindowControl::Switch).await,
                    "Error managing windows",
                ))
            }

            ActionId::UtilityCoin => {
                let result = if rand::random::<bool>() { "Heads" } else { "Tails" };
                self.done(format!("It's {result}!"))
            }
            ActionId::UtilityDice => {
                let roll = rand::thread_rng().gen_range(1..=6);
                self.done(format!("You rolled a {roll}."))
            }
        }
    }

    /// Code generation needs follow-up parameters, so the whole exchange
    /// runs under the interaction gate: the main loop must not listen while
    /// the questions are being asked.
    async fn generate_code(&self, command: &str) -> RouteOutcome {
        let Some(prompt) = params::code_prompt(command) else {
            self.speaker.speak("What should I generate code for?");
            return RouteOutcome::Handled("No prompt provided for code generation.".to_string());
        };

        let (language, filename, extra) = {
            let _session = self.dialog.begin();
            let language = self
                .dialog
                .ask_with_default(
                    "Which programming language should I use? You can say Python, JavaScript, or something else.",
                    "Python",
                )
                .await;
            let filename = self
                .dialog
                .ask_with_default(
                    "What file name should I save it as? You can say for example generated_code dot py.",
                    &params::default_filename(&language),
                )
                .await;
            let extra = self
                .dialog
                .ask_optional("Any extra requirements? For example libraries to use or constraints.")
                .await;
            (language, filename, extra)
        };

        let full_prompt = match extra {
            Some(extra) => format!("{prompt}. Additional requirements: {extra}."),
            None => prompt,
        };

        let message = match self.llm.generate_code(&full_prompt, &language, &filename).await {
            Ok(message) => message,
            Err(e) => {
                warn!("code generation failed: {e}");
                format!("Code generation failed: {e}")
            }
        };
        self.done(message)
    }

    fn unwrap_or_failure(&self, result: anyhow::Result<String>, context: &str) -> String {
        match result {
            Ok(message) => message,
            Err(e) => {
                warn!("{context}: {e}");
                format!("{context}: {e}")
            }
        }
    }

    fn done(&self, message: String) -> RouteOutcome {
        self.speaker.speak(&message);
        RouteOutcome::Handled(message)
    }
}
