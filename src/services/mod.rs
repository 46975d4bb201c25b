pub mod actions;
pub mod llm;
pub mod speaker;
pub mod transcriber;

pub use actions::{
    BrightnessControl, DesktopActions, MediaControl, OsActions, VolumeControl, WindowControl,
};
pub use llm::{GeminiClient, LanguageModelClient};
pub use speaker::{ConsoleSpeaker, Speaker};
pub use transcriber::{StdinTranscriber, Transcriber};
