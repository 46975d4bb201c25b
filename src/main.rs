use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jarvo::assistant::CommandLoop;
use jarvo::config::Config;
use jarvo::dialog::{ClarificationDialog, InteractionGate};
use jarvo::dispatch::ActionRouter;
use jarvo::intent::IntentMatcher;
use jarvo::logbook::CommandLog;
use jarvo::services::{
    ConsoleSpeaker, DesktopActions, GeminiClient, LanguageModelClient, OsActions, Speaker,
    StdinTranscriber, Transcriber,
};

/// Jarvo assistant entrypoint.
#[derive(Parser, Debug)]
#[command(name = "jarvo", about = "Desktop voice assistant")]
struct Args {
    /// Run a single typed command and exit
    #[arg(long)]
    text: Option<String>,

    /// Run in interactive text mode
    #[arg(long)]
    interactive_text: bool,

    /// List available microphones and exit
    #[arg(long)]
    list_mics: bool,

    /// Microphone device index to use
    #[arg(long)]
    mic: Option<usize>,

    /// Use wake word detection mode
    #[arg(long)]
    wake_word: bool,

    /// Direct listening without wake word
    #[arg(long)]
    direct: bool,

    /// Show current STT engine and microphone info
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if args.wake_word {
        config.wake_word_enabled = true;
    }
    if args.direct {
        config.wake_word_enabled = false;
    }

    let transcriber: Arc<dyn Transcriber> = Arc::new(StdinTranscriber::new());
    let speaker: Arc<dyn Speaker> = Arc::new(ConsoleSpeaker);
    let llm: Arc<dyn LanguageModelClient> = Arc::new(GeminiClient::new(&config));
    let os: Arc<dyn OsActions> = Arc::new(DesktopActions::new());

    if args.list_mics {
        let devices = transcriber.input_devices();
        if devices.is_empty() {
            println!("No microphones found.");
        } else {
            for (idx, name) in devices.iter().enumerate() {
                println!("[{idx}] {name}");
            }
        }
        return Ok(());
    }

    if let Some(index) = args.mic {
        if let Err(e) = transcriber.select_input(index) {
            tracing::warn!("could not select microphone {index}: {e}");
        }
    }

    if args.status {
        println!("Current STT Engine: {}", transcriber.engine_name());
        println!("Available microphones:");
        for (idx, name) in transcriber.input_devices().iter().enumerate() {
            println!("  [{idx}] {name}");
        }
        return Ok(());
    }

    let gate = InteractionGate::new();
    let dialog = ClarificationDialog::new(
        Arc::clone(&transcriber),
        Arc::clone(&speaker),
        gate.clone(),
        config.listen_timeout,
        config.phrase_time_limit,
    );
    let router = Arc::new(ActionRouter::new(
        Arc::clone(&os),
        Arc::clone(&llm),
        Arc::clone(&speaker),
        dialog,
    ));
    let matcher = Arc::new(IntentMatcher::standard());
    let log = Arc::new(CommandLog::open(&config.command_log_path)?);

    let command_loop = CommandLoop::new(
        matcher,
        router,
        Arc::clone(&transcriber),
        Arc::clone(&speaker),
        llm,
        log,
        gate,
        config.listen_timeout,
        config.phrase_time_limit,
    );

    if let Some(text) = args.text {
        println!("Processing typed command...");
        command_loop.handle_command(&text).await;
        return Ok(());
    }

    if args.interactive_text {
        command_loop.run_interactive_text().await;
        return Ok(());
    }

    if config.wake_word_enabled {
        println!("Starting wake word mode. Say 'Jarvo' to activate...");
    } else {
        println!("Starting direct listening mode...");
    }
    command_loop.run_voice().await;
    Ok(())
}
