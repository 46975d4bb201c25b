mod support;

use std::sync::Arc;
use std::time::Duration;

use jarvo::dialog::{ClarificationDialog, InteractionGate};
use jarvo::dispatch::{ActionRouter, RouteOutcome};
use jarvo::intent::ActionId;

use support::{MockLlm, MockOs, RecordingSpeaker, Reply, ScriptedTranscriber, TEST_TIMEOUT};

struct RouterRig {
    router: ActionRouter,
    os: Arc<MockOs>,
    llm: Arc<MockLlm>,
    speaker: Arc<RecordingSpeaker>,
    gate: InteractionGate,
}

fn rig(os: MockOs, llm: MockLlm, replies: Vec<Reply>) -> RouterRig {
    let os = Arc::new(os);
    let llm = Arc::new(llm);
    let speaker = Arc::new(RecordingSpeaker::new());
    let gate = InteractionGate::new();
    let dialog = ClarificationDialog::new(
        Arc::new(ScriptedTranscriber::new(replies)),
        speaker.clone(),
        gate.clone(),
        TEST_TIMEOUT,
        TEST_TIMEOUT,
    );
    let router = ActionRouter::new(os.clone(), llm.clone(), speaker.clone(), dialog);
    RouterRig {
        router,
        os,
        llm,
        speaker,
        gate,
    }
}

fn handled(outcome: RouteOutcome) -> String {
    match outcome {
        RouteOutcome::Handled(message) => message,
        RouteOutcome::Stop(message) => panic!("unexpected stop outcome: {message}"),
    }
}

#[tokio::test]
async fn open_app_extracts_name_through_filler_noise() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    let message = handled(
        rig.router
            .route(ActionId::OpenApp, "open the chrome please")
            .await,
    );

    assert_eq!(rig.os.recorded(), vec!["open_app:chrome".to_string()]);
    assert_eq!(message, "Opened chrome");
}

#[tokio::test]
async fn open_app_failure_degrades_to_message() {
    let rig = rig(MockOs::failing(), MockLlm::unreachable(), vec![]);

    let message = handled(rig.router.route(ActionId::OpenApp, "open notepad").await);

    assert_eq!(message, "Failed to open notepad.");
}

#[tokio::test]
async fn set_timer_extracts_duration_and_returns_immediately() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    let outcome = tokio::time::timeout(
        Duration::from_secs(1),
        rig.router.route(ActionId::SetTimer, "set a timer for 90 seconds"),
    )
    .await
    .expect("set_timer must not block on the timer itself");

    assert_eq!(handled(outcome), "Timer set for 90 seconds.");
}

#[tokio::test]
async fn set_timer_defaults_to_sixty_seconds() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);
    let message = handled(rig.router.route(ActionId::SetTimer, "set a timer").await);
    assert_eq!(message, "Timer set for 60 seconds.");
}

#[tokio::test]
async fn stop_assistant_signals_termination() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);
    let outcome = rig.router.route(ActionId::StopAssistant, "stop").await;
    assert_eq!(
        outcome,
        RouteOutcome::Stop("Okay, stopping now. Goodbye!".to_string())
    );
}

#[tokio::test]
async fn collaborator_failures_become_result_messages() {
    let rig = rig(MockOs::failing(), MockLlm::unreachable(), vec![]);

    let message = handled(rig.router.route(ActionId::IncreaseVolume, "volume up").await);

    assert!(
        message.contains("Error controlling volume"),
        "failure must degrade to a descriptive message, got: {message}"
    );
}

#[tokio::test]
async fn play_with_query_opens_a_youtube_search() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    let message = handled(
        rig.router
            .route(ActionId::PlayYoutube, "play shape of you song")
            .await,
    );

    let calls = rig.os.recorded();
    assert_eq!(calls.len(), 1);
    assert!(
        calls[0].starts_with("open_url:") && calls[0].contains("search_query=shape+of+you"),
        "expected a search url, got: {}",
        calls[0]
    );
    assert_eq!(message, "Playing shape of you on YouTube");
}

#[tokio::test]
async fn bare_play_falls_back_to_media_resume() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    let message = handled(rig.router.route(ActionId::PlayYoutube, "play music").await);

    assert_eq!(rig.os.recorded(), vec!["media:PlayPause".to_string()]);
    assert_eq!(message, "Resumed playback.");
}

#[tokio::test]
async fn system_stats_selector_is_taken_from_the_command() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    handled(rig.router.route(ActionId::SystemStats, "cpu usage").await);
    handled(rig.router.route(ActionId::SystemStats, "how much memory is used").await);
    handled(rig.router.route(ActionId::SystemStats, "battery status").await);

    assert_eq!(
        rig.os.recorded(),
        vec![
            "system_stats:Cpu".to_string(),
            "system_stats:Memory".to_string(),
            "system_stats:Battery".to_string(),
        ]
    );
}

#[tokio::test]
async fn ask_ai_failure_becomes_an_apology() {
    let rig = rig(MockOs::new(), MockLlm::unreachable(), vec![]);

    let message = handled(rig.router.route(ActionId::AskAi, "what is entropy").await);

    assert_eq!(message, "Sorry, I couldn't process that question right now.");
}

#[tokio::test]
async fn generate_code_without_prompt_asks_and_skips_the_dialog() {
    let rig = rig(MockOs::new(), MockLlm::answering("ok"), vec![]);

    let message = handled(rig.router.route(ActionId::GenerateCode, "generate code for").await);

    assert_eq!(message, "No prompt provided for code generation.");
    assert_eq!(
        rig.speaker.spoken(),
        vec!["What should I generate code for?".to_string()]
    );
    assert!(rig.llm.code_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generate_code_collects_parameters_through_the_dialog() {
    let rig = rig(
        MockOs::new(),
        MockLlm::answering("ok"),
        vec![
            Reply::Text("javascript"),
            Reply::Silence,
            Reply::Silence, // filename question: both attempts silent -> default
            Reply::Text("keep it under 50 lines"),
        ],
    );

    let message = handled(
        rig.router
            .route(ActionId::GenerateCode, "write code for a url shortener")
            .await,
    );

    let requests = rig.llm.code_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (prompt, language, filename) = &requests[0];
    assert_eq!(
        prompt,
        "a url shortener. Additional requirements: keep it under 50 lines."
    );
    assert_eq!(language, "javascript");
    assert_eq!(
        filename, "generated_code.js",
        "silent filename answers must fall back to the language default"
    );
    assert_eq!(message, "Code written to generated_code.js");
    assert!(!rig.gate.is_held(), "gate must be released after the dialog");
}
