/// Closed set of supported actions. The matcher only ever produces values
/// from this enum, and the router matches on it exhaustively, so there is
/// no "unknown action" case at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    IncreaseVolume,
    DecreaseVolume,
    MuteAudio,
    OpenApp,
    CloseApp,
    SetTimer,
    TellJoke,
    TellTime,
    TellDate,
    GetIp,
    GenerateCode,
    AskAi,
    StopAssistant,
    MediaPlayPause,
    MediaNext,
    MediaPrev,
    SystemLock,
    SystemBrightnessUp,
    SystemBrightnessDown,
    SystemRecycleBin,
    SystemStats,
    WindowMinimize,
    WindowSwitch,
    UtilityCoin,
    UtilityDice,
    PlayYoutube,
}

impl ActionId {
    /// Stable tag used in the command log.
    pub fn tag(&self) -> &'static str {
        match self {
            ActionId::IncreaseVolume => "increase_volume",
            ActionId::DecreaseVolume => "decrease_volume",
            ActionId::MuteAudio => "mute_audio",
            ActionId::OpenApp => "open_app",
            ActionId::CloseApp => "close_app",
            ActionId::SetTimer => "set_timer",
            ActionId::TellJoke => "tell_joke",
            ActionId::TellTime => "tell_time",
            ActionId::TellDate => "tell_date",
            ActionId::GetIp => "get_ip",
            ActionId::GenerateCode => "generate_code",
            ActionId::AskAi => "ask_ai",
            ActionId::StopAssistant => "stop_assistant",
            ActionId::MediaPlayPause => "media_play_pause",
            ActionId::MediaNext => "media_next",
            ActionId::MediaPrev => "media_prev",
            ActionId::SystemLock => "system_lock",
            ActionId::SystemBrightnessUp => "system_brightness_up",
            ActionId::SystemBrightnessDown => "system_brightness_down",
            ActionId::SystemRecycleBin => "system_recycle_bin",
            ActionId::SystemStats => "system_stats",
            ActionId::WindowMinimize => "window_minimize",
            ActionId::WindowSwitch => "window_switch",
            ActionId::UtilityCoin => "utility_coin",
            ActionId::UtilityDice => "utility_dice",
            ActionId::PlayYoutube => "play_youtube",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub action: ActionId,
    pub phrases: &'static [&'static str],
}

/// Ordered action -> canonical phrases table. Order is load-bearing: the
/// matcher resolves equal scores in favor of the earlier entry, so the
/// table below is a fixed `Vec`, not a hash map.
#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    entries: Vec<CatalogEntry>,
}

impl PhraseCatalog {
    pub fn standard() -> Self {
        let entries = vec![
            entry(ActionId::IncreaseVolume, &[
                "increase volume", "turn up volume", "volume up", "raise volume", "louder",
            ]),
            entry(ActionId::DecreaseVolume, &[
                "decrease volume", "turn down volume", "volume down", "lower volume", "quieter",
            ]),
            entry(ActionId::MuteAudio, &["mute", "mute audio", "mute sound", "silence"]),
            entry(ActionId::OpenApp, &["open", "launch", "start", "run"]),
            entry(ActionId::CloseApp, &["close", "exit", "quit", "terminate"]),
            entry(ActionId::SetTimer, &["set timer", "remind me in", "alarm in"]),
            entry(ActionId::TellJoke, &["tell me a joke", "make me laugh", "joke"]),
            entry(ActionId::TellTime, &[
                "what time is it", "tell me the time", "current time", "time", "clock",
            ]),
            entry(ActionId::TellDate, &[
                "what's the date", "today's date", "current date", "date", "day", "today",
            ]),
            entry(ActionId::GetIp, &["what's my ip", "show my ip", "ip address"]),
            entry(ActionId::GenerateCode, &[
                "generate code for", "write code for", "create code for",
                "write a script to", "make a program that",
            ]),
            entry(ActionId::AskAi, &[
                "what is", "what are", "who is", "who are", "how do", "how does", "why",
                "when", "where", "tell me about", "explain", "describe", "can you",
                "do you know",
            ]),
            entry(ActionId::StopAssistant, &[
                "stop", "exit", "quit", "terminate", "shutdown", "goodbye", "bye",
            ]),
            entry(ActionId::MediaPlayPause, &[
                "play", "pause", "resume", "stop music", "resume music",
            ]),
            entry(ActionId::MediaNext, &[
                "next", "next song", "next track", "skip", "skip song",
            ]),
            entry(ActionId::MediaPrev, &[
                "previous", "previous song", "previous track", "go back", "back",
            ]),
            entry(ActionId::SystemLock, &["lock", "lock screen", "lock computer"]),
            entry(ActionId::SystemBrightnessUp, &[
                "increase brightness", "brightness up", "brighter",
            ]),
            entry(ActionId::SystemBrightnessDown, &[
                "decrease brightness", "brightness down", "dimmer", "lower brightness",
            ]),
            entry(ActionId::SystemRecycleBin, &[
                "empty recycle bin", "empty trash", "clean trash", "clear recycle bin",
            ]),
            entry(ActionId::SystemStats, &[
                "cpu usage", "ram usage", "memory usage", "battery status",
                "system status", "how is my pc",
            ]),
            entry(ActionId::WindowMinimize, &[
                "minimize all", "show desktop", "minimize windows", "hide windows",
            ]),
            entry(ActionId::WindowSwitch, &["switch window", "alt tab", "switch app"]),
            entry(ActionId::UtilityCoin, &["flip a coin", "heads or tails", "toss a coin"]),
            entry(ActionId::UtilityDice, &["roll a die", "roll a dice", "roll number"]),
            entry(ActionId::PlayYoutube, &[
                "play video", "play on youtube", "play song", "play music",
            ]),
        ];
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, action: ActionId) -> bool {
        self.entries.iter().any(|e| e.action == action)
    }
}

fn entry(action: ActionId, phrases: &'static [&'static str]) -> CatalogEntry {
    CatalogEntry { action, phrases }
}
