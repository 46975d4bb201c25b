//! Command-parameter extraction heuristics.
//!
//! Filler removal works on whole tokens, not substrings, so a word that
//! merely contains a filler ("another" contains "an") passes through
//! untouched.

/// Verbs that name the open/close action itself and carry no parameter.
const ACTION_VERBS: &[&str] = &[
    "open", "launch", "start", "run", "close", "exit", "quit", "terminate",
];

/// Conversational noise around an app name.
const FILLER_WORDS: &[&str] = &["to", "the", "a", "an", "my", "please"];

/// Extract an application name from a spoken open/close command and
/// normalize well-known aliases to their canonical executable name.
pub fn app_name(command: &str) -> String {
    let lowered = command.to_lowercase();
    let kept: Vec<&str> = lowered
        .split_whitespace()
        .filter(|tok| !ACTION_VERBS.contains(tok) && !FILLER_WORDS.contains(tok))
        .collect();
    let name = kept.join(" ");

    if name.contains("google") || name.contains("chrome") {
        "chrome".to_string()
    } else if name.contains("edge") {
        "edge".to_string()
    } else if name.contains("firefox") {
        "firefox".to_string()
    } else if name.contains("notepad") {
        "notepad".to_string()
    } else if name.contains("calculator") || name.contains("calc") {
        "calc".to_string()
    } else {
        name
    }
}

/// First integer found in the command, in seconds. Defaults to 60 when the
/// user didn't say a number at all.
pub fn timer_seconds(command: &str) -> u64 {
    let mut digits = String::new();
    for ch in command.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if !digits.is_empty() {
            break;
        }
    }
    digits.parse().unwrap_or(60)
}

/// Search query for a "play ..." command. `None` means the user said a bare
/// play/resume with no argument left after filler removal.
pub fn youtube_query(command: &str) -> Option<String> {
    let lowered = command.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.first() == Some(&"play") {
        tokens.remove(0);
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        match *tok {
            "song" | "video" | "music" | "youtube" => continue,
            "on" if iter.peek() == Some(&&"youtube") => {
                iter.next();
            }
            other => kept.push(other),
        }
    }

    let query = kept.join(" ");
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

const CODE_PREFIXES: &[&str] = &[
    "generate code for",
    "write code for",
    "create code for",
    "write a script to",
    "make a program that",
];

/// Extract the description following a generate-code phrase. Prefix match
/// first; falls back to the first interior occurrence for utterances like
/// "hey can you write code for x".
pub fn code_prompt(command: &str) -> Option<String> {
    let lowered = command.to_lowercase();
    let lowered = lowered.trim();
    for prefix in CODE_PREFIXES {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    for prefix in CODE_PREFIXES {
        if let Some(idx) = lowered.find(prefix) {
            let rest = lowered[idx + prefix.len()..].trim();
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

/// Default output file for a generated-code request in the given language.
pub fn default_filename(language: &str) -> String {
    let lang = language.trim().to_lowercase();
    let name = if lang.starts_with("py") {
        "generated_code.py"
    } else if lang == "javascript" || lang == "js" {
        "generated_code.js"
    } else if lang == "typescript" || lang == "ts" {
        "generated_code.ts"
    } else if lang == "java" {
        "GeneratedCode.java"
    } else if lang == "c#" || lang == "csharp" {
        "GeneratedCode.cs"
    } else if lang == "c++" || lang == "cpp" {
        "generated_code.cpp"
    } else if lang == "go" || lang == "golang" {
        "generated_code.go"
    } else if lang == "rust" {
        "generated_code.rs"
    } else {
        "generated_code.txt"
    };
    name.to_string()
}

/// Which system statistic a stats command is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Cpu,
    Memory,
    Battery,
    /// Overall summary when the command names no specific stat.
    General,
}

impl StatKind {
    pub fn from_command(command: &str) -> Self {
        let lowered = command.to_lowercase();
        if lowered.contains("cpu") {
            StatKind::Cpu
        } else if lowered.contains("ram") || lowered.contains("memory") {
            StatKind::Memory
        } else if lowered.contains("battery") {
            StatKind::Battery
        } else {
            StatKind::General
        }
    }
}
