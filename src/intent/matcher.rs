use strsim::normalized_levenshtein;

use super::catalog::{ActionId, PhraseCatalog};

/// Score required before a catalog entry is accepted as the winner.
/// Similarity is normalized Levenshtein scaled to 0..=100.
const ACCEPT_THRESHOLD: f64 = 75.0;

/// Single-winner fuzzy classifier over the phrase catalog.
///
/// Callers only ever see the decision, never the score: either the best
/// entry cleared the threshold or the utterance is unmatched.
pub struct IntentMatcher {
    catalog: PhraseCatalog,
}

impl IntentMatcher {
    pub fn new(catalog: PhraseCatalog) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(PhraseCatalog::standard())
    }

    pub fn catalog(&self) -> &PhraseCatalog {
        &self.catalog
    }

    /// Resolve free text to an action, or `None` when nothing in the
    /// catalog comes close enough.
    ///
    /// "play <something>" is special-cased ahead of the general scorer:
    /// the bare "play" phrase belongs to media play/pause, and a similarity
    /// scorer cannot tell "play" from "play despacito". Any trailing
    /// argument means the user wants a search, so that wins outright.
    pub fn resolve(&self, utterance: &str) -> Option<ActionId> {
        let text = utterance.to_lowercase();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if text.len() > 5 && text.starts_with("play ") {
            return Some(ActionId::PlayYoutube);
        }

        let mut best: Option<(ActionId, f64)> = None;
        for entry in self.catalog.iter() {
            let entry_best = entry
                .phrases
                .iter()
                .map(|phrase| similarity(text, phrase))
                .fold(0.0f64, f64::max);
            // Strictly greater: on a tie the earlier catalog entry keeps
            // the win, which makes the tie-break deterministic.
            match best {
                Some((_, score)) if entry_best <= score => {}
                _ => best = Some((entry.action, entry_best)),
            }
        }

        match best {
            Some((action, score)) if score >= ACCEPT_THRESHOLD => Some(action),
            _ => None,
        }
    }
}

/// Normalized edit-distance similarity in 0..=100. Short canonical phrases
/// ("open", "set timer") must still score against longer spoken commands,
/// so the full-string ratio is combined with a token-level alignment of the
/// phrase into the utterance, slightly discounted so an exact full match
/// always beats a partial one. Alignment is per whole token: "time" scores
/// against the token "timer", never against a four-character slice of it,
/// so a phrase embedded inside a longer word does not pass for a hit.
fn similarity(text: &str, phrase: &str) -> f64 {
    let full = normalized_levenshtein(text, phrase);
    let partial = token_alignment(text, phrase);
    full.max(partial * 0.9) * 100.0
}

/// Mean best-match ratio of each phrase token against the utterance tokens.
/// Zero when the utterance has fewer tokens than the phrase; the full-string
/// ratio already covers that direction.
fn token_alignment(text: &str, phrase: &str) -> f64 {
    let text_tokens: Vec<&str> = text.split_whitespace().collect();
    let phrase_tokens: Vec<&str> = phrase.split_whitespace().collect();
    if phrase_tokens.is_empty() || text_tokens.len() < phrase_tokens.len() {
        return 0.0;
    }
    let total: f64 = phrase_tokens
        .iter()
        .map(|phrase_token| {
            text_tokens
                .iter()
                .map(|text_token| normalized_levenshtein(phrase_token, text_token))
                .fold(0.0f64, f64::max)
        })
        .sum();
    total / phrase_tokens.len() as f64
}
