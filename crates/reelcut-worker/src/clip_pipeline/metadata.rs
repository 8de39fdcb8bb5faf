//! Keyword and emotion tagging from segment text.

use std::collections::HashMap;

use reelcut_models::Emotion;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "but", "by", "can", "could", "did", "do", "does", "don't",
    "down", "for", "from", "get", "got", "had", "has", "have", "he", "her", "here", "him", "his",
    "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its", "just", "know", "like",
    "me", "my", "no", "not", "now", "of", "off", "oh", "ok", "okay", "on", "one", "or", "our",
    "out", "over", "really", "she", "so", "some", "that", "that's", "the", "their", "them",
    "then", "there", "they", "this", "to", "too", "up", "us", "very", "was", "we", "well",
    "were", "what", "when", "where", "which", "who", "why", "will", "with", "would", "yeah",
    "yes", "you", "your",
];

const FUNNY: &[&str] = &[
    "haha", "hahaha", "lol", "lmao", "funny", "hilarious", "joke", "laugh", "laughing", "silly",
    "goofy", "prank", "oops", "crazy", "weird", "ridiculous",
];

const EMOTIONAL: &[&str] = &[
    "cry", "crying", "tears", "sad", "miss", "missed", "love", "loved", "heart", "sorry", "hurt",
    "lost", "goodbye", "remember", "grateful", "family", "hug",
];

const INSPIRING: &[&str] = &[
    "dream", "dreams", "goal", "goals", "believe", "never", "give", "achieve", "success", "proud",
    "strong", "brave", "courage", "win", "won", "possible", "inspire", "change", "future",
];

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Most frequent non-stopword tokens, ties broken by first appearance.
///
/// Single characters and pure numbers are skipped.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    // token -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, token) in tokens(text).enumerate() {
        if token.chars().count() < 2
            || token.chars().all(|c| c.is_ascii_digit())
            || STOPWORDS.contains(&token.as_str())
        {
            continue;
        }
        counts.entry(token).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(limit).map(|(token, ..)| token).collect()
}

/// Score the text against each lexicon and pick the strongest.
///
/// Ties resolve in the order funny, emotional, inspiring; no hits is funny.
pub fn classify_emotion(text: &str) -> Emotion {
    let (mut funny, mut emotional, mut inspiring) = (0usize, 0usize, 0usize);
    for token in tokens(text) {
        let token = token.as_str();
        if FUNNY.contains(&token) {
            funny += 1;
        }
        if EMOTIONAL.contains(&token) {
            emotional += 1;
        }
        if INSPIRING.contains(&token) {
            inspiring += 1;
        }
    }

    if emotional > funny && emotional >= inspiring {
        Emotion::Emotional
    } else if inspiring > funny && inspiring > emotional {
        Emotion::Inspiring
    } else {
        Emotion::Funny
    }
}
