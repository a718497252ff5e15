//! Word lists shared by the sentiment scorers.
//!
//! Entries are lower-case. Nouns appear in singular form because the scorers
//! usually see lemmatised text; common inflections of verbs and adjectives
//! are listed explicitly.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

/// `(word, polarity, subjectivity)` for the lexical scorer.
const POLARITY: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("like", 0.2, 0.4),
    ("liked", 0.3, 0.5),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("wonderful", 1.0, 1.0),
    ("excellent", 1.0, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("beautiful", 0.85, 1.0),
    ("pretty", 0.25, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("nice", 0.6, 1.0),
    ("kind", 0.6, 0.9),
    ("sweet", 0.35, 0.65),
    ("cool", 0.35, 0.65),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("smart", 0.21, 0.64),
    ("brilliant", 0.9, 1.0),
    ("proud", 0.8, 1.0),
    ("brave", 0.8, 1.0),
    ("helpful", 0.5, 0.5),
    ("friendly", 0.375, 0.5),
    ("safe", 0.5, 0.5),
    ("fine", 0.42, 0.5),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("thank", 0.2, 0.2),
    ("thanks", 0.2, 0.2),
    ("welcome", 0.8, 0.9),
    ("interesting", 0.5, 0.5),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("correct", 0.0, 0.0),
    ("right", 0.29, 0.54),
    ("true", 0.35, 0.65),
    ("positive", 0.23, 0.55),
    ("success", 0.3, 0.5),
    ("successful", 0.75, 0.95),
    ("win", 0.8, 0.4),
    ("hero", 0.5, 0.6),
    ("respect", 0.3, 0.4),
    ("support", 0.2, 0.3),
    ("hope", 0.2, 0.4),
    ("calm", 0.3, 0.75),
    ("honest", 0.6, 0.9),
    ("clever", 0.5, 0.5),
    ("super", 0.33, 0.67),
    // negative
    ("bad", -0.7, 0.667),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("disgusting", -1.0, 1.0),
    ("pathetic", -1.0, 1.0),
    ("stupid", -0.8, 1.0),
    ("dumb", -0.375, 0.5),
    ("idiot", -0.8, 0.9),
    ("idiotic", -0.9, 0.9),
    ("moron", -0.8, 0.9),
    ("loser", -0.6, 0.8),
    ("fool", -0.5, 0.7),
    ("foolish", -0.3, 0.75),
    ("ugly", -0.7, 1.0),
    ("fat", -0.2, 0.6),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("mad", -0.625, 1.0),
    ("annoying", -0.8, 0.9),
    ("boring", -1.0, 1.0),
    ("useless", -0.5, 0.2),
    ("worthless", -0.8, 0.9),
    ("trash", -0.5, 0.6),
    ("garbage", -0.5, 0.6),
    ("crap", -0.8, 0.8),
    ("sick", -0.71, 0.86),
    ("weak", -0.375, 0.625),
    ("wrong", -0.5, 0.9),
    ("evil", -1.0, 1.0),
    ("nasty", -1.0, 1.0),
    ("cruel", -1.0, 1.0),
    ("mean", -0.3125, 0.6875),
    ("rude", -0.3, 0.6),
    ("creepy", -0.6, 0.9),
    ("toxic", -0.6, 0.7),
    ("racist", -0.9, 0.9),
    ("liar", -0.8, 0.9),
    ("poor", -0.4, 0.6),
    ("scary", -0.5, 1.0),
    ("dead", -0.2, 0.4),
    ("kill", -0.6, 0.5),
    ("die", -0.5, 0.5),
    ("shame", -0.5, 0.6),
    ("shameful", -0.8, 0.9),
    ("ridiculous", -0.33, 1.0),
    ("ignorant", -0.5, 0.8),
    ("jerk", -0.7, 0.9),
    ("freak", -0.6, 0.8),
    ("failure", -0.3, 0.3),
    ("fail", -0.5, 0.3),
    ("sucks", -0.3, 0.3),
    ("suck", -0.3, 0.3),
    ("negative", -0.3, 0.4),
    ("threat", -0.5, 0.5),
    ("abuse", -0.6, 0.5),
    ("harassment", -0.6, 0.5),
];

/// Multipliers applied to the next scored word by the lexical scorer.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("extremely", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("completely", 1.4),
    ("incredibly", 1.4),
    ("utterly", 1.5),
    ("highly", 1.3),
    ("quite", 1.1),
    ("most", 1.3),
    ("slightly", 0.7),
    ("somewhat", 0.8),
    ("barely", 0.6),
];

/// Word valences for the valence scorer, on a -4..4 scale.
const VALENCE: &[(&str, f64)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("lovely", 2.8),
    ("like", 2.0),
    ("liked", 1.8),
    ("likes", 1.8),
    ("good", 1.9),
    ("great", 3.1),
    ("nice", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("excellent", 2.7),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("beautiful", 2.9),
    ("pretty", 2.2),
    ("cool", 1.3),
    ("fun", 2.3),
    ("funny", 1.9),
    ("sweet", 2.0),
    ("smart", 1.7),
    ("brilliant", 2.8),
    ("kind", 2.4),
    ("friend", 2.2),
    ("friendly", 2.2),
    ("helpful", 1.8),
    ("proud", 2.1),
    ("brave", 2.4),
    ("safe", 1.9),
    ("fine", 0.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("welcome", 2.0),
    ("interesting", 1.7),
    ("impressive", 2.3),
    ("incredible", 2.2),
    ("win", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("hero", 2.6),
    ("respect", 2.1),
    ("support", 1.7),
    ("hope", 1.9),
    ("calm", 1.3),
    ("honest", 2.3),
    ("clever", 2.0),
    ("super", 2.9),
    ("yes", 1.7),
    ("ok", 1.2),
    ("okay", 0.9),
    ("lol", 1.8),
    ("haha", 2.0),
    ("yay", 2.4),
    ("wow", 2.8),
    (":)", 2.0),
    (":-)", 1.3),
    (":d", 2.9),
    ("<3", 1.9),
    // negative
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("hates", -1.9),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("disgusting", -2.4),
    ("pathetic", -2.7),
    ("stupid", -2.4),
    ("dumb", -2.3),
    ("idiot", -2.3),
    ("idiotic", -2.6),
    ("moron", -2.2),
    ("loser", -2.4),
    ("fool", -1.9),
    ("foolish", -1.1),
    ("ugly", -2.3),
    ("sad", -2.1),
    ("angry", -2.3),
    ("mad", -2.2),
    ("annoying", -1.9),
    ("boring", -1.3),
    ("useless", -1.8),
    ("worthless", -1.9),
    ("trash", -1.5),
    ("garbage", -1.6),
    ("crap", -1.6),
    ("sick", -2.3),
    ("weak", -1.9),
    ("wrong", -2.1),
    ("evil", -3.4),
    ("nasty", -2.6),
    ("cruel", -2.8),
    ("rude", -2.0),
    ("creepy", -1.9),
    ("toxic", -2.4),
    ("racist", -3.1),
    ("liar", -2.6),
    ("lie", -1.6),
    ("poor", -2.1),
    ("scary", -2.2),
    ("dead", -3.3),
    ("kill", -3.7),
    ("die", -2.9),
    ("shame", -2.1),
    ("shameful", -2.2),
    ("ridiculous", -1.5),
    ("ignorant", -1.1),
    ("jerk", -2.4),
    ("freak", -1.9),
    ("failure", -2.3),
    ("fail", -2.5),
    ("suck", -1.5),
    ("sucks", -1.5),
    ("threat", -2.4),
    ("abuse", -3.2),
    ("harass", -2.2),
    ("harassment", -2.5),
    ("bully", -2.6),
    ("bullying", -2.5),
    ("attack", -2.1),
    ("hurt", -2.4),
    ("cry", -2.1),
    ("fear", -2.2),
    ("problem", -1.7),
    ("damn", -1.7),
    ("wtf", -2.8),
    ("no", -1.2),
    (":(", -1.9),
    (":-(", -1.5),
];

/// Intensity adjustments the valence scorer adds to the following word.
pub const BOOST_INCREMENT: f64 = 0.293;
pub const BOOST_DECREMENT: f64 = -0.293;

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly",
    "deeply", "enormously", "entirely", "especially", "exceptionally", "extremely",
    "fabulously", "greatly", "hella", "highly", "hugely", "incredibly", "intensely",
    "majorly", "more", "most", "particularly", "purely", "quite", "really",
    "remarkably", "so", "substantially", "thoroughly", "totally", "tremendously",
    "uber", "unbelievably", "unusually", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont",
    "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "don't",
    "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't", "neednt",
    "needn't", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "oughtnt", "shant", "shouldnt", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "wasn't", "weren't", "without", "wont", "wouldnt", "won't",
    "wouldn't", "rarely", "seldom", "despite", "no",
];

/// `(polarity, subjectivity)` of a word for the lexical scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

lazy_static! {
    static ref POLARITY_MAP: HashMap<&'static str, PolarityEntry> = POLARITY
        .iter()
        .map(|&(w, polarity, subjectivity)| (w, PolarityEntry { polarity, subjectivity }))
        .collect();
    static ref INTENSIFIER_MAP: HashMap<&'static str, f64> = INTENSIFIERS.iter().copied().collect();
    static ref VALENCE_MAP: HashMap<&'static str, f64> = VALENCE.iter().copied().collect();
    static ref BOOSTER_MAP: HashMap<&'static str, f64> = BOOSTERS_UP
        .iter()
        .map(|&w| (w, BOOST_INCREMENT))
        .chain(BOOSTERS_DOWN.iter().map(|&w| (w, BOOST_DECREMENT)))
        .collect();
    static ref NEGATION_SET: HashSet<&'static str> = NEGATIONS.iter().copied().collect();
}

pub fn polarity(word: &str) -> Option<PolarityEntry> {
    POLARITY_MAP.get(word).copied()
}

pub fn intensifier(word: &str) -> Option<f64> {
    INTENSIFIER_MAP.get(word).copied()
}

pub fn valence(word: &str) -> Option<f64> {
    VALENCE_MAP.get(word).copied()
}

pub fn booster(word: &str) -> Option<f64> {
    BOOSTER_MAP.get(word).copied()
}

pub fn is_negation(word: &str) -> bool {
    NEGATION_SET.contains(word) || word.contains("n't")
}
