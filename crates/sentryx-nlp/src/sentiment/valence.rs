//! Valence-aware rule-based scorer for informal text.
//!
//! Each token gets a valence from the lexicon, adjusted by the three tokens
//! before it (boosters, negations), capitalisation emphasis and a contrastive
//! "but". The summed valence plus punctuation emphasis is squashed into a
//! compound score in [-1, 1]; the positive, neutral and negative proportions
//! sum to one.

use serde::{Deserialize, Serialize};

use super::lexicon;
use super::{round3, SentimentLabel};

pub const COMPOUND_THRESHOLD: f64 = 0.05;

/// Extra valence for an all-caps word when the text mixes case.
const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied by a preceding negation.
const NEGATION_SCALAR: f64 = -0.74;
/// Normalisation constant for the compound score.
const ALPHA: f64 = 15.0;
/// Damping of booster influence by distance.
const DISTANCE_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

const EXCLAMATION_AMPLIFIER: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_AMPLIFIER: f64 = 0.18;
const MAX_QUESTION_AMPLIFIER: f64 = 0.96;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValenceScore {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub label: SentimentLabel,
}

impl Default for ValenceScore {
    fn default() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

pub fn label_for(compound: f64) -> SentimentLabel {
    if compound >= COMPOUND_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= -COMPOUND_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValenceAnalyzer;

impl ValenceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> ValenceScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return ValenceScore::default();
        }
        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_differ = caps_differential(&tokens);

        let mut sentiments: Vec<f64> = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            if lexicon::booster(&lower[i]).is_some() {
                sentiments.push(0.0);
                continue;
            }
            if lower[i] == "kind" && lower.get(i + 1).map(String::as_str) == Some("of") {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(token_valence(&tokens, &lower, i, caps_differ));
        }
        apply_but_rule(&lower, &mut sentiments);

        score_valence(&sentiments, text)
    }
}

fn token_valence(tokens: &[&str], lower: &[String], i: usize, caps_differ: bool) -> f64 {
    let Some(mut valence) = lexicon::valence(&lower[i]) else {
        return 0.0;
    };
    if caps_differ && is_all_caps(tokens[i]) {
        valence += CAPS_INCREMENT.copysign(valence);
    }

    for distance in 0..3 {
        if i <= distance {
            break;
        }
        let j = i - distance - 1;
        if lexicon::valence(&lower[j]).is_some() {
            continue;
        }
        let scalar = booster_scalar(tokens[j], &lower[j], valence, caps_differ);
        valence += scalar * DISTANCE_DAMPING[distance];
        if lexicon::is_negation(&lower[j]) {
            valence *= NEGATION_SCALAR;
        }
    }
    valence
}

fn booster_scalar(token: &str, lower: &str, valence: f64, caps_differ: bool) -> f64 {
    let Some(mut scalar) = lexicon::booster(lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if caps_differ && is_all_caps(token) {
        scalar += CAPS_INCREMENT.copysign(valence);
    }
    scalar
}

/// Words before "but" are damped, words after it emphasised.
fn apply_but_rule(lower: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

fn score_valence(sentiments: &[f64], text: &str) -> ValenceScore {
    let amplifier = punctuation_emphasis(text);
    let mut total: f64 = sentiments.iter().sum();
    if total > 0.0 {
        total += amplifier;
    } else if total < 0.0 {
        total -= amplifier;
    }
    let compound = normalize(total);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += amplifier;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= amplifier;
    }

    let denominator = pos_sum + neg_sum.abs() + neu_count;
    let compound = round3(compound);
    ValenceScore {
        compound,
        positive: round3((pos_sum / denominator).abs()),
        neutral: round3((neu_count / denominator).abs()),
        negative: round3((neg_sum / denominator).abs()),
        label: label_for(compound),
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_AMPLIFIER,
        _ => MAX_QUESTION_AMPLIFIER,
    };
    exclamations as f64 * EXCLAMATION_AMPLIFIER + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Split on whitespace, stripping edge punctuation unless that would leave
/// two characters or fewer (keeps emoticons like ":)").
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| {
            let stripped = t.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                t
            } else {
                stripped
            }
        })
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are in capitals.
fn caps_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> ValenceScore {
        ValenceAnalyzer::new().score(text)
    }

    #[test]
    fn test_blank_is_neutral_default() {
        assert_eq!(score(""), ValenceScore::default());
        assert_eq!(score(" \n "), ValenceScore::default());
    }

    #[test]
    fn test_single_positive_word() {
        let s = score("love");
        assert_eq!(s.compound, 0.637);
        assert_eq!(s.positive, 1.0);
        assert_eq!(s.neutral, 0.0);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_single_negative_word() {
        let s = score("hate");
        assert_eq!(s.compound, -0.572);
        assert_eq!(s.negative, 1.0);
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_text() {
        let s = score("the table is made of wood");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neutral, 1.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_negation_flips() {
        let s = score("not good");
        assert_eq!(s.compound, -0.341);
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_booster_increases_intensity() {
        assert!(score("very good").compound > score("good").compound);
        assert!(score("slightly good").compound < score("good").compound);
    }

    #[test]
    fn test_caps_emphasis() {
        assert!(score("GREAT movie").compound > score("great movie").compound);
        // all-caps text carries no differential emphasis
        assert_eq!(score("GREAT MOVIE").compound, score("great movie").compound);
    }

    #[test]
    fn test_exclamation_emphasis() {
        assert!(score("good!!!").compound > score("good").compound);
        assert_eq!(score("good!!!!!!").compound, score("good!!!!").compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let s = score("the food was good but the service was terrible");
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        for text in [
            "I love you but you are so annoying",
            "what a wonderful terrible day",
            "meh",
            "GREAT!!! absolutely the best thing ever",
        ] {
            let s = score(text);
            let total = s.positive + s.neutral + s.negative;
            assert!((total - 1.0).abs() <= 0.002, "{text}: {total}");
            assert!((-1.0..=1.0).contains(&s.compound));
        }
    }

    #[test]
    fn test_emoticons_survive_tokenisation() {
        assert_eq!(score(":)").label, SentimentLabel::Positive);
        assert_eq!(score(":(").label, SentimentLabel::Negative);
    }

    #[test]
    fn test_raw_scenario_positive() {
        assert_eq!(score("I LOVE this!!! 😊").label, SentimentLabel::Positive);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(label_for(0.05), SentimentLabel::Positive);
        assert_eq!(label_for(-0.05), SentimentLabel::Negative);
        assert_eq!(label_for(0.049), SentimentLabel::Neutral);
    }
}
