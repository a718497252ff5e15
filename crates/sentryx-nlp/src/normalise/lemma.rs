//! Dictionary-free noun lemmatiser.
//!
//! Reduces plural nouns to their singular form using an irregular-form table
//! and a handful of suffix rules. Verbs and adjectives pass through untouched,
//! so "running" stays "running" while "dogs" becomes "dog".

/// Irregular plurals and invariant nouns.
fn irregular(word: &str) -> Option<&'static str> {
    match word {
        "men" => Some("man"),
        "women" => Some("woman"),
        "children" => Some("child"),
        "people" => Some("people"),
        "feet" => Some("foot"),
        "teeth" => Some("tooth"),
        "mice" => Some("mouse"),
        "geese" => Some("goose"),
        "lives" => Some("life"),
        "wives" => Some("wife"),
        "knives" => Some("knife"),
        "news" => Some("news"),
        "series" => Some("series"),
        "species" => Some("species"),
        "lens" => Some("lens"),
        "gas" => Some("gas"),
        _ => None,
    }
}

/// Suffixes that look plural but usually are not.
const KEEP_SUFFIXES: &[&str] = &["ss", "us", "is", "ous"];

/// Suffixes whose plural adds "es".
const ES_SUFFIXES: &[&str] = &["ches", "shes", "xes", "zes", "sses"];

/// Return the base form of a lower-case token.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = irregular(word) {
        return base.to_string();
    }
    if KEEP_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ES_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3 && word.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize("dogs"), "dog");
        assert_eq!(lemmatize("idiots"), "idiot");
        assert_eq!(lemmatize("comments"), "comment");
    }

    #[test]
    fn test_es_and_ies_plurals() {
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("wishes"), "wish");
        assert_eq!(lemmatize("classes"), "class");
        assert_eq!(lemmatize("stories"), "story");
        assert_eq!(lemmatize("lies"), "lie");
    }

    #[test]
    fn test_irregulars() {
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("women"), "woman");
        assert_eq!(lemmatize("mice"), "mouse");
        assert_eq!(lemmatize("news"), "news");
    }

    #[test]
    fn test_non_plurals_untouched() {
        assert_eq!(lemmatize("running"), "running");
        assert_eq!(lemmatize("glass"), "glass");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("analysis"), "analysis");
        assert_eq!(lemmatize("famous"), "famous");
        assert_eq!(lemmatize("yes"), "yes");
    }
}
