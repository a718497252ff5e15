//! Pipeline stages and the document fields each one owns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A processing stage a document advances through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preprocess,
    Enrich,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 2] = [Stage::Preprocess, Stage::Enrich];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::Enrich     => "enrich",
        }
    }

    /// Boolean flag field marking completion of this stage.
    pub fn flag_field(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocessed",
            Stage::Enrich     => "enriched",
        }
    }

    /// Completion timestamp field.
    pub fn timestamp_field(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocessed_at",
            Stage::Enrich     => "enriched_at",
        }
    }

    /// Field holding the stage output.
    pub fn output_field(&self) -> &'static str {
        match self {
            Stage::Preprocess => "normalized",
            Stage::Enrich     => "enrichment",
        }
    }

    /// Fields removed when the stage is reset (flag excluded).
    pub fn derived_fields(&self) -> [&'static str; 2] {
        [self.output_field(), self.timestamp_field()]
    }

    /// Stages whose flags must be true before this one may run.
    pub fn prerequisites(&self) -> &'static [Stage] {
        match self {
            Stage::Preprocess => &[],
            Stage::Enrich     => &[Stage::Preprocess],
        }
    }

    /// Stages that consume this stage's output, transitively.
    pub fn dependents(&self) -> Vec<Stage> {
        Stage::ALL
            .iter()
            .copied()
            .filter(|s| s.requires(*self))
            .collect()
    }

    fn requires(&self, other: Stage) -> bool {
        self.prerequisites()
            .iter()
            .any(|p| *p == other || p.requires(other))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preprocess" | "preprocessing" => Ok(Stage::Preprocess),
            "enrich" | "nlp"               => Ok(Stage::Enrich),
            other => Err(format!("unknown stage: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_requires_preprocess() {
        assert_eq!(Stage::Enrich.prerequisites(), &[Stage::Preprocess]);
        assert!(Stage::Preprocess.prerequisites().is_empty());
    }

    #[test]
    fn test_dependents() {
        assert_eq!(Stage::Preprocess.dependents(), vec![Stage::Enrich]);
        assert!(Stage::Enrich.dependents().is_empty());
    }

    #[test]
    fn test_parse_round_trip_names() {
        assert_eq!("preprocess".parse::<Stage>().unwrap(), Stage::Preprocess);
        assert_eq!("NLP".parse::<Stage>().unwrap(), Stage::Enrich);
        assert!("index".parse::<Stage>().is_err());
    }

    #[test]
    fn test_derived_fields_exclude_flag() {
        let fields = Stage::Enrich.derived_fields();
        assert!(!fields.contains(&Stage::Enrich.flag_field()));
        assert!(fields.contains(&"enrichment"));
    }
}
