//! Model profile catalog
//!
//! The scoring engine is biased by one of a closed set of model profiles. Each
//! profile is static data: a score multiplier and whether the heart-rhythm
//! spread rule applies.

use crate::error::ComputeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in model profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelKind {
    #[default]
    CardioNet,
    HealthVision,
    CardiacInsight,
}

/// Static catalog entry for a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelProfile {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub accuracy_label: &'static str,
    pub specialties: &'static [&'static str],
    pub score_multiplier: f64,
    /// Whether the heart-rate spread rule is evaluated
    pub rhythm_rule: bool,
}

const CARDIO_NET: ModelProfile = ModelProfile {
    key: "cardioNet",
    display_name: "CardioNet AI",
    description: "Deep learning model trained on 100k+ cardiac datasets",
    accuracy_label: "94.2%",
    specialties: &[
        "Arrhythmia detection",
        "Heart rate variability",
        "Risk assessment",
    ],
    score_multiplier: 1.1,
    rhythm_rule: true,
};

const HEALTH_VISION: ModelProfile = ModelProfile {
    key: "healthVision",
    display_name: "HealthVision Pro",
    description: "Multi-modal AI combining wearable data with clinical patterns",
    accuracy_label: "91.8%",
    specialties: &[
        "Sleep disorders",
        "Activity correlation",
        "Lifestyle factors",
    ],
    score_multiplier: 1.0,
    rhythm_rule: false,
};

const CARDIAC_INSIGHT: ModelProfile = ModelProfile {
    key: "cardiacInsight",
    display_name: "Cardiac Insight",
    description: "Specialized in early warning detection and preventive care",
    accuracy_label: "89.5%",
    specialties: &["Early detection", "Preventive insights", "Risk prediction"],
    score_multiplier: 0.9,
    rhythm_rule: false,
};

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::CardioNet,
        ModelKind::HealthVision,
        ModelKind::CardiacInsight,
    ];

    pub fn profile(&self) -> &'static ModelProfile {
        match self {
            ModelKind::CardioNet => &CARDIO_NET,
            ModelKind::HealthVision => &HEALTH_VISION,
            ModelKind::CardiacInsight => &CARDIAC_INSIGHT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.profile().key
    }

    /// Look up a model by its catalog key
    pub fn from_key(key: &str) -> Result<Self, ComputeError> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| ComputeError::UnknownModel(key.to_string()))
    }
}

impl FromStr for ModelKind {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full catalog, in display order
pub fn catalog() -> impl Iterator<Item = &'static ModelProfile> {
    ModelKind::ALL.into_iter().map(|m| m.profile())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers() {
        assert_eq!(ModelKind::CardioNet.profile().score_multiplier, 1.1);
        assert_eq!(ModelKind::HealthVision.profile().score_multiplier, 1.0);
        assert_eq!(ModelKind::CardiacInsight.profile().score_multiplier, 0.9);
    }

    #[test]
    fn test_only_cardio_net_has_rhythm_rule() {
        let enabled: Vec<_> = catalog().filter(|p| p.rhythm_rule).map(|p| p.key).collect();
        assert_eq!(enabled, vec!["cardioNet"]);
    }

    #[test]
    fn test_key_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_key(kind.as_str()).unwrap(), kind);
        }
        assert_eq!("healthVision".parse::<ModelKind>().unwrap(), ModelKind::HealthVision);
    }

    #[test]
    fn test_unknown_key() {
        let err = ModelKind::from_key("deepHeart").unwrap_err();
        assert!(matches!(err, ComputeError::UnknownModel(k) if k == "deepHeart"));
    }

    #[test]
    fn test_serde_uses_catalog_keys() {
        let json = serde_json::to_string(&ModelKind::CardiacInsight).unwrap();
        assert_eq!(json, "\"cardiacInsight\"");
    }
}
