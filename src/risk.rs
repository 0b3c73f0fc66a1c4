//! Training-load risk classification
//!
//! Combines the acute:chronic ratio with subjective wellness (fatigue and
//! sleep, both on a 1-5 scale) into a risk tier and a suggestion.
//!
//! # Decision policy
//!
//! 1. The ratio picks a base tier:
//!    - above 1.5: high risk
//!    - above 1.3: rapid increase, moderate risk
//!    - below 0.8: decreasing load, low risk
//!    - otherwise: optimal
//! 2. Wellness is layered on top:
//!    - exhausted (fatigue 5) or terrible sleep (sleep 1) forces a high-risk
//!      fatigue warning whatever the load says
//!    - poor sleep (≤ 2) or high fatigue (≥ 4) downgrades an optimal tier to
//!      moderate / maintain; elevated tiers are left alone
//! 3. The fatigue warning flag is reported independently of whether it
//!    changed the tier.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suggestion shown alongside the risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKey {
    HighRisk,
    IncreaseRapid,
    Decrease,
    Optimal,
    Maintain,
    FatigueWarning,
}

impl SuggestionKey {
    /// Stable key used by presentation layers for lookup
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKey::HighRisk => "high_risk",
            SuggestionKey::IncreaseRapid => "increase_rapid",
            SuggestionKey::Decrease => "decrease",
            SuggestionKey::Optimal => "optimal",
            SuggestionKey::Maintain => "maintain",
            SuggestionKey::FatigueWarning => "fatigue_warning",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SuggestionKey::HighRisk => "Load is spiking well above your base - reduce intensity",
            SuggestionKey::IncreaseRapid => "Load is climbing quickly - hold off on further increases",
            SuggestionKey::Decrease => "Load is below your base - room to build up",
            SuggestionKey::Optimal => "Load is in the sweet spot - keep progressing",
            SuggestionKey::Maintain => "Recovery is lagging - maintain current load",
            SuggestionKey::FatigueWarning => "Recovery is poor - prioritise rest today",
        }
    }
}

impl fmt::Display for SuggestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Optimal,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Optimal => "optimal",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub suggestion_key: SuggestionKey,
    pub risk_level_key: RiskLevel,
    /// Poor sleep or high fatigue, whether or not it changed the tier
    pub fatigue_warning: bool,
}

/// Wellness markers derived from the 1-5 fatigue and sleep scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellnessFlags {
    pub exhausted: bool,
    pub terrible_sleep: bool,
    pub poor_sleep: bool,
    pub high_fatigue: bool,
}

impl WellnessFlags {
    pub fn from_scores(fatigue: u8, sleep: u8) -> Self {
        WellnessFlags {
            exhausted: fatigue == 5,
            terrible_sleep: sleep == 1,
            poor_sleep: sleep <= 2,
            high_fatigue: fatigue >= 4,
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.exhausted || self.terrible_sleep
    }

    pub fn needs_caution(&self) -> bool {
        self.poor_sleep || self.high_fatigue
    }
}

/// Stateless ratio + wellness classifier
pub struct RiskClassifier;

impl RiskClassifier {
    const HIGH_RISK_RATIO: Decimal = dec!(1.5);
    const RAPID_INCREASE_RATIO: Decimal = dec!(1.3);
    const UNDERLOAD_RATIO: Decimal = dec!(0.8);

    /// Classify a ratio together with today's fatigue and sleep scores
    pub fn classify(ratio: Decimal, fatigue: u8, sleep: u8) -> RiskAssessment {
        let (mut suggestion_key, mut risk_level_key) = Self::base_tier(ratio);
        let wellness = WellnessFlags::from_scores(fatigue, sleep);

        if wellness.is_crisis() {
            risk_level_key = RiskLevel::High;
            suggestion_key = SuggestionKey::FatigueWarning;
        } else if wellness.needs_caution() && risk_level_key == RiskLevel::Optimal {
            risk_level_key = RiskLevel::Moderate;
            suggestion_key = SuggestionKey::Maintain;
        }

        RiskAssessment {
            suggestion_key,
            risk_level_key,
            fatigue_warning: wellness.needs_caution(),
        }
    }

    /// Load-only tier, first matching band wins
    pub fn base_tier(ratio: Decimal) -> (SuggestionKey, RiskLevel) {
        if ratio > Self::HIGH_RISK_RATIO {
            (SuggestionKey::HighRisk, RiskLevel::High)
        } else if ratio > Self::RAPID_INCREASE_RATIO {
            (SuggestionKey::IncreaseRapid, RiskLevel::Moderate)
        } else if ratio < Self::UNDERLOAD_RATIO {
            (SuggestionKey::Decrease, RiskLevel::Low)
        } else {
            (SuggestionKey::Optimal, RiskLevel::Optimal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_tier_boundaries() {
        assert_eq!(
            RiskClassifier::base_tier(dec!(1.51)),
            (SuggestionKey::HighRisk, RiskLevel::High)
        );
        assert_eq!(
            RiskClassifier::base_tier(dec!(1.5)),
            (SuggestionKey::IncreaseRapid, RiskLevel::Moderate)
        );
        assert_eq!(
            RiskClassifier::base_tier(dec!(1.31)),
            (SuggestionKey::IncreaseRapid, RiskLevel::Moderate)
        );
        assert_eq!(
            RiskClassifier::base_tier(dec!(1.3)),
            (SuggestionKey::Optimal, RiskLevel::Optimal)
        );
        assert_eq!(
            RiskClassifier::base_tier(dec!(0.8)),
            (SuggestionKey::Optimal, RiskLevel::Optimal)
        );
        assert_eq!(
            RiskClassifier::base_tier(dec!(0.79)),
            (SuggestionKey::Decrease, RiskLevel::Low)
        );
        assert_eq!(
            RiskClassifier::base_tier(Decimal::ZERO),
            (SuggestionKey::Decrease, RiskLevel::Low)
        );
    }

    #[test]
    fn test_classify_without_wellness_concerns() {
        let optimal = RiskClassifier::classify(dec!(1.3), 3, 7);
        assert_eq!(optimal.risk_level_key, RiskLevel::Optimal);
        assert_eq!(optimal.suggestion_key, SuggestionKey::Optimal);
        assert!(!optimal.fatigue_warning);

        let rapid = RiskClassifier::classify(dec!(1.31), 3, 7);
        assert_eq!(rapid.risk_level_key, RiskLevel::Moderate);
        assert_eq!(rapid.suggestion_key, SuggestionKey::IncreaseRapid);

        let low = RiskClassifier::classify(dec!(0.79), 3, 7);
        assert_eq!(low.risk_level_key, RiskLevel::Low);
        assert_eq!(low.suggestion_key, SuggestionKey::Decrease);
    }

    #[test]
    fn test_exhaustion_overrides_load() {
        let exhausted = RiskClassifier::classify(dec!(1.0), 5, 7);
        assert_eq!(exhausted.risk_level_key, RiskLevel::High);
        assert_eq!(exhausted.suggestion_key, SuggestionKey::FatigueWarning);
        assert!(exhausted.fatigue_warning);

        // Even an underloaded athlete is told to rest when sleep is terrible
        let no_sleep = RiskClassifier::classify(dec!(0.5), 2, 1);
        assert_eq!(no_sleep.risk_level_key, RiskLevel::High);
        assert_eq!(no_sleep.suggestion_key, SuggestionKey::FatigueWarning);
        assert!(no_sleep.fatigue_warning);
    }

    #[test]
    fn test_only_optimal_is_downgraded() {
        let tired = RiskClassifier::classify(dec!(1.0), 4, 7);
        assert_eq!(tired.risk_level_key, RiskLevel::Moderate);
        assert_eq!(tired.suggestion_key, SuggestionKey::Maintain);
        assert!(tired.fatigue_warning);

        let tired_low = RiskClassifier::classify(dec!(0.5), 4, 7);
        assert_eq!(tired_low.risk_level_key, RiskLevel::Low);
        assert_eq!(tired_low.suggestion_key, SuggestionKey::Decrease);
        assert!(tired_low.fatigue_warning);

        let tired_rapid = RiskClassifier::classify(dec!(1.4), 4, 7);
        assert_eq!(tired_rapid.risk_level_key, RiskLevel::Moderate);
        assert_eq!(tired_rapid.suggestion_key, SuggestionKey::IncreaseRapid);

        let poor_sleep = RiskClassifier::classify(dec!(1.1), 2, 2);
        assert_eq!(poor_sleep.risk_level_key, RiskLevel::Moderate);
        assert_eq!(poor_sleep.suggestion_key, SuggestionKey::Maintain);
    }

    #[test]
    fn test_high_risk_stays_high_with_good_wellness() {
        let spike = RiskClassifier::classify(dec!(2.0), 1, 5);
        assert_eq!(spike.risk_level_key, RiskLevel::High);
        assert_eq!(spike.suggestion_key, SuggestionKey::HighRisk);
        assert!(!spike.fatigue_warning);
    }

    #[test]
    fn test_out_of_range_scores_do_not_panic() {
        let zero_sleep = RiskClassifier::classify(dec!(1.0), 0, 0);
        assert!(zero_sleep.fatigue_warning);
        assert_eq!(zero_sleep.risk_level_key, RiskLevel::Moderate);

        let large = RiskClassifier::classify(dec!(1.0), 9, 9);
        assert!(large.fatigue_warning);
        assert_eq!(large.suggestion_key, SuggestionKey::Maintain);
    }

    #[test]
    fn test_wire_keys() {
        let assessment = RiskClassifier::classify(dec!(1.0), 5, 3);
        let json = serde_json::to_string(&assessment).unwrap();
        assert!(json.contains("\"fatigue_warning\""));
        assert!(json.contains("\"high\""));

        assert_eq!(SuggestionKey::IncreaseRapid.as_str(), "increase_rapid");
        assert_eq!(SuggestionKey::FatigueWarning.to_string(), "fatigue_warning");
        assert_eq!(RiskLevel::Optimal.to_string(), "optimal");
    }
}
