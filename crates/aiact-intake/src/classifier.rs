//! Risk classification: Prohibited > HighRisk > LimitedRisk > MinimalRisk.
//!
//! The tiers mirror the severity ordering of the regulation: an
//! unacceptable-risk use overrides any lower classification regardless of
//! the other answers. Evaluation stops at the first tier with a firing
//! trigger, so a result never mixes reasons from two tiers.
//!
//! The high-risk and limited-risk gates are a simplified approximation of
//! the legal text and are kept deliberately provisional.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::AnswerSet;
use crate::catalog::keys;

/// Outcome tier of a classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Prohibited,
    HighRisk,
    LimitedRisk,
    MinimalRisk,
    /// Not yet classified. Never produced by [`classify`].
    #[default]
    Unknown,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Prohibited => "prohibited",
            RiskTier::HighRisk => "high_risk",
            RiskTier::LimitedRisk => "limited_risk",
            RiskTier::MinimalRisk => "minimal_risk",
            RiskTier::Unknown => "unknown",
        }
    }

    /// Severity rank, highest first. `Unknown` ranks below every real tier.
    pub fn severity(&self) -> u8 {
        match self {
            RiskTier::Prohibited => 4,
            RiskTier::HighRisk => 3,
            RiskTier::LimitedRisk => 2,
            RiskTier::MinimalRisk => 1,
            RiskTier::Unknown => 0,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = std::convert::Infallible;

    /// Persisted tier strings that are not recognized read back as `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "prohibited" => RiskTier::Prohibited,
            "high_risk" => RiskTier::HighRisk,
            "limited_risk" => RiskTier::LimitedRisk,
            "minimal_risk" => RiskTier::MinimalRisk,
            _ => RiskTier::Unknown,
        })
    }
}

/// Result of classifying an answer set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub risk_tier: RiskTier,
    pub reasons: Vec<String>,
}

impl Classification {
    pub fn is_prohibited(&self) -> bool {
        self.risk_tier == RiskTier::Prohibited
    }
}

/// Reason given when nothing fired.
pub const NO_TRIGGERS_REASON: &str = "No high-risk/prohibited triggers found.";

/// A yes/no condition contributing one reason. Fires only when every listed
/// question normalizes to yes.
#[derive(Clone, Copy, Debug)]
pub struct Trigger {
    pub all_yes: &'static [&'static str],
    pub reason: &'static str,
}

impl Trigger {
    pub fn fires(&self, answers: &AnswerSet) -> bool {
        self.all_yes.iter().all(|key| answers.yes_no(key).is_yes())
    }
}

/// The triggers selecting one tier.
#[derive(Clone, Copy, Debug)]
pub struct TierRule {
    pub tier: RiskTier,
    pub triggers: &'static [Trigger],
}

/// Rule table in precedence order. Minimal risk is the fallthrough.
pub static TIER_RULES: &[TierRule] = &[
    TierRule {
        tier: RiskTier::Prohibited,
        triggers: &[
            Trigger {
                all_yes: &[keys::SUBLIMINAL_OR_MANIPULATIVE],
                reason: "Uses subliminal/manipulative techniques.",
            },
            Trigger {
                all_yes: &[keys::VULNERABLE_GROUPS_EXPLOITATION],
                reason: "Designed to exploit vulnerable groups.",
            },
            Trigger {
                all_yes: &[keys::SOCIAL_SCORING],
                reason: "Performs social scoring.",
            },
            Trigger {
                all_yes: &[keys::EMOTION_RECOGNITION_WORK_OR_EDUCATION],
                reason: "Emotion recognition in workplace/education context.",
            },
            // Public-space law enforcement use is treated as a prohibited candidate.
            Trigger {
                all_yes: &[keys::USED_IN_PUBLIC_SPACE_FOR_POLICING],
                reason: "Used in public spaces for law enforcement purposes.",
            },
        ],
    },
    TierRule {
        tier: RiskTier::HighRisk,
        triggers: &[
            Trigger {
                all_yes: &[keys::SAFETY_COMPONENT],
                reason: "Acts as a safety component of a product/safety function.",
            },
            Trigger {
                all_yes: &[keys::MAKES_OR_SUPPORTS_DECISIONS, keys::AFFECTS_LEGAL_RIGHTS],
                reason: "Makes/supports decisions about people that can affect rights/opportunities.",
            },
            Trigger {
                all_yes: &[keys::BIOMETRIC_IDENTIFICATION],
                reason: "Performs biometric identification/categorisation.",
            },
        ],
    },
    TierRule {
        tier: RiskTier::LimitedRisk,
        triggers: &[Trigger {
            all_yes: &[keys::GPAI_FOUNDATION_MODEL_USED],
            reason: "Uses a general-purpose AI/foundation model.",
        }],
    },
];

/// Classify an answer set.
///
/// Pure and total: missing or unrecognized answers never fire a trigger and
/// never cause an error.
pub fn classify(answers: &AnswerSet) -> Classification {
    for rule in TIER_RULES {
        let reasons: Vec<String> = rule
            .triggers
            .iter()
            .filter(|trigger| trigger.fires(answers))
            .map(|trigger| trigger.reason.to_string())
            .collect();

        if !reasons.is_empty() {
            debug!(tier = %rule.tier, triggers = reasons.len(), "tier selected");
            return Classification {
                risk_tier: rule.tier,
                reasons,
            };
        }
    }

    debug!("no triggers fired");
    Classification {
        risk_tier: RiskTier::MinimalRisk,
        reasons: vec![NO_TRIGGERS_REASON.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_question, AnswerType};

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn empty_answers_are_minimal_risk() {
        let result = classify(&AnswerSet::new());
        assert_eq!(result.risk_tier, RiskTier::MinimalRisk);
        assert_eq!(result.reasons, vec![NO_TRIGGERS_REASON.to_string()]);
    }

    #[test]
    fn safety_component_alone_is_high_risk() {
        let result = classify(&answers(&[(keys::SAFETY_COMPONENT, "yes")]));
        assert_eq!(result.risk_tier, RiskTier::HighRisk);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].contains("safety component"));
    }

    #[test]
    fn decisions_without_rights_impact_falls_through() {
        let result = classify(&answers(&[
            (keys::MAKES_OR_SUPPORTS_DECISIONS, "yes"),
            (keys::AFFECTS_LEGAL_RIGHTS, "no"),
        ]));
        assert_eq!(result.risk_tier, RiskTier::MinimalRisk);
    }

    #[test]
    fn decisions_with_rights_impact_is_high_risk() {
        let result = classify(&answers(&[
            (keys::MAKES_OR_SUPPORTS_DECISIONS, "yes"),
            (keys::AFFECTS_LEGAL_RIGHTS, "true"),
        ]));
        assert_eq!(result.risk_tier, RiskTier::HighRisk);
        assert_eq!(
            result.reasons,
            vec!["Makes/supports decisions about people that can affect rights/opportunities."]
        );
    }

    #[test]
    fn joint_rule_with_gpai_falls_to_limited_risk() {
        let result = classify(&answers(&[
            (keys::MAKES_OR_SUPPORTS_DECISIONS, "yes"),
            (keys::AFFECTS_LEGAL_RIGHTS, "no"),
            (keys::GPAI_FOUNDATION_MODEL_USED, "yes"),
        ]));
        assert_eq!(result.risk_tier, RiskTier::LimitedRisk);
        assert_eq!(result.reasons, vec!["Uses a general-purpose AI/foundation model."]);
    }

    #[test]
    fn prohibited_accumulates_all_reasons_in_order() {
        let result = classify(&answers(&[
            (keys::USED_IN_PUBLIC_SPACE_FOR_POLICING, "yes"),
            (keys::SOCIAL_SCORING, "yes"),
            (keys::SAFETY_COMPONENT, "yes"),
            (keys::GPAI_FOUNDATION_MODEL_USED, "yes"),
        ]));
        assert_eq!(result.risk_tier, RiskTier::Prohibited);
        assert_eq!(
            result.reasons,
            vec![
                "Performs social scoring.",
                "Used in public spaces for law enforcement purposes.",
            ]
        );
        assert!(result.is_prohibited());
    }

    #[test]
    fn high_risk_does_not_include_limited_reasons() {
        let result = classify(&answers(&[
            (keys::BIOMETRIC_IDENTIFICATION, "yes"),
            (keys::SAFETY_COMPONENT, "yes"),
            (keys::GPAI_FOUNDATION_MODEL_USED, "yes"),
        ]));
        assert_eq!(result.risk_tier, RiskTier::HighRisk);
        assert_eq!(
            result.reasons,
            vec![
                "Acts as a safety component of a product/safety function.",
                "Performs biometric identification/categorisation.",
            ]
        );
    }

    #[test]
    fn boolean_answers_trigger_like_strings() {
        let set = AnswerSet::new().with(keys::SUBLIMINAL_OR_MANIPULATIVE, true);
        assert_eq!(classify(&set).risk_tier, RiskTier::Prohibited);
    }

    #[test]
    fn unrecognized_values_never_trigger() {
        let result = classify(&answers(&[
            (keys::SOCIAL_SCORING, "Yes"),
            (keys::SAFETY_COMPONENT, "maybe"),
            (keys::GPAI_FOUNDATION_MODEL_USED, ""),
        ]));
        assert_eq!(result.risk_tier, RiskTier::MinimalRisk);
    }

    #[test]
    fn classify_is_idempotent() {
        let set = answers(&[(keys::BIOMETRIC_IDENTIFICATION, "yes")]);
        assert_eq!(classify(&set), classify(&set));
    }

    #[test]
    fn rule_keys_are_yes_no_catalog_questions() {
        for rule in TIER_RULES {
            for trigger in rule.triggers {
                for key in trigger.all_yes {
                    let q = find_question(key).unwrap();
                    assert_eq!(q.answer_type, AnswerType::YesNo, "{}", key);
                }
            }
        }
    }

    #[test]
    fn rules_are_in_descending_severity() {
        let ranks: Vec<u8> = TIER_RULES.iter().map(|r| r.tier.severity()).collect();
        assert!(ranks.windows(2).all(|w| w[0] > w[1]));
        assert!(ranks.iter().all(|r| *r > RiskTier::MinimalRisk.severity()));
    }

    #[test]
    fn tier_string_round_trip() {
        for tier in [
            RiskTier::Prohibited,
            RiskTier::HighRisk,
            RiskTier::LimitedRisk,
            RiskTier::MinimalRisk,
            RiskTier::Unknown,
        ] {
            assert_eq!(tier.as_str().parse::<RiskTier>().unwrap(), tier);
            assert_eq!(
                serde_json::to_value(tier).unwrap(),
                serde_json::Value::String(tier.to_string())
            );
        }
        assert_eq!("critical".parse::<RiskTier>().unwrap(), RiskTier::Unknown);
        assert_eq!(RiskTier::default(), RiskTier::Unknown);
    }
}
