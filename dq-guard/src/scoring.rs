//! Quality badges derived from passing expectation counts.
//!
//! Tiers are absolute counts against a reference suite of six checks, not
//! ratios of the evaluated suite. A suite with fewer than six expectations can
//! therefore never reach [`BadgeTier::Gold`].

use crate::core::Summary;
use serde::Serialize;
use std::fmt;

/// Denominator used for badge progress, the size of the reference suite.
pub const REFERENCE_CHECK_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
    None,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::Gold => "Gold",
            BadgeTier::Silver => "Silver",
            BadgeTier::Bronze => "Bronze",
            BadgeTier::None => "None",
        }
    }

    /// Color token understood by the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            BadgeTier::Gold => "gold",
            BadgeTier::Silver => "silver",
            BadgeTier::Bronze => "#cd7f32",
            BadgeTier::None => "red",
        }
    }

    /// Localized label with its medal glyph.
    pub fn display_label(&self) -> &'static str {
        match self {
            BadgeTier::Gold => "🥇 Gold",
            BadgeTier::Silver => "🥈 Silber",
            BadgeTier::Bronze => "🥉 Bronze",
            BadgeTier::None => "❌ Keine Auszeichnung",
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tiered quality label with its progress towards Gold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Badge {
    pub tier: BadgeTier,
    pub color: &'static str,
    /// Fraction of the reference suite that passed, in `[0, 1]`
    pub progress: f64,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        self.tier.display_label()
    }
}

/// Maps success counts to badges.
///
/// ```rust
/// use dq_guard::scoring::{BadgeTier, ScoreClassifier};
///
/// let badge = ScoreClassifier::classify(5);
/// assert_eq!(badge.tier, BadgeTier::Silver);
/// assert!((badge.progress - 5.0 / 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreClassifier;

impl ScoreClassifier {
    pub fn classify(success_count: usize) -> Badge {
        let tier = match success_count {
            n if n >= REFERENCE_CHECK_COUNT => BadgeTier::Gold,
            4..=5 => BadgeTier::Silver,
            2..=3 => BadgeTier::Bronze,
            _ => BadgeTier::None,
        };

        let progress = if tier == BadgeTier::Gold {
            1.0
        } else {
            success_count as f64 / REFERENCE_CHECK_COUNT as f64
        };

        Badge {
            tier,
            color: tier.color(),
            progress,
        }
    }

    pub fn classify_summary(summary: &Summary) -> Badge {
        Self::classify(summary.success_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        let cases = [
            (6, BadgeTier::Gold, 1.0),
            (5, BadgeTier::Silver, 5.0 / 6.0),
            (4, BadgeTier::Silver, 4.0 / 6.0),
            (3, BadgeTier::Bronze, 3.0 / 6.0),
            (2, BadgeTier::Bronze, 2.0 / 6.0),
            (1, BadgeTier::None, 1.0 / 6.0),
            (0, BadgeTier::None, 0.0),
        ];

        for (count, tier, progress) in cases {
            let badge = ScoreClassifier::classify(count);
            assert_eq!(badge.tier, tier, "success_count = {count}");
            assert!((badge.progress - progress).abs() < 1e-12);
            assert_eq!(badge.color, tier.color());
        }
    }

    #[test]
    fn test_gold_progress_is_clamped() {
        let badge = ScoreClassifier::classify(9);
        assert_eq!(badge.tier, BadgeTier::Gold);
        assert_eq!(badge.progress, 1.0);
    }

    #[test]
    fn test_empty_summary_has_no_badge() {
        let badge = ScoreClassifier::classify_summary(&Summary::empty());
        assert_eq!(badge.tier, BadgeTier::None);
        assert_eq!(badge.progress, 0.0);
        assert_eq!(badge.label(), "❌ Keine Auszeichnung");
        assert_eq!(badge.color, "red");
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(BadgeTier::Gold.display_label(), "🥇 Gold");
        assert_eq!(BadgeTier::Silver.display_label(), "🥈 Silber");
        assert_eq!(BadgeTier::Bronze.color(), "#cd7f32");
        assert_eq!(BadgeTier::Bronze.to_string(), "Bronze");
    }
}
