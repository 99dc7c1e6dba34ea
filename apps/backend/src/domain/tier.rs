use serde::{Serialize, Serializer};

use crate::domain::rng::RandomSource;

/// Prize tier of a winning draw. Wire form is the Chinese label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 阳光普照, 65%
    Sunshine,
    /// 上签, 20%
    Top,
    /// 上上签, 10%
    TopTop,
    /// 特签, 5%
    Special,
}

impl Tier {
    /// Selection order; thresholds are cumulative in this order.
    pub const ALL: [Tier; 4] = [Tier::Sunshine, Tier::Top, Tier::TopTop, Tier::Special];

    pub const fn label(&self) -> &'static str {
        match self {
            Tier::Sunshine => "阳光普照",
            Tier::Top => "上签",
            Tier::TopTop => "上上签",
            Tier::Special => "特签",
        }
    }

    /// URL-safe name used for prize asset paths.
    pub const fn slug(&self) -> &'static str {
        match self {
            Tier::Sunshine => "sunshine",
            Tier::Top => "top",
            Tier::TopTop => "top-top",
            Tier::Special => "special",
        }
    }

    pub const fn cumulative_threshold(&self) -> f64 {
        match self {
            Tier::Sunshine => 65.0,
            Tier::Top => 85.0,
            Tier::TopTop => 95.0,
            Tier::Special => 100.0,
        }
    }

    pub fn from_label(label: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// First tier whose cumulative threshold exceeds `roll`; the last tier
/// catches rolls at or above 100.
pub fn tier_for_roll(roll: f64) -> Tier {
    Tier::ALL
        .into_iter()
        .find(|t| roll < t.cumulative_threshold())
        .unwrap_or(Tier::Special)
}

/// Weighted 65/20/10/5 choice, consuming one roll.
pub fn pick(rng: &dyn RandomSource) -> Tier {
    tier_for_roll(rng.percent())
}
