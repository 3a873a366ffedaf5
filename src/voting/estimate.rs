use serde::{Deserialize, Serialize};

/// The fixed non-numeric estimate tokens, the "joker" cards.
///
/// Jokers are categorically incomparable to story points: any distance
/// involving one is infinite, and a joker majority triggers the reward
/// engine's penalty path.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Joker {
    #[serde(rename = "🤷‍♀️")]
    Shrug,
    #[serde(rename = "☕")]
    Coffee,
    #[serde(rename = "🍦")]
    IceCream,
    #[serde(rename = "∞")]
    Infinity,
    #[serde(rename = "?")]
    Unknown,
}

impl Joker {
    pub const fn all() -> [Joker; 5] {
        [
            Joker::Shrug,
            Joker::Coffee,
            Joker::IceCream,
            Joker::Infinity,
            Joker::Unknown,
        ]
    }

    pub fn token(&self) -> &'static str {
        match self {
            Joker::Shrug => "🤷‍♀️",
            Joker::Coffee => "☕",
            Joker::IceCream => "🍦",
            Joker::Infinity => "∞",
            Joker::Unknown => "?",
        }
    }
}

impl std::fmt::Display for Joker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A cast estimate: a Fibonacci-like story point value or a joker token.
///
/// Serializes untagged so the replicated form matches the host's loose
/// number-or-string vote values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    Points(f64),
    Special(Joker),
}

impl Estimate {
    pub fn is_special(&self) -> bool {
        matches!(self, Estimate::Special(_))
    }

    pub fn points(&self) -> Option<f64> {
        match self {
            Estimate::Points(p) => Some(*p),
            Estimate::Special(_) => None,
        }
    }

    /// numbers ascending, all numbers before all jokers, jokers by token
    pub fn cmp_display(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Estimate::Points(a), Estimate::Points(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Estimate::Points(_), Estimate::Special(_)) => Ordering::Less,
            (Estimate::Special(_), Estimate::Points(_)) => Ordering::Greater,
            (Estimate::Special(a), Estimate::Special(b)) => a.token().cmp(b.token()),
        }
    }
}

impl From<f64> for Estimate {
    fn from(points: f64) -> Self {
        Estimate::Points(points)
    }
}
impl From<Joker> for Estimate {
    fn from(joker: Joker) -> Self {
        Estimate::Special(joker)
    }
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Estimate::Points(p) if p.fract() == 0.0 => write!(f, "{}", *p as i64),
            Estimate::Points(p) => write!(f, "{}", p),
            Estimate::Special(j) => write!(f, "{}", j),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_trims_whole_points() {
        assert_eq!(Estimate::Points(5.0).to_string(), "5");
        assert_eq!(Estimate::Points(0.5).to_string(), "0.5");
        assert_eq!(Estimate::Special(Joker::Infinity).to_string(), "∞");
    }

    #[test]
    fn untagged_serde_round_trip() {
        let json = serde_json::to_string(&Estimate::Points(8.0)).unwrap();
        assert_eq!(json, "8.0");
        let json = serde_json::to_string(&Estimate::Special(Joker::Coffee)).unwrap();
        assert_eq!(json, "\"☕\"");
        let back: Estimate = serde_json::from_str("\"☕\"").unwrap();
        assert_eq!(back, Estimate::Special(Joker::Coffee));
    }

    #[test]
    fn numbers_sort_before_jokers() {
        use std::cmp::Ordering;
        let five = Estimate::Points(5.0);
        let coffee = Estimate::Special(Joker::Coffee);
        assert_eq!(five.cmp_display(&coffee), Ordering::Less);
        assert_eq!(coffee.cmp_display(&five), Ordering::Greater);
    }
}
