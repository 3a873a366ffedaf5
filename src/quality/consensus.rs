use crate::voting::{Estimate, VoteResult};

/// What the round's grouped votes agree on.
#[derive(Debug, Clone, PartialEq)]
pub struct Consensus {
    /// exactly one distinct value was voted
    pub perfect: bool,
    /// the strictly most-voted group; None when the top count is tied
    pub majority: Option<VoteResult>,
    /// the majority, if any, is a joker token
    pub special_majority: bool,
}

impl Consensus {
    pub fn analyze(results: &[VoteResult]) -> Self {
        let perfect = results.len() == 1;
        let majority = results
            .iter()
            .max_by_key(|r| r.count)
            .filter(|top| results.iter().filter(|r| r.count == top.count).count() == 1)
            .cloned();
        let special_majority = majority
            .as_ref()
            .map(|m| m.value.is_special())
            .unwrap_or(false);
        Self {
            perfect,
            majority,
            special_majority,
        }
    }
}

/// Absolute distance between two estimates.
///
/// Jokers are incomparable to numbers, and to each other, so any joker
/// operand yields an infinite distance.
pub fn distance(a: &Estimate, b: &Estimate) -> f64 {
    match (a.points(), b.points()) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::Joker;

    fn group(value: Estimate, count: usize) -> VoteResult {
        VoteResult {
            value,
            voters: Vec::new(),
            count,
        }
    }

    #[test]
    fn unanimous_votes_are_perfect() {
        let consensus = Consensus::analyze(&[group(Estimate::Points(5.0), 3)]);
        assert!(consensus.perfect);
        assert_eq!(
            consensus.majority.map(|m| m.value),
            Some(Estimate::Points(5.0))
        );
        assert!(!consensus.special_majority);
    }

    #[test]
    fn strict_plurality_is_majority() {
        let consensus = Consensus::analyze(&[
            group(Estimate::Points(5.0), 3),
            group(Estimate::Points(8.0), 1),
        ]);
        assert!(!consensus.perfect);
        assert_eq!(
            consensus.majority.map(|m| m.value),
            Some(Estimate::Points(5.0))
        );
    }

    #[test]
    fn tied_top_counts_have_no_majority() {
        let consensus = Consensus::analyze(&[
            group(Estimate::Points(5.0), 2),
            group(Estimate::Points(8.0), 2),
        ]);
        assert!(consensus.majority.is_none());
        assert!(!consensus.special_majority);
    }

    #[test]
    fn joker_plurality_is_special_majority() {
        let consensus = Consensus::analyze(&[
            group(Estimate::Special(Joker::Shrug), 3),
            group(Estimate::Points(5.0), 1),
        ]);
        assert!(consensus.special_majority);
    }

    #[test]
    fn no_votes_no_majority() {
        let consensus = Consensus::analyze(&[]);
        assert!(!consensus.perfect);
        assert!(consensus.majority.is_none());
    }

    #[test]
    fn numeric_distances() {
        assert_eq!(distance(&Estimate::Points(5.0), &Estimate::Points(8.0)), 3.0);
        assert_eq!(
            distance(&Estimate::Points(13.0), &Estimate::Points(8.0)),
            5.0
        );
        assert_eq!(distance(&Estimate::Points(3.0), &Estimate::Points(3.0)), 0.0);
    }

    #[test]
    fn joker_distances_are_infinite() {
        let shrug = Estimate::Special(Joker::Shrug);
        let coffee = Estimate::Special(Joker::Coffee);
        assert_eq!(distance(&shrug, &Estimate::Points(5.0)), f64::INFINITY);
        assert_eq!(distance(&Estimate::Points(5.0), &coffee), f64::INFINITY);
        assert_eq!(distance(&shrug, &coffee), f64::INFINITY);
    }
}
