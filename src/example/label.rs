//! Candidate labels and their costs

use std::fmt;

use super::features::Features;

/// Cost attached to a candidate label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cost {
    /// Cost supplied with the label. Only finite, non-negative values are usable.
    Known(f32),
    /// Label is a candidate but its cost was not given (test-time records).
    Unknown,
    /// Label is not available for this example at all.
    NotApplicable,
}

impl Cost {
    /// The cost value when it is known, finite and non-negative.
    pub fn valid(self) -> Option<f32> {
        match self {
            Cost::Known(c) if c.is_finite() && c >= 0.0 => Some(c),
            _ => None,
        }
    }

    /// A known cost that cannot be used: NaN, infinite or negative.
    pub fn is_invalid(self) -> bool {
        matches!(self, Cost::Known(_)) && self.valid().is_none()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Known(c) => write!(f, "{}", c),
            Cost::Unknown => write!(f, "?"),
            Cost::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// One candidate label of an example.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label_id: u32,
    pub cost: Cost,
    /// Label-dependent features. `None` means the example's shared vector applies.
    pub features: Option<Features>,
}

impl Candidate {
    pub fn new(label_id: u32, cost: Cost) -> Self {
        Self {
            label_id,
            cost,
            features: None,
        }
    }

    /// Candidate with a known cost and no private features.
    pub fn with_cost(label_id: u32, cost: f32) -> Self {
        Self::new(label_id, Cost::Known(cost))
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = Some(features);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_costs() {
        assert_eq!(Cost::Known(0.0).valid(), Some(0.0));
        assert_eq!(Cost::Known(2.5).valid(), Some(2.5));
        assert_eq!(Cost::Unknown.valid(), None);
        assert_eq!(Cost::NotApplicable.valid(), None);
    }

    #[test]
    fn test_invalid_costs() {
        assert!(Cost::Known(f32::NAN).is_invalid());
        assert!(Cost::Known(-1.0).is_invalid());
        assert!(Cost::Known(f32::INFINITY).is_invalid());
        assert!(!Cost::Unknown.is_invalid());
        assert!(!Cost::NotApplicable.is_invalid());
        assert!(!Cost::Known(1.0).is_invalid());
    }

    #[test]
    fn test_cost_display() {
        assert_eq!(Cost::Known(1.5).to_string(), "1.5");
        assert_eq!(Cost::Unknown.to_string(), "?");
        assert_eq!(Cost::NotApplicable.to_string(), "n/a");
    }
}
