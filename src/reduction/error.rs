//! Errors raised while reducing an example.
//!
//! Every variant names the example index (0-based position in the stream fed to
//! one learner) so callers can log and move on to the next example. An example
//! that fails validation never reaches the base learner.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReductionError {
    /// The example cannot be reduced at all.
    #[error("Malformed example {example}: {reason}")]
    MalformedExample { example: u64, reason: String },

    /// Two candidates share a label id.
    #[error("Example {example} lists label {label_id} more than once")]
    DuplicateLabelId { example: u64, label_id: u32 },

    /// Label id outside `1..=num_classes`.
    #[error("Example {example}: label {label_id} is outside 1..={num_classes}")]
    LabelOutOfRange {
        example: u64,
        label_id: u32,
        num_classes: u32,
    },

    /// A label-dependent reduction got a candidate without its own features.
    #[error("Example {example}: label {label_id} has no label-dependent features")]
    MissingLabelFeatures { example: u64, label_id: u32 },
}

impl ReductionError {
    /// Index of the example that failed.
    pub fn example_index(&self) -> u64 {
        match self {
            ReductionError::MalformedExample { example, .. }
            | ReductionError::DuplicateLabelId { example, .. }
            | ReductionError::LabelOutOfRange { example, .. }
            | ReductionError::MissingLabelFeatures { example, .. } => *example,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = ReductionError::MalformedExample {
            example: 4,
            reason: "example has no candidates".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed example 4: example has no candidates"
        );
    }

    #[test]
    fn test_duplicate_display() {
        let err = ReductionError::DuplicateLabelId {
            example: 0,
            label_id: 3,
        };
        assert_eq!(err.to_string(), "Example 0 lists label 3 more than once");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ReductionError::LabelOutOfRange {
            example: 9,
            label_id: 12,
            num_classes: 10,
        };
        assert_eq!(err.to_string(), "Example 9: label 12 is outside 1..=10");
    }

    #[test]
    fn test_example_index() {
        let err = ReductionError::MissingLabelFeatures {
            example: 17,
            label_id: 2,
        };
        assert_eq!(err.example_index(), 17);
    }
}
