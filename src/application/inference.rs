use crate::domain::capability::{EvidenceBucket, ThreeState};

/// What field evidence alone says about a capability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inference {
    pub state: ThreeState,
    /// Supporting and refuting evidence both exist.
    pub has_conflict: bool,
}

/// Infers a state from one evidence bucket. Only the presence of each kind of
/// evidence matters, never the counts.
pub fn infer(bucket: &EvidenceBucket<'_>) -> Inference {
    match (!bucket.supporting.is_empty(), !bucket.refuting.is_empty()) {
        (false, false) => Inference {
            state: ThreeState::Unknown,
            has_conflict: false,
        },
        (true, false) => Inference {
            state: ThreeState::Supported,
            has_conflict: false,
        },
        (false, true) => Inference {
            state: ThreeState::Unsupported,
            has_conflict: false,
        },
        (true, true) => Inference {
            state: ThreeState::Unknown,
            has_conflict: true,
        },
    }
}
