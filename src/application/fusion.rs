use super::inference::Inference;
use crate::domain::capability::ThreeState;

/// Resolved verdict after combining declared and observed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub state: ThreeState,
    pub has_conflict: bool,
}

/// Combines the manual state with the evidence inference.
///
/// Precedence: contradictory evidence, then clean evidence, then the manual
/// state, then unknown. Evidence overrides a disagreeing manual state but the
/// disagreement is flagged.
pub fn fuse(manual: ThreeState, inferred: Inference) -> Resolution {
    if inferred.has_conflict {
        return Resolution {
            state: ThreeState::Unknown,
            has_conflict: true,
        };
    }
    if inferred.state.is_known() {
        return Resolution {
            state: inferred.state,
            has_conflict: manual.is_known() && manual != inferred.state,
        };
    }
    Resolution {
        state: manual,
        has_conflict: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ThreeState::*;

    fn clean(state: ThreeState) -> Inference {
        Inference {
            state,
            has_conflict: false,
        }
    }

    const CONTRADICTED: Inference = Inference {
        state: Unknown,
        has_conflict: true,
    };

    #[test]
    fn test_contradicting_evidence_always_wins() {
        for manual in [Supported, Unsupported, Unknown] {
            assert_eq!(
                fuse(manual, CONTRADICTED),
                Resolution {
                    state: Unknown,
                    has_conflict: true
                }
            );
        }
    }

    #[test]
    fn test_evidence_overrides_manual_and_flags_disagreement() {
        assert_eq!(
            fuse(Unsupported, clean(Supported)),
            Resolution {
                state: Supported,
                has_conflict: true
            }
        );
        assert_eq!(
            fuse(Supported, clean(Unsupported)),
            Resolution {
                state: Unsupported,
                has_conflict: true
            }
        );
    }

    #[test]
    fn test_agreement_or_silent_manual_is_clean() {
        assert!(!fuse(Supported, clean(Supported)).has_conflict);
        assert!(!fuse(Unknown, clean(Unsupported)).has_conflict);
        assert_eq!(fuse(Unknown, clean(Unsupported)).state, Unsupported);
    }

    #[test]
    fn test_manual_fills_in_without_evidence() {
        for manual in [Supported, Unsupported, Unknown] {
            assert_eq!(
                fuse(manual, clean(Unknown)),
                Resolution {
                    state: manual,
                    has_conflict: false
                }
            );
        }
    }
}
