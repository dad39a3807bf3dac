use crate::domain::attempt::{AttemptRecord, Outcome};
use crate::domain::capability::{CapabilityKey, EvidenceBucket};
use crate::domain::catalog::DimensionCatalog;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Evidence buckets keyed by dimension value.
pub type EvidenceMap<'a> = BTreeMap<CapabilityKey, EvidenceBucket<'a>>;

/// How many attempts an evidence note names before summarising the rest.
pub const EXAMPLE_LIMIT: usize = 2;

/// Groups attempts into supporting and refuting evidence per dimension value.
///
/// Successes support every value they are tagged with, conclusive failures
/// refute them. Inconclusive failures and unknown outcomes contribute nothing,
/// and neither do tags the catalog does not recognize.
///
/// Buckets are ordered newest first so the result does not depend on the
/// order of `attempts`.
pub fn aggregate<'a>(attempts: &'a [AttemptRecord], catalog: &DimensionCatalog) -> EvidenceMap<'a> {
    let mut buckets = EvidenceMap::new();

    for attempt in attempts {
        let supporting = match (attempt.outcome, attempt.is_conclusive_failure) {
            (Outcome::Success, _) => true,
            (Outcome::Failure, true) => false,
            (outcome, _) => {
                debug!(?outcome, author = ?attempt.author_id, "Excluding inconclusive attempt");
                continue;
            }
        };

        for (dimension, raw) in attempt.tags() {
            let Some(value) = catalog.canonicalize(dimension, raw) else {
                debug!(%dimension, value = raw, "Ignoring tag outside the catalog");
                continue;
            };
            let bucket = buckets
                .entry(CapabilityKey::new(dimension, value))
                .or_default();
            if supporting {
                bucket.supporting.push(attempt);
            } else {
                bucket.refuting.push(attempt);
            }
        }
    }

    for bucket in buckets.values_mut() {
        bucket.supporting.sort_by(|a, b| display_order(a, b));
        bucket.refuting.sort_by(|a, b| display_order(a, b));
    }
    buckets
}

// Newest first, undated last, then a stable tie-break on the displayed fields.
fn display_order(a: &AttemptRecord, b: &AttemptRecord) -> Ordering {
    let by_time = match (a.effective_time(), b.effective_time()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time
        .then_with(|| a.author_id.cmp(&b.author_id))
        .then_with(|| a.notes.cmp(&b.notes))
}

/// Human-readable digest of a bucket, e.g.
/// `"2 success (alice 2026-03-02, bob 2026-03-01); 1 conclusive failure (carol undated)"`.
///
/// Each side names at most [`EXAMPLE_LIMIT`] attempts as `author date` and
/// folds the rest into `+N more`.
///
/// Display only: nothing in resolution reads it.
pub fn describe(bucket: &EvidenceBucket<'_>) -> Option<String> {
    if bucket.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if !bucket.supporting.is_empty() {
        parts.push(format!(
            "{} success ({})",
            bucket.supporting.len(),
            examples(&bucket.supporting)
        ));
    }
    if !bucket.refuting.is_empty() {
        let noun = if bucket.refuting.len() == 1 {
            "conclusive failure"
        } else {
            "conclusive failures"
        };
        parts.push(format!(
            "{} {} ({})",
            bucket.refuting.len(),
            noun,
            examples(&bucket.refuting)
        ));
    }
    Some(parts.join("; "))
}

fn examples(attempts: &[&AttemptRecord]) -> String {
    let mut shown: Vec<String> = attempts
        .iter()
        .take(EXAMPLE_LIMIT)
        .map(|a| {
            let author = a.author_id.as_deref().unwrap_or("anonymous");
            match a.effective_time() {
                Some(at) => format!("{} {}", author, at.format("%Y-%m-%d")),
                None => format!("{} undated", author),
            }
        })
        .collect();
    let hidden = attempts.len().saturating_sub(EXAMPLE_LIMIT);
    if hidden > 0 {
        shown.push(format!("+{} more", hidden));
    }
    shown.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attempt::parse_timestamp;
    use crate::domain::catalog::Dimension;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn key(dimension: Dimension, value: &str) -> CapabilityKey {
        CapabilityKey::new(dimension, value)
    }

    #[test]
    fn test_success_supports_every_tag() {
        let attempts = vec![
            AttemptRecord::success()
                .with_tag(Dimension::CardNetwork, "visa")
                .with_tag(Dimension::PaymentMethod, "contactless"),
        ];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&key(Dimension::CardNetwork, "visa")].supporting.len(), 1);
        assert_eq!(
            buckets[&key(Dimension::PaymentMethod, "contactless")]
                .supporting
                .len(),
            1
        );
    }

    #[test]
    fn test_conclusive_failure_refutes() {
        let attempts = vec![AttemptRecord::failure(true).with_tag(Dimension::CardNetwork, "amex")];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());

        let bucket = &buckets[&key(Dimension::CardNetwork, "amex")];
        assert!(bucket.supporting.is_empty());
        assert_eq!(bucket.refuting.len(), 1);
    }

    #[test]
    fn test_inconclusive_and_unknown_are_excluded() {
        let attempts = vec![
            AttemptRecord::failure(false).with_tag(Dimension::CardNetwork, "visa"),
            AttemptRecord::new(Outcome::Unknown).with_tag(Dimension::CardNetwork, "visa"),
            // The conclusive flag means nothing on an unknown outcome.
            AttemptRecord {
                is_conclusive_failure: true,
                ..AttemptRecord::new(Outcome::Unknown)
            }
            .with_tag(Dimension::CardNetwork, "visa"),
        ];
        assert!(aggregate(&attempts, &DimensionCatalog::new()).is_empty());
    }

    #[test]
    fn test_aliases_merge_and_unknown_tags_are_ignored() {
        let attempts = vec![
            AttemptRecord::success().with_tag(Dimension::CardNetwork, "Mastercard"),
            AttemptRecord::success().with_tag(Dimension::CardNetwork, "master"),
            AttemptRecord::success().with_tag(Dimension::CardNetwork, "store_card"),
        ];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());

        assert_eq!(buckets.len(), 1);
        assert_eq!(
            buckets[&key(Dimension::CardNetwork, "mastercard")]
                .supporting
                .len(),
            2
        );
    }

    #[test]
    fn test_untagged_attempt_contributes_nothing() {
        let attempts = vec![AttemptRecord::success(), AttemptRecord::failure(true)];
        assert!(aggregate(&attempts, &DimensionCatalog::new()).is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ignored_inputs_are_logged_at_debug() {
        let log = CapturedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish();
        let attempts = vec![
            AttemptRecord::failure(false).with_tag(Dimension::CardNetwork, "visa"),
            AttemptRecord::success().with_tag(Dimension::CardNetwork, "store_card"),
        ];

        tracing::subscriber::with_default(subscriber, || {
            aggregate(&attempts, &DimensionCatalog::new());
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Excluding inconclusive attempt"));
        assert!(output.contains("Ignoring tag outside the catalog"));
        assert_eq!(output.matches("DEBUG").count(), 2);
    }

    #[test]
    fn test_describe_truncates_examples() {
        let day = |d: &str| parse_timestamp(&format!("2026-03-{d}T12:00:00Z")).unwrap();
        let attempts = vec![
            AttemptRecord::success()
                .with_tag(Dimension::CardNetwork, "visa")
                .by("alice")
                .occurred(day("01")),
            AttemptRecord::success()
                .with_tag(Dimension::CardNetwork, "visa")
                .by("bob")
                .occurred(day("03")),
            AttemptRecord::success()
                .with_tag(Dimension::CardNetwork, "visa")
                .by("dave"),
            AttemptRecord::failure(true)
                .with_tag(Dimension::CardNetwork, "visa")
                .by("carol")
                .recorded(day("02")),
        ];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());
        let note = describe(&buckets[&key(Dimension::CardNetwork, "visa")]).unwrap();

        assert_eq!(
            note,
            "3 success (bob 2026-03-03, alice 2026-03-01, +1 more); 1 conclusive failure (carol 2026-03-02)"
        );
    }

    #[test]
    fn test_describe_mixed_bucket() {
        let day = |d: &str| parse_timestamp(&format!("2026-03-{d}T08:30:00Z")).unwrap();
        let attempts = vec![
            AttemptRecord::failure(true)
                .with_tag(Dimension::PaymentMethod, "chip")
                .by("carol"),
            AttemptRecord::success()
                .with_tag(Dimension::PaymentMethod, "chip")
                .by("bob")
                .occurred(day("01")),
            AttemptRecord::success()
                .with_tag(Dimension::PaymentMethod, "chip")
                .by("alice")
                .occurred(day("02")),
        ];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());
        let note = describe(&buckets[&key(Dimension::PaymentMethod, "chip")]).unwrap();

        assert_eq!(
            note,
            "2 success (alice 2026-03-02, bob 2026-03-01); 1 conclusive failure (carol undated)"
        );
    }

    #[test]
    fn test_describe_plural_failures() {
        let attempts = vec![
            AttemptRecord::failure(true)
                .with_tag(Dimension::AcquiringMode, "dcc")
                .by("erin"),
            AttemptRecord::failure(true).with_tag(Dimension::AcquiringMode, "dcc"),
        ];
        let buckets = aggregate(&attempts, &DimensionCatalog::new());

        assert_eq!(
            describe(&buckets[&key(Dimension::AcquiringMode, "dcc")]).as_deref(),
            Some("2 conclusive failures (anonymous undated, erin undated)")
        );
    }

    #[test]
    fn test_describe_empty_bucket() {
        assert_eq!(describe(&EvidenceBucket::default()), None);
    }
}
