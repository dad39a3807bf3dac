#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;
use terminal_capabilities::domain::attempt::AttemptRecord;
use terminal_capabilities::domain::catalog::Dimension;

pub const HEADER: [&str; 12] = [
    "outcome",
    "conclusive",
    "card_network",
    "payment_method",
    "verification_mode",
    "acquiring_mode",
    "checkout_location",
    "acquiring_institution",
    "occurred_at",
    "recorded_at",
    "author_id",
    "notes",
];

const NETWORKS: [&str; 4] = ["visa", "mastercard", "unionpay", "amex"];
const METHODS: [&str; 3] = ["contactless", "chip", "apple_pay"];

pub fn success(dimension: Dimension, value: &str) -> AttemptRecord {
    AttemptRecord::success().with_tag(dimension, value)
}

pub fn conclusive_failure(dimension: Dimension, value: &str) -> AttemptRecord {
    AttemptRecord::failure(true).with_tag(dimension, value)
}

pub fn inconclusive_failure(dimension: Dimension, value: &str) -> AttemptRecord {
    AttemptRecord::failure(false).with_tag(dimension, value)
}

/// Writes `rows` synthetic attempts cycling through outcomes and tags.
pub fn generate_attempts_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 0..rows {
        let (outcome, conclusive) = match i % 5 {
            0 | 1 | 2 => ("success", ""),
            3 => ("failure", "false"),
            _ => ("failure", "true"),
        };
        let author = format!("author-{}", i % 37);
        wtr.write_record([
            outcome,
            conclusive,
            NETWORKS[i % NETWORKS.len()],
            METHODS[i % METHODS.len()],
            "",
            "",
            "",
            "",
            "2026-01-01T00:00:00Z",
            "",
            author.as_str(),
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
