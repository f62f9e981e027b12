//! CSV export of a snapshot history.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use lobsynth_core::constants::SNAPSHOT_LEVELS;
use lobsynth_core::error::{Error, Result};
use lobsynth_core::types::Side;

use crate::snapshot::BookSnapshot;

/// Fixed leading columns of the history CSV
const BASE_COLUMNS: [&str; 7] = [
    "timestamp",
    "mid_price",
    "spread",
    "best_bid_price",
    "best_bid_size",
    "best_ask_price",
    "best_ask_size",
];

/// Header row: base columns, then price/size pairs for each bid level, then each ask level
#[must_use]
pub fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = BASE_COLUMNS.iter().map(ToString::to_string).collect();
    for side in [Side::Bid, Side::Ask] {
        for i in 0..SNAPSHOT_LEVELS {
            header.push(format!("{}_price_{i}", side.label()));
            header.push(format!("{}_size_{i}", side.label()));
        }
    }
    header
}

fn csv_row(snapshot: &BookSnapshot) -> Vec<String> {
    let mut row = vec![
        snapshot.timestamp_secs().to_string(),
        snapshot.mid_price.to_string(),
        snapshot.spread.to_string(),
        snapshot.best_bid.price.to_string(),
        snapshot.best_bid.volume.to_string(),
        snapshot.best_ask.price.to_string(),
        snapshot.best_ask.volume.to_string(),
    ];
    for side in [Side::Bid, Side::Ask] {
        for i in 0..SNAPSHOT_LEVELS {
            let level = snapshot.level(side, i);
            row.push(level.price.to_string());
            row.push(level.volume.to_string());
        }
    }
    row
}

fn csv_error(err: csv::Error) -> Error {
    Error::Io(err.to_string())
}

/// Write `history` as CSV to any writer. Returns the number of data rows.
pub fn write_history_csv<W: Write>(writer: W, history: &[BookSnapshot]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(csv_header()).map_err(csv_error)?;

    for snapshot in history {
        csv_writer.write_record(csv_row(snapshot)).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(history.len())
}

/// Write `history` as CSV to `path`, creating or truncating the file
pub fn save_history_csv<P: AsRef<Path>>(path: P, history: &[BookSnapshot]) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::Io(format!("failed to open {} for writing: {e}", path.display())))?;
    let rows = write_history_csv(file, history)?;
    tracing::info!(rows, path = %path.display(), "saved snapshot history");
    Ok(rows)
}
