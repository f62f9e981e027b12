//! Flat binary export and import of labeled datasets.
//!
//! Features file: `u64 count`, `u64 width`, then `count * width` f64 values.
//! Labels file: `u64 count`, then `count` i32 values. Everything is in native
//! byte order with no padding, so files are only portable between machines
//! of the same endianness.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use lobsynth_core::error::{Error, Result};
use nom::multi::count;
use nom::number::complete as num;
use nom::number::Endianness;
use nom::sequence::tuple;
use nom::IResult;

use crate::labeling::{Label, LabeledDataset, TrainingExample};

const U64_BYTES: u64 = 8;
const F64_BYTES: u64 = 8;
const I32_BYTES: u64 = 4;

/// Serialize the sequences of `dataset`
pub fn write_features<W: Write>(mut writer: W, dataset: &LabeledDataset) -> Result<()> {
    writer.write_all(&(dataset.len() as u64).to_ne_bytes())?;
    writer.write_all(&(dataset.width() as u64).to_ne_bytes())?;
    for example in dataset.examples() {
        for value in &example.sequence {
            writer.write_all(&value.to_ne_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Serialize the labels of `dataset`
pub fn write_labels<W: Write>(mut writer: W, dataset: &LabeledDataset) -> Result<()> {
    writer.write_all(&(dataset.len() as u64).to_ne_bytes())?;
    for label in dataset.labels() {
        writer.write_all(&label.as_i32().to_ne_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| Error::Io(format!("failed to open {} for writing: {e}", path.display())))
}

/// Write the features and labels files. Stops at the first failure.
pub fn save_dataset<P: AsRef<Path>, Q: AsRef<Path>>(
    dataset: &LabeledDataset,
    features_path: P,
    labels_path: Q,
) -> Result<()> {
    let features_path = features_path.as_ref();
    let labels_path = labels_path.as_ref();

    write_features(create(features_path)?, dataset)?;
    write_labels(create(labels_path)?, dataset)?;

    tracing::info!(
        sequences = dataset.len(),
        width = dataset.width(),
        features = %features_path.display(),
        labels = %labels_path.display(),
        "saved dataset"
    );
    Ok(())
}

fn parse_features_header(input: &[u8]) -> IResult<&[u8], (u64, u64)> {
    tuple((num::u64(Endianness::Native), num::u64(Endianness::Native)))(input)
}

fn parse_labels_header(input: &[u8]) -> IResult<&[u8], u64> {
    num::u64(Endianness::Native)(input)
}

fn parse_error(what: &str, err: &nom::Err<nom::error::Error<&[u8]>>) -> Error {
    Error::MalformedData(format!("{what}: {err:?}"))
}

/// Expected byte length of a file with a `header`-byte header and `n` items of `item` bytes
fn expected_len(header: u64, n: u64, item: u64, what: &str) -> Result<u64> {
    n.checked_mul(item)
        .and_then(|body| body.checked_add(header))
        .ok_or_else(|| Error::MalformedData(format!("{what}: declared size overflows")))
}

fn to_usize(value: u64, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::MalformedData(format!("{what}: {value} too large")))
}

/// Decode a features file. Returns the sequences and the declared width.
pub fn read_features(bytes: &[u8]) -> Result<(Vec<Vec<f64>>, usize)> {
    let actual = bytes.len() as u64;
    if actual < 2 * U64_BYTES {
        return Err(Error::SizeMismatch {
            what: "features header".to_string(),
            expected: 2 * U64_BYTES,
            actual,
        });
    }

    let (rest, (n, width)) =
        parse_features_header(bytes).map_err(|e| parse_error("features header", &e))?;
    let values = n
        .checked_mul(width)
        .ok_or_else(|| Error::MalformedData("features: declared size overflows".to_string()))?;
    let expected = expected_len(2 * U64_BYTES, values, F64_BYTES, "features")?;
    if expected != actual {
        return Err(Error::SizeMismatch {
            what: "features file".to_string(),
            expected,
            actual,
        });
    }
    if n > 0 && width == 0 {
        return Err(Error::MalformedData(format!(
            "features: {n} sequences declared with zero width"
        )));
    }

    let n = to_usize(n, "feature sequence count")?;
    let width = to_usize(width, "feature width")?;
    let (_, sequences) = count(count(num::f64(Endianness::Native), width), n)(rest)
        .map_err(|e| parse_error("features body", &e))?;
    Ok((sequences, width))
}

/// Decode a labels file, validating each value
pub fn read_labels(bytes: &[u8]) -> Result<Vec<Label>> {
    let actual = bytes.len() as u64;
    if actual < U64_BYTES {
        return Err(Error::SizeMismatch {
            what: "labels header".to_string(),
            expected: U64_BYTES,
            actual,
        });
    }

    let (rest, n) = parse_labels_header(bytes).map_err(|e| parse_error("labels header", &e))?;
    let expected = expected_len(U64_BYTES, n, I32_BYTES, "labels")?;
    if expected != actual {
        return Err(Error::SizeMismatch {
            what: "labels file".to_string(),
            expected,
            actual,
        });
    }

    let n = to_usize(n, "label count")?;
    let (_, raw) = count(num::i32(Endianness::Native), n)(rest)
        .map_err(|e| parse_error("labels body", &e))?;
    raw.into_iter().map(Label::try_from).collect()
}

/// Rebuild a dataset from in-memory features and labels files
pub fn decode_dataset(features: &[u8], labels: &[u8]) -> Result<LabeledDataset> {
    let (sequences, _) = read_features(features)?;
    let labels = read_labels(labels)?;

    if sequences.len() != labels.len() {
        return Err(Error::SizeMismatch {
            what: "label count".to_string(),
            expected: sequences.len() as u64,
            actual: labels.len() as u64,
        });
    }

    let examples = sequences
        .into_iter()
        .zip(labels)
        .map(|(sequence, label)| TrainingExample { sequence, label })
        .collect();
    LabeledDataset::new(examples)
}

/// Read a dataset previously written by [`save_dataset`]
pub fn load_dataset<P: AsRef<Path>, Q: AsRef<Path>>(
    features_path: P,
    labels_path: Q,
) -> Result<LabeledDataset> {
    let features_path = features_path.as_ref();
    let labels_path = labels_path.as_ref();

    let features = fs::read(features_path)
        .map_err(|e| Error::Io(format!("failed to read {}: {e}", features_path.display())))?;
    let labels = fs::read(labels_path)
        .map_err(|e| Error::Io(format!("failed to read {}: {e}", labels_path.display())))?;

    let dataset = decode_dataset(&features, &labels)?;
    tracing::info!(
        sequences = dataset.len(),
        width = dataset.width(),
        "loaded dataset"
    );
    Ok(dataset)
}
