//! CSV channel reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::{Channel, ChannelSet};
use crate::IoError;

/// Reads a multi-channel recording from a CSV file.
///
/// Expected CSV format:
/// - Header row required: an id column followed by one column per channel
/// - `id,<channel>,<channel>,...`
/// - One row per sample, every cell after the id an integer
///
/// Rows are transposed so each channel holds its samples in file order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoChannels`] | Header has only the id column |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidSample`] | Cell is not an integer |
pub struct ChannelReader {
    path: PathBuf,
}

impl ChannelReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`ChannelSet`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<ChannelSet, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so short rows surface as InconsistentRowLength.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected_cols = header.len();
        let names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        if names.is_empty() {
            return Err(IoError::NoChannels {
                path: self.path.clone(),
            });
        }
        debug!(n_channels = names.len(), "read CSV header");

        let mut columns: Vec<Vec<i64>> = vec![Vec::new(); names.len()];
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    row_id: record.get(0).unwrap_or("").to_string(),
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            for ((raw, column), name) in record.iter().skip(1).zip(&mut columns).zip(&names) {
                let value: i64 = raw.parse().map_err(|_| IoError::InvalidSample {
                    path: self.path.clone(),
                    row_index,
                    channel: name.clone(),
                    raw: raw.to_string(),
                })?;
                column.push(value);
            }
        }

        let n_samples = columns.first().map_or(0, Vec::len);
        if n_samples == 0 {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let channels = names
            .into_iter()
            .zip(columns)
            .map(|(name, samples)| Channel::new(name, samples))
            .collect::<Vec<_>>();

        info!(n_channels = channels.len(), n_samples, "channels loaded");

        Ok(ChannelSet::new(self.path.clone(), channels))
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
