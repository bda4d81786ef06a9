//! I/O error types for eventree-io.

use std::path::PathBuf;

/// Errors from reading and validating channel CSV files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header names no channel after the id column.
    #[error("no channel columns in header of {path}")]
    NoChannels {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} (id {row_id}) has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Value of the id column of the offending row.
        row_id: String,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell is not an integer.
    #[error("invalid sample in {path}: row {row_index}, channel \"{channel}\", raw value \"{raw}\"")]
    InvalidSample {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Channel column of the cell.
        channel: String,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when an event channel holds a value other than 0 or 1.
    #[error("event channel \"{channel}\" has value {value} at sample {index}, expected 0 or 1")]
    NonBinaryEvent {
        /// Name of the event channel.
        channel: String,
        /// Sample position of the offending value.
        index: usize,
        /// The offending value.
        value: i64,
    },

    /// Returned when a requested channel is not in the file.
    #[error("unknown channel \"{channel}\" in {path}")]
    UnknownChannel {
        /// Path to the CSV file.
        path: PathBuf,
        /// The requested channel name.
        channel: String,
    },
}
