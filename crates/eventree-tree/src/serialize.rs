//! Model files: a fixed header followed by the bincode-encoded forest.
//!
//! The header carries the format version and the forest's shape. Loading
//! checks the version before decoding the forest, then checks the recorded
//! shape against what was decoded.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::TreeError;
use crate::forest::Forest;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Leading record of a model file. `format_version` must stay first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct ModelHeader {
    format_version: u32,
    n_trees: usize,
    frame_size: usize,
    n_frames: usize,
    node_count: usize,
}

impl ModelHeader {
    fn describe(forest: &Forest) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            n_trees: forest.n_trees(),
            frame_size: forest.frame_size(),
            n_frames: forest.n_frames(),
            node_count: forest.node_count(),
        }
    }

    /// First shape field where `self` and `decoded` disagree.
    fn mismatch(&self, decoded: &Self) -> Option<(&'static str, usize, usize)> {
        [
            ("n_trees", self.n_trees, decoded.n_trees),
            ("frame_size", self.frame_size, decoded.frame_size),
            ("n_frames", self.n_frames, decoded.n_frames),
            ("node_count", self.node_count, decoded.node_count),
        ]
        .into_iter()
        .find(|&(_, recorded, actual)| recorded != actual)
    }
}

impl Forest {
    /// Save the model to a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::WriteModel`] | file creation or flush failed |
    /// | [`TreeError::SerializeModel`] | bincode encoding failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let path = path.as_ref();
        let write_error = |source| TreeError::WriteModel {
            path: path.to_path_buf(),
            source,
        };

        let header = ModelHeader::describe(self);
        let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
        bincode::serialize_into(&mut writer, &header)
            .and_then(|()| bincode::serialize_into(&mut writer, self))
            .map_err(|source| TreeError::SerializeModel { source })?;
        writer.flush().map_err(write_error)?;

        info!(
            n_trees = header.n_trees,
            frame_size = header.frame_size,
            node_count = header.node_count,
            "model saved"
        );
        Ok(())
    }

    /// Load a model from a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::ReadModel`] | file open failed |
    /// | [`TreeError::DeserializeModel`] | header or forest decoding failed |
    /// | [`TreeError::IncompatibleModelVersion`] | format version mismatch |
    /// | [`TreeError::ModelHeaderMismatch`] | header shape disagrees with the forest |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let decode_error = |source| TreeError::DeserializeModel {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| TreeError::ReadModel {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let header: ModelHeader = bincode::deserialize_from(&mut reader).map_err(decode_error)?;
        if header.format_version != FORMAT_VERSION {
            return Err(TreeError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: header.format_version,
                path: path.to_path_buf(),
            });
        }

        let forest: Forest = bincode::deserialize_from(&mut reader).map_err(decode_error)?;
        if let Some((field, recorded, decoded)) = header.mismatch(&ModelHeader::describe(&forest)) {
            return Err(TreeError::ModelHeaderMismatch {
                path: path.to_path_buf(),
                field,
                recorded,
                decoded,
            });
        }

        debug!(
            n_trees = header.n_trees,
            frame_size = header.frame_size,
            node_count = header.node_count,
            "model loaded"
        );
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::config::train;

    const SAMPLES: [i64; 7] = [10, 15, 11, 12, 8, 3, 7];
    const LABELS: [u8; 7] = [0, 1, 0, 1, 0, 0, 1];

    /// Write `header` followed by `forest` the way `save` lays them out.
    fn write_raw(path: &Path, header: &ModelHeader, forest: Option<&Forest>) {
        let mut file = File::create(path).unwrap();
        bincode::serialize_into(&mut file, header).unwrap();
        if let Some(forest) = forest {
            bincode::serialize_into(&mut file, forest).unwrap();
        }
        file.flush().unwrap();
    }

    #[test]
    fn round_trip_identical_predictions() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("channel.bin");

        let forest = train(&SAMPLES, &LABELS, 2, 1, 0).unwrap();
        forest.save(&model_path).unwrap();
        let loaded = Forest::load(&model_path).unwrap();

        assert_eq!(loaded.node_count(), forest.node_count());
        assert_eq!(loaded.frame_size(), 2);
        assert_eq!(loaded.config(), forest.config());
        assert_eq!(
            loaded.score_series(&SAMPLES).unwrap(),
            forest.score_series(&SAMPLES).unwrap()
        );
        let tree = &loaded.trees()[0];
        assert_eq!(tree.node_frames(tree.root()).len(), 6);
    }

    #[test]
    fn header_describes_forest() {
        let forest = train(&SAMPLES, &LABELS, 2, 1, 0).unwrap();
        let header = ModelHeader::describe(&forest);
        assert_eq!(header.n_trees, 1);
        assert_eq!(header.frame_size, 2);
        assert_eq!(header.n_frames, 6);
        assert_eq!(header.node_count, 3);
        assert_eq!(header.mismatch(&header), None);
    }

    #[test]
    fn load_nonexistent_file_error() {
        let dir = TempDir::new().unwrap();
        let err = Forest::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, TreeError::ReadModel { .. }));
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a valid bincode file").unwrap();
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(err, TreeError::DeserializeModel { .. }));
    }

    #[test]
    fn version_checked_before_forest_is_decoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        let forest = train(&SAMPLES, &LABELS, 2, 1, 0).unwrap();
        let header = ModelHeader {
            format_version: FORMAT_VERSION + 1,
            ..ModelHeader::describe(&forest)
        };
        // No forest body: a newer layout need not be decodable.
        write_raw(&path, &header, None);
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(
            err,
            TreeError::IncompatibleModelVersion { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn header_shape_must_match_forest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mismatch.bin");
        let forest = train(&SAMPLES, &LABELS, 2, 1, 0).unwrap();
        let header = ModelHeader {
            frame_size: 4,
            ..ModelHeader::describe(&forest)
        };
        write_raw(&path, &header, Some(&forest));
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(
            err,
            TreeError::ModelHeaderMismatch { field: "frame_size", recorded: 4, decoded: 2, .. }
        ));
    }

    #[test]
    fn header_without_forest_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("truncated.bin");
        let forest = train(&SAMPLES, &LABELS, 2, 1, 0).unwrap();
        write_raw(&path, &ModelHeader::describe(&forest), None);
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(err, TreeError::DeserializeModel { .. }));
    }
}
