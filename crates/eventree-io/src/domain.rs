//! Domain types for eventree-io.

use std::path::{Path, PathBuf};

use crate::IoError;

/// One named column of integer samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    name: String,
    samples: Vec<i64>,
}

impl Channel {
    pub(crate) fn new(name: String, samples: Vec<i64>) -> Self {
        Self { name, samples }
    }

    /// Return the channel name from the CSV header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the samples in file order.
    #[must_use]
    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the channel holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpret the channel as `{0, 1}` event markers.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::NonBinaryEvent`] at the first value other than 0 or 1.
    pub fn as_labels(&self) -> Result<Vec<u8>, IoError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 => Ok(0),
                1 => Ok(1),
                _ => Err(IoError::NonBinaryEvent {
                    channel: self.name.clone(),
                    index,
                    value,
                }),
            })
            .collect()
    }
}

/// Every channel of a recording, in header order.
///
/// Produced by [`ChannelReader`](crate::ChannelReader). All channels hold
/// the same number of samples.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    path: PathBuf,
    channels: Vec<Channel>,
}

impl ChannelSet {
    pub(crate) fn new(path: PathBuf, channels: Vec<Channel>) -> Self {
        Self { path, channels }
    }

    /// Path the set was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a channel by header name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownChannel`] when no column has that name.
    pub fn channel(&self, name: &str) -> Result<&Channel, IoError> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| IoError::UnknownChannel {
                path: self.path.clone(),
                channel: name.to_string(),
            })
    }

    /// Channel names in header order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(Channel::name)
    }

    /// Borrow every channel in header order.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Number of channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.channels.first().map_or(0, Channel::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ChannelSet {
        ChannelSet::new(
            PathBuf::from("events.csv"),
            vec![
                Channel::new("blink".into(), vec![0, 1, 1, 0]),
                Channel::new("raw".into(), vec![12, -3, 0, 1]),
            ],
        )
    }

    #[test]
    fn lookup_by_name() {
        let set = set();
        assert_eq!(set.channel("raw").unwrap().samples(), &[12, -3, 0, 1]);
        assert_eq!(set.channel_names().collect::<Vec<_>>(), vec!["blink", "raw"]);
        assert_eq!(set.n_channels(), 2);
        assert_eq!(set.n_samples(), 4);
    }

    #[test]
    fn unknown_channel() {
        let err = set().channel("jaw").unwrap_err();
        assert!(matches!(err, IoError::UnknownChannel { ref channel, .. } if channel == "jaw"));
    }

    #[test]
    fn binary_channel_as_labels() {
        assert_eq!(set().channel("blink").unwrap().as_labels().unwrap(), vec![0, 1, 1, 0]);
    }

    #[test]
    fn non_binary_channel_rejected() {
        let err = set().channel("raw").unwrap().as_labels().unwrap_err();
        assert!(matches!(
            err,
            IoError::NonBinaryEvent { index: 0, value: 12, .. }
        ));
    }
}
