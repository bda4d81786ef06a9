//! CSV loading of multi-channel sample recordings and event markers.

mod domain;
mod error;
mod reader;

pub use domain::{Channel, ChannelSet};
pub use error::IoError;
pub use reader::ChannelReader;
