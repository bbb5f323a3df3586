//! Error types for the watch face

use thiserror::Error;

use crate::ui::IconId;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The image store could not hand out the requested icon
    #[error("icon {0:?} could not be loaded")]
    ImageUnavailable(IconId),

    /// No free slot left in the layer table
    #[error("layer table is full")]
    LayerLimit,

    /// The layer handle does not refer to a live layer of the expected kind
    #[error("unknown layer")]
    UnknownLayer,

    /// Text does not fit into the text region buffer
    #[error("text does not fit into the text region")]
    TextTooLong,

    /// A face handler ran before the face was loaded
    #[error("watch face is not loaded")]
    NotLoaded,

    /// Formatting into a fixed buffer failed
    #[error("formatting failed")]
    Format,
}

pub type Result<T> = core::result::Result<T, Error>;
