//! larview-core: Display composition and thresholding for multi-plane
//! detector event images.
//!
//! This crate turns an ordered sequence of raw intensity planes into a
//! false-color (height, width, 3) display matrix, supports clip-based
//! re-thresholding of that matrix, and extracts region-of-interest bounding
//! boxes for overlay rendering.
//!

pub mod composition;
pub mod error;
pub mod image;
pub mod plane;
pub mod roi;

pub use composition::{ChannelComposite, GrayscaleComposite, ImageComposition};
pub use error::{Error, Result};
pub use image::EventImage;
pub use plane::{uniform_shape, ChannelMap, RawPlane, DISPLAY_CHANNELS};
pub use roi::{extract_display_rois, BoundingBox, DisplayRoi, RoiRecord};
