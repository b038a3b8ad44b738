//! Error types for pattern setup and configuration
//!
//! Interaction itself never fails: gestures that cannot be applied are
//! silently ignored. Errors only surface while wiring patterns together or
//! loading configuration.

use arkflow_core::geometry::Axis;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A scrollable can only nest inside a parent scrolling on the same axis
    #[error("cannot nest a {child:?} scrollable inside a {parent:?} parent")]
    AxisMismatch { child: Axis, parent: Axis },

    /// A scrollable was attached to itself
    #[error("a scrollable cannot be its own nested-scroll parent")]
    SelfParent,

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pixel buffer length does not match the image size
    #[error("pixel buffer of {len} bytes does not hold a {width}x{height} RGBA image")]
    PixelMapSize { width: u32, height: u32, len: usize },

    /// Configuration text is not valid TOML
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for setup operations
pub type Result<T> = std::result::Result<T, Error>;
