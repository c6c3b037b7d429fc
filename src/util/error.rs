//! Error types for holematch.

use crate::detect::validate::ValidationReport;
use thiserror::Error;

/// Result alias for holematch operations.
pub type HoleMatchResult<T> = std::result::Result<T, HoleMatchError>;

/// Errors that can occur when detecting templates or assigning photos.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HoleMatchError {
    /// Width or height is zero, or the buffer size overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The raster could not be decoded.
    #[error("failed to decode raster: {reason}")]
    DecodeFailure { reason: String },
    /// Detected holes violate the template invariants.
    #[error("template validation failed: {0}")]
    InvalidTemplate(ValidationReport),
    /// No slot with this id exists in the collection.
    #[error("slot not found: {slot_id}")]
    SlotNotFound { slot_id: String },
    /// Group ordinal is past the end of the session.
    #[error("group index {index} out of range for {len} groups")]
    GroupIndexOutOfRange { index: usize, len: usize },
    /// A group with this id is already part of the session.
    #[error("group already exists: {group_id}")]
    DuplicateGroup { group_id: String },
    /// A slot list was paired with a template of a different hole count.
    #[error("hole count mismatch: template has {expected} holes, got {actual} slots")]
    HoleCountMismatch { expected: usize, actual: usize },
    /// The registry holds no template with this id.
    #[error("template not found: {template_id}")]
    TemplateNotFound { template_id: String },
    /// A user-supplied transform cannot be normalized.
    #[error("invalid transform: {reason}")]
    InvalidTransform { reason: &'static str },
    /// Detection parameters are inconsistent.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}
