//! The concrete validation stages, in pipeline order.

mod character;
mod decoding;
mod length;
mod normalization;
mod pattern;

pub use character::CharacterValidationStage;
pub use decoding::DecodingStage;
pub use length::LengthValidationStage;
pub use normalization::{NormalizationMode, NormalizationStage};
pub use pattern::PatternMatchingStage;
