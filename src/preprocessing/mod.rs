//! Preprocessing applied inside the image transforms.
//!
//! - **Normalization**: min-max rescaling of windows and images
//!   - Symmetric [-1, 1] (Gramian angular fields)
//!   - Unit [0, 1] (optional output standardisation)

pub mod normalization;

pub use normalization::{standardize_image, MinMaxNormalizer, Normalizer};
