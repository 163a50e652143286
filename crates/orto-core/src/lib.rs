//! Core primitives for the orto spell checker.
//!
//! This crate holds the leaf data types that the engine crate builds on:
//!
//! - [`flags`] -- 16-bit morphological flag codes and sorted flag sets
//! - [`character`] -- per-character case mapping and classification
//! - [`casing`] -- whole-word casing classification and conversion
//! - [`condition`] -- the restricted regular expressions used by affix
//!   entries (literals, `.`, `[...]`, `[^...]`)
//!
//! Everything here is independent of dictionary format and engine state.

pub mod casing;
pub mod character;
pub mod condition;
pub mod flags;
