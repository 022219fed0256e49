//! Establishment setting classification.
//!
//! [`Classifier`] resolves the category, designation and area of one
//! establishment against tables resolved once per session, and
//! [`SettingCodeParser`] recovers those components from a composite code.

#![deny(unsafe_code)]

pub mod classifier;
pub mod code;
pub mod error;
pub mod strategy;

pub use crate::classifier::Classifier;
pub use crate::code::{ParsedCode, SettingCodeParser};
pub use crate::error::CodeError;
pub use crate::strategy::{
    AreaStrategy, DesignationStrategy, GENERAL_DESIGNATION, IN_AREA, InAreaSplit, NeedCascade,
    OUT_OF_AREA,
};
