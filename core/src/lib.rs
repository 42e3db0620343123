//! Sign Align: pairs up the modules of two independently coded signs.
//!
//! This crate provides:
//! - The sign data model consumed by the aligner (modules, articulators, feature trees)
//! - Per-kind alignment with articulator partitioning and content matching
//! - A coding-order fallback that makes every alignment total
//! - JSON projection of alignments for tooling
//!
//! # Quick Start
//!
//! ```ignore
//! use sign_align::{AlignConfig, ModuleKind, Sign, align_modules};
//!
//! let house: Sign = serde_json::from_str(&std::fs::read_to_string("house.json")?)?;
//! let home: Sign = serde_json::from_str(&std::fs::read_to_string("home.json")?)?;
//!
//! for pair in align_modules(&house, &home, ModuleKind::Movement, &AlignConfig::default()) {
//!     println!("{:?}", pair.ids());
//! }
//! ```

mod articulator;
mod coding_order;
mod config;
mod content;
mod engine;
mod error;
mod handshape;
mod model;
mod output;
mod residue;
mod session;
mod subnode;

/// Aligns the modules of `kind` using the predefined handshape table.
///
/// Never fails: partition check failures are logged and degraded.
pub fn align_modules<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    kind: ModuleKind,
    config: &AlignConfig,
) -> Vec<AlignmentPair<'a>> {
    engine::align_modules(sign1, sign2, kind, config, HandshapeTable::predefined())
}

/// Like [`align_modules`], but returns the partition check error when `config` asks
/// for it.
pub fn try_align_modules<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    kind: ModuleKind,
    config: &AlignConfig,
) -> Result<Vec<AlignmentPair<'a>>, AlignError> {
    engine::try_align_modules(sign1, sign2, kind, config, HandshapeTable::predefined())
}

/// Aligns every module kind of two signs without validating them.
pub fn align_signs<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    config: &AlignConfig,
) -> SignAlignment<'a> {
    engine::align_signs(sign1, sign2, config, HandshapeTable::predefined())
}

/// Validates both signs, then aligns every module kind.
pub fn try_align_signs<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    config: &AlignConfig,
) -> Result<SignAlignment<'a>, AlignError> {
    engine::try_align_signs(sign1, sign2, config, HandshapeTable::predefined())
}

pub use coding_order::align_by_coding_order;
pub use config::{AlignConfig, AlignConfigBuilder, ConfigError, InvariantBehavior};
pub use content::{DirectionLevel, directions_match};
#[doc(hidden)]
pub use engine::{
    align_modules as align_modules_with_table, align_signs as align_signs_with_table,
    try_align_modules as try_align_modules_with_table,
    try_align_signs as try_align_signs_with_table,
};
pub use engine::{AlignmentCounts, KindAlignment, SignAlignment};
pub use error::AlignError;
pub use handshape::{HandshapeName, HandshapeTable, normalize_transcription};
pub use model::{
    Articulator, ArticulatorNumber, ArticulatorSpec, Axis, AxisChoice, CheckState, Direction,
    FeatureNode, FeatureTree, HandConfigurationContent, LocationContent, LocationType,
    MOVEMENT_TYPE_NODE, Module, ModuleContent, ModuleId, ModuleKind, MovementType,
    OrientationContent, Sign,
};
pub use output::json::{
    AlignmentReport, KindReport, PairIds, alignment_to_json, pairs_to_json, serialize_alignment,
    serialize_alignment_pretty,
};
pub use residue::{AlignmentPair, Residue, StageResult};
pub use session::AlignSession;
