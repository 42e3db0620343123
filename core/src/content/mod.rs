//! Per-kind content matchers.
//!
//! Each matcher consumes a residue of same-kind modules (already narrowed to one
//! articulator group where partitioning applies) and returns the pairs it can justify
//! from module content plus what is left. Matchers end with a coding-order pass that
//! never pads with `None`; padding is left to the caller's final fallback.

mod hand_configuration;
mod location;
mod movement;
mod orientation;

pub(crate) use hand_configuration::HandConfigurationMatcher;
pub(crate) use location::LocationMatcher;
pub(crate) use movement::MovementMatcher;
pub use orientation::{DirectionLevel, directions_match};
pub(crate) use orientation::OrientationMatcher;

use crate::coding_order::align_by_coding_order;
use crate::config::{AlignConfig, InvariantBehavior};
use crate::error::AlignError;
use crate::handshape::HandshapeTable;
use crate::model::ModuleKind;
use crate::residue::{Residue, StageResult};

/// Shared, read-only inputs for one alignment call.
pub(crate) struct MatchContext<'c> {
    pub config: &'c AlignConfig,
    pub handshapes: &'c HandshapeTable,
}

pub(crate) trait ContentMatcher: Sync {
    fn kind(&self) -> Option<ModuleKind>;

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError>;
}

/// Content-agnostic matcher for kinds without content rules (relation, non-manual).
pub(crate) struct NoContentMatcher;

impl ContentMatcher for NoContentMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        None
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        _ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        Ok(StageResult::unmatched(residue))
    }
}

/// Pairs by coding order alone; used when content matching is switched off.
pub(crate) struct CodingOrderOnlyMatcher;

impl ContentMatcher for CodingOrderOnlyMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        None
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        _ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        Ok(align_by_coding_order(residue, false))
    }
}

static MOVEMENT: MovementMatcher = MovementMatcher;
static LOCATION: LocationMatcher = LocationMatcher;
static ORIENTATION: OrientationMatcher = OrientationMatcher;
static HAND_CONFIGURATION: HandConfigurationMatcher = HandConfigurationMatcher;
static NO_CONTENT: NoContentMatcher = NoContentMatcher;
static CODING_ORDER_ONLY: CodingOrderOnlyMatcher = CodingOrderOnlyMatcher;

/// Looks up the matcher for `kind` under `config`.
pub(crate) fn content_matcher(
    kind: ModuleKind,
    config: &AlignConfig,
) -> &'static dyn ContentMatcher {
    if !config.enable_content_matching {
        return match kind {
            ModuleKind::Relation | ModuleKind::NonManual | ModuleKind::SignType => &NO_CONTENT,
            _ => &CODING_ORDER_ONLY,
        };
    }
    match kind {
        ModuleKind::Movement => &MOVEMENT,
        ModuleKind::Location => &LOCATION,
        ModuleKind::Orientation => &ORIENTATION,
        ModuleKind::HandConfiguration => &HAND_CONFIGURATION,
        ModuleKind::Relation | ModuleKind::NonManual | ModuleKind::SignType => &NO_CONTENT,
    }
}

/// After a partition group has been exhaustively matched, at most one side may still
/// hold modules for it.
pub(crate) fn check_group_residue(
    kind: ModuleKind,
    group: &str,
    residue: &Residue<'_>,
    ctx: &MatchContext<'_>,
) -> Result<(), AlignError> {
    if !residue.is_contested() {
        return Ok(());
    }
    match ctx.config.on_invariant_violation {
        InvariantBehavior::ReturnError => Err(AlignError::InvariantViolation {
            kind,
            group: group.to_string(),
            left: residue.left.len(),
            right: residue.right.len(),
        }),
        InvariantBehavior::Degrade => {
            log::warn!(
                "{} group '{}' left modules on both sides (left={}, right={}); folding into fallback",
                kind,
                group,
                residue.left.len(),
                residue.right.len()
            );
            Ok(())
        }
    }
}
