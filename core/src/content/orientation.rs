use super::{ContentMatcher, MatchContext};
use crate::coding_order::align_by_coding_order;
use crate::error::AlignError;
use crate::model::{AxisChoice, Direction, Module, ModuleKind};
use crate::residue::{Residue, StageResult, pair_greedily};

/// Precision level for comparing two orientation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionLevel {
    /// The (horizontal, vertical, sagittal) triples are identical.
    Specific,
    /// Every component of the first direction agrees with the second direction on its
    /// axis. A component recorded as `AxisOnly` agrees with any choice on that axis.
    General,
}

pub fn directions_match(first: &Direction, second: &Direction, level: DirectionLevel) -> bool {
    match level {
        DirectionLevel::Specific => first == second,
        DirectionLevel::General => {
            !first.is_empty()
                && first.components().all(|(axis, choice)| {
                    second
                        .component(axis)
                        .is_some_and(|other| choices_agree(choice, other))
                })
        }
    }
}

fn choices_agree(a: AxisChoice, b: AxisChoice) -> bool {
    a == b || a == AxisChoice::AxisOnly || b == AxisChoice::AxisOnly
}

/// Palm direction first, then finger-root direction, each at specific then general
/// precision. Whatever survives all passes is settled by coding order.
pub(crate) struct OrientationMatcher;

impl ContentMatcher for OrientationMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        Some(ModuleKind::Orientation)
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        let levels: &[DirectionLevel] = if ctx.config.enable_general_orientation_matching {
            &[DirectionLevel::Specific, DirectionLevel::General]
        } else {
            &[DirectionLevel::Specific]
        };

        let mut result = StageResult::unmatched(residue);
        for accessor in [Module::palm_direction, Module::root_direction] {
            for &level in levels {
                if !result.residue.is_contested() {
                    break;
                }
                let pass = pair_greedily(std::mem::take(&mut result.residue), |l, r| {
                    match (accessor(l), accessor(r)) {
                        (Some(a), Some(b)) => directions_match(a, b, level),
                        _ => false,
                    }
                });
                result.absorb(pass);
            }
        }

        let fallback = align_by_coding_order(std::mem::take(&mut result.residue), false);
        log::debug!(
            "orientation: {} direction pairs, {} coding-order pairs",
            result.pairs.len(),
            fallback.pairs.len()
        );
        result.absorb(fallback);
        Ok(result)
    }
}
