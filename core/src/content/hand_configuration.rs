use super::{ContentMatcher, MatchContext};
use crate::coding_order::align_by_coding_order;
use crate::error::AlignError;
use crate::handshape::{HandshapeName, HandshapeTable};
use crate::model::{Module, ModuleKind};
use crate::residue::{Residue, StageResult, pair_greedily};

/// Cascade stages, most to least specific. Each runs on the previous stage's residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandshapeStage {
    Name,
    Base,
    Variant,
    Forearm,
}

impl HandshapeStage {
    pub(crate) const ALL: [HandshapeStage; 4] = [
        HandshapeStage::Name,
        HandshapeStage::Base,
        HandshapeStage::Variant,
        HandshapeStage::Forearm,
    ];

    pub(crate) fn accepts(self, left: &Module, right: &Module, table: &HandshapeTable) -> bool {
        match self {
            HandshapeStage::Name => {
                resolved_pair(left, right, table).is_some_and(|(l, r)| l.name == r.name)
            }
            HandshapeStage::Base => {
                resolved_pair(left, right, table).is_some_and(|(l, r)| l.shares_base(r))
            }
            HandshapeStage::Variant => {
                resolved_pair(left, right, table).is_some_and(|(l, r)| l.shares_variant(r))
            }
            HandshapeStage::Forearm => match (left.forearm(), right.forearm()) {
                (Some(l), Some(r)) => l == r,
                _ => false,
            },
        }
    }
}

fn resolved_pair<'t>(
    left: &Module,
    right: &Module,
    table: &'t HandshapeTable,
) -> Option<(&'t HandshapeName, &'t HandshapeName)> {
    let l = table.resolve(left.transcription()?)?;
    let r = table.resolve(right.transcription()?)?;
    Some((l, r))
}

/// Name, base, variant, then forearm; leftovers settle by coding order.
pub(crate) struct HandConfigurationMatcher;

impl ContentMatcher for HandConfigurationMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        Some(ModuleKind::HandConfiguration)
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        let mut result = StageResult::unmatched(residue);
        for stage in HandshapeStage::ALL {
            if !result.residue.is_contested() {
                break;
            }
            let pass = pair_greedily(std::mem::take(&mut result.residue), |l, r| {
                stage.accepts(l, r, ctx.handshapes)
            });
            if !pass.pairs.is_empty() {
                log::trace!("hand configuration: {} pairs at {:?} stage", pass.pairs.len(), stage);
            }
            result.absorb(pass);
        }

        let fallback = align_by_coding_order(std::mem::take(&mut result.residue), false);
        log::debug!(
            "hand configuration: {} content pairs, {} coding-order pairs",
            result.pairs.len(),
            fallback.pairs.len()
        );
        result.absorb(fallback);
        Ok(result)
    }
}
