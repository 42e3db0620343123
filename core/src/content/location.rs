use super::{ContentMatcher, MatchContext, check_group_residue};
use crate::coding_order::align_by_coding_order;
use crate::error::AlignError;
use crate::model::{LocationType, Module, ModuleKind};
use crate::residue::{Residue, StageResult};
use crate::subnode::match_by_subnodes;
use std::collections::BTreeMap;

/// Groups locations by location type and refines shared types through the location tree.
///
/// Body and body-anchored leftovers get a second pass together. Signing-space-only is
/// never pooled with purely spatial.
pub(crate) struct LocationMatcher;

impl ContentMatcher for LocationMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        Some(ModuleKind::Location)
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        let mut left_groups = group_by_type(residue.left);
        let mut right_groups = group_by_type(residue.right);
        let mut result = StageResult::default();

        let shared: Vec<Option<LocationType>> = left_groups
            .keys()
            .filter(|t| right_groups.contains_key(*t))
            .copied()
            .collect();
        for location_type in shared {
            let left = left_groups.remove(&location_type).unwrap_or_default();
            let right = right_groups.remove(&location_type).unwrap_or_default();
            let label = type_label(location_type);
            let leftover = match_group(Residue::new(left, right), label, ctx, &mut result)?;
            left_groups.insert(location_type, leftover.left);
            right_groups.insert(location_type, leftover.right);
        }

        if ctx.config.pool_body_based_locations {
            let pooled = Residue::new(
                take_body_based(&mut left_groups),
                take_body_based(&mut right_groups),
            );
            if pooled.is_contested() {
                let leftover = match_group(pooled, "body_based", ctx, &mut result)?;
                result.residue.extend(leftover);
            } else {
                result.residue.extend(pooled);
            }
        }

        for (_, modules) in left_groups {
            result.residue.left.extend(modules);
        }
        for (_, modules) in right_groups {
            result.residue.right.extend(modules);
        }

        let fallback = align_by_coding_order(std::mem::take(&mut result.residue), false);
        log::debug!(
            "location: {} content pairs, {} coding-order pairs",
            result.pairs.len(),
            fallback.pairs.len()
        );
        result.absorb(fallback);
        Ok(result)
    }
}

/// Sub-node matching from the top of the location tree. Returns what the tree could not
/// pair, for the pooled fallback.
fn match_group<'a>(
    group: Residue<'a>,
    label: &str,
    ctx: &MatchContext<'_>,
    result: &mut StageResult<'a>,
) -> Result<Residue<'a>, AlignError> {
    let matched = match_by_subnodes(
        group,
        &[],
        &Module::location_tree,
        ctx.config.max_subnode_depth,
    );
    check_group_residue(ModuleKind::Location, label, &matched.residue, ctx)?;
    result.pairs.extend(matched.pairs);
    Ok(matched.residue)
}

fn group_by_type(modules: Vec<&Module>) -> BTreeMap<Option<LocationType>, Vec<&Module>> {
    let mut groups: BTreeMap<Option<LocationType>, Vec<&Module>> = BTreeMap::new();
    for module in modules {
        groups.entry(module.location_type()).or_default().push(module);
    }
    groups
}

fn take_body_based<'a>(
    groups: &mut BTreeMap<Option<LocationType>, Vec<&'a Module>>,
) -> Vec<&'a Module> {
    let mut pooled = Vec::new();
    for location_type in [LocationType::Body, LocationType::BodyAnchored] {
        if let Some(modules) = groups.remove(&Some(location_type)) {
            pooled.extend(modules);
        }
    }
    pooled
}

fn type_label(location_type: Option<LocationType>) -> &'static str {
    match location_type {
        Some(LocationType::Body) => "body",
        Some(LocationType::BodyAnchored) => "body_anchored",
        Some(LocationType::PurelySpatial) => "purely_spatial",
        Some(LocationType::SigningSpaceOnly) => "signing_space_only",
        None => "none",
    }
}
