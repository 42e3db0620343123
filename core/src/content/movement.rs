use super::{ContentMatcher, MatchContext, check_group_residue};
use crate::coding_order::align_by_coding_order;
use crate::error::AlignError;
use crate::model::{MOVEMENT_TYPE_NODE, Module, ModuleKind, MovementType};
use crate::residue::{Residue, StageResult};
use crate::subnode::match_by_subnodes;
use std::collections::BTreeMap;

/// Groups movements by their selected movement type and refines shared types through the
/// movement tree. Leftovers from every type are pooled and settled by coding order.
pub(crate) struct MovementMatcher;

impl ContentMatcher for MovementMatcher {
    fn kind(&self) -> Option<ModuleKind> {
        Some(ModuleKind::Movement)
    }

    fn match_content<'a>(
        &self,
        residue: Residue<'a>,
        ctx: &MatchContext<'_>,
    ) -> Result<StageResult<'a>, AlignError> {
        let left_groups = group_by_type(residue.left);
        let mut right_groups = group_by_type(residue.right);

        let mut result = StageResult::default();
        for (movement_type, left) in left_groups {
            let Some(right) = right_groups.remove(&movement_type) else {
                result.residue.left.extend(left);
                continue;
            };

            let path: Vec<&str> = match movement_type {
                Some(t) => vec![MOVEMENT_TYPE_NODE, t.label()],
                None => Vec::new(),
            };
            let group = match_by_subnodes(
                Residue::new(left, right),
                &path,
                &Module::movement_tree,
                ctx.config.max_subnode_depth,
            );
            check_group_residue(
                ModuleKind::Movement,
                type_label(movement_type),
                &group.residue,
                ctx,
            )?;
            result.absorb(group);
        }
        for (_, right) in right_groups {
            result.residue.right.extend(right);
        }

        let fallback = align_by_coding_order(std::mem::take(&mut result.residue), false);
        log::debug!(
            "movement: {} content pairs, {} coding-order pairs",
            result.pairs.len(),
            fallback.pairs.len()
        );
        result.absorb(fallback);
        Ok(result)
    }
}

fn group_by_type(modules: Vec<&Module>) -> BTreeMap<Option<MovementType>, Vec<&Module>> {
    let mut groups: BTreeMap<Option<MovementType>, Vec<&Module>> = BTreeMap::new();
    for module in modules {
        groups.entry(module.movement_type()).or_default().push(module);
    }
    groups
}

fn type_label(movement_type: Option<MovementType>) -> &'static str {
    movement_type.map_or("none", MovementType::label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlignConfig, InvariantBehavior};
    use crate::handshape::HandshapeTable;
    use crate::model::{FeatureTree, ModuleContent, ModuleId};

    fn movement(id: f64, path: &[&str]) -> Module {
        Module::new(
            id,
            ModuleContent::Movement(FeatureTree::from_checked_paths([path.iter().copied()])),
        )
    }

    fn run_with<'a>(
        config: &AlignConfig,
        left: Vec<&'a Module>,
        right: Vec<&'a Module>,
    ) -> Result<StageResult<'a>, AlignError> {
        let ctx = MatchContext {
            config,
            handshapes: HandshapeTable::predefined(),
        };
        MovementMatcher.match_content(Residue::new(left, right), &ctx)
    }

    fn run<'a>(left: Vec<&'a Module>, right: Vec<&'a Module>) -> StageResult<'a> {
        run_with(&AlignConfig::strict(), left, right)
            .expect("movement matching upholds its group invariant")
    }

    #[test]
    fn same_type_pairs_before_coding_order() {
        let a1 = movement(1.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Straight"]);
        let a2 = movement(2.0, &[MOVEMENT_TYPE_NODE, "Joint-specific movements", "Nodding"]);
        let b1 = movement(3.0, &[MOVEMENT_TYPE_NODE, "Joint-specific movements", "Nodding"]);
        let b2 = movement(4.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Straight"]);

        let result = run(vec![&a1, &a2], vec![&b1, &b2]);

        let mut ids: Vec<_> = result.pairs.iter().map(|p| p.ids()).collect();
        ids.sort_by_key(|(l, _)| *l);
        assert_eq!(
            ids,
            vec![
                (Some(ModuleId(1.0)), Some(ModuleId(4.0))),
                (Some(ModuleId(2.0)), Some(ModuleId(3.0))),
            ]
        );
        assert!(result.residue.is_empty());
    }

    #[test]
    fn unshared_types_fall_through_to_coding_order() {
        let a = movement(1.0, &[MOVEMENT_TYPE_NODE, "Handshape change"]);
        let b = movement(2.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Arc"]);
        let c = movement(3.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Arc"]);

        let result = run(vec![&a], vec![&b, &c]);

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].ids(), (Some(ModuleId(1.0)), Some(ModuleId(2.0))));
        assert_eq!(result.residue.right.len(), 1);
        assert!(result.pairs.iter().all(|p| p.is_matched()));
    }

    fn straight_arc_vs_circle_zigzag() -> [Module; 6] {
        [
            movement(1.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Straight"]),
            movement(2.0, &[MOVEMENT_TYPE_NODE, "Handshape change"]),
            movement(5.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Arc"]),
            movement(3.0, &[MOVEMENT_TYPE_NODE, "Joint-specific movements", "Nodding"]),
            movement(4.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Circle"]),
            movement(6.0, &[MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", "Zigzag"]),
        ]
    }

    #[test]
    fn unresolved_shared_type_is_an_error_when_strict() {
        let [a1, a2, a3, b1, b2, b3] = straight_arc_vs_circle_zigzag();

        let err = run_with(&AlignConfig::strict(), vec![&a1, &a2, &a3], vec![&b1, &b2, &b3])
            .expect_err("both sides keep perceptual shapes the tree cannot pair");

        assert_eq!(err.code(), "SIGNALIGN_001");
        assert!(matches!(
            err,
            AlignError::InvariantViolation {
                kind: ModuleKind::Movement,
                left: 2,
                right: 2,
                ..
            }
        ));
    }

    #[test]
    fn unresolved_shared_type_pools_with_other_leftovers_when_degrading() {
        let [a1, a2, a3, b1, b2, b3] = straight_arc_vs_circle_zigzag();
        let config = AlignConfig::builder()
            .on_invariant_violation(InvariantBehavior::Degrade)
            .build()
            .expect("valid config");

        let result = run_with(&config, vec![&a1, &a2, &a3], vec![&b1, &b2, &b3])
            .expect("degrading never fails");

        let mut ids: Vec<_> = result.pairs.iter().map(|p| p.ids()).collect();
        ids.sort_by_key(|(l, _)| *l);
        assert_eq!(
            ids,
            vec![
                (Some(ModuleId(1.0)), Some(ModuleId(3.0))),
                (Some(ModuleId(2.0)), Some(ModuleId(4.0))),
                (Some(ModuleId(5.0)), Some(ModuleId(6.0))),
            ],
            "leftovers of every movement type share one coding-order pass"
        );
        assert!(result.residue.is_empty());
    }
}
