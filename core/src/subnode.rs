//! Recursive sub-node matcher for tree-shaped module content.
//!
//! Modules in a group are keyed by the set of selected children directly beneath the
//! current node. Groups whose key is a single label are refined one level deeper; groups
//! with any other key size are settled by coding order at this level.

use crate::coding_order::align_by_coding_order;
use crate::model::{FeatureTree, Module};
use crate::residue::{AlignmentPair, Residue, StageResult};
use std::collections::BTreeMap;

type ChildKey = Vec<String>;

/// Matches a group of same-kind modules by the selected children under `path`.
///
/// `tree_of` extracts the tree to query; modules without one key as having no selected
/// children. Recursion stops at `max_depth` levels below the starting path, where the
/// group is settled by coding order.
pub(crate) fn match_by_subnodes<'a, F>(
    residue: Residue<'a>,
    path: &[&str],
    tree_of: &F,
    max_depth: u32,
) -> StageResult<'a>
where
    F: Fn(&Module) -> Option<&FeatureTree>,
{
    if residue.left.len() == 1 && residue.right.len() == 1 {
        return StageResult {
            pairs: vec![AlignmentPair::matched(residue.left[0], residue.right[0])],
            residue: Residue::default(),
        };
    }
    if !residue.is_contested() {
        return StageResult::unmatched(residue);
    }
    if max_depth == 0 {
        log::trace!("subnode depth limit reached at {:?}", path);
        return align_by_coding_order(residue, false);
    }

    let left_groups = group_by_children(residue.left, path, tree_of);
    let mut right_groups = group_by_children(residue.right, path, tree_of);

    let mut result = StageResult::default();
    for (key, left) in left_groups {
        let Some(right) = right_groups.remove(&key) else {
            result.residue.left.extend(left);
            continue;
        };

        let group = Residue::new(left, right);
        if let [label] = key.as_slice() {
            let mut child_path: Vec<&str> = path.to_vec();
            child_path.push(label.as_str());
            log::trace!("subnode recursion into {:?} ({} modules)", child_path, group.len());
            result.absorb(match_by_subnodes(group, &child_path, tree_of, max_depth - 1));
        } else {
            result.absorb(align_by_coding_order(group, false));
        }
    }
    for (_, right) in right_groups {
        result.residue.right.extend(right);
    }

    result.residue.dedup();
    result
}

fn group_by_children<'a, F>(
    modules: Vec<&'a Module>,
    path: &[&str],
    tree_of: &F,
) -> BTreeMap<ChildKey, Vec<&'a Module>>
where
    F: Fn(&Module) -> Option<&FeatureTree>,
{
    let mut groups: BTreeMap<ChildKey, Vec<&'a Module>> = BTreeMap::new();
    for module in modules {
        let key: ChildKey = tree_of(module)
            .map(|tree| tree.checked_child_labels(path).into_iter().collect())
            .unwrap_or_default();
        groups.entry(key).or_default().push(module);
    }
    groups
}
