//! Coding-order fallback: positional pairing by creation order.
//!
//! This is the last resort of every cascade and the only stage that introduces
//! one-sided pairs.

use crate::residue::{AlignmentPair, Residue, StageResult};

/// Sorts each side by module id and zips the two lists.
///
/// With `match_with_none` the shorter side is padded so every module ends up in a pair
/// and the returned residue is empty. Without it, pairing stops at the shorter length and
/// the excess of the longer side is returned as residue.
pub fn align_by_coding_order<'a>(
    mut residue: Residue<'a>,
    match_with_none: bool,
) -> StageResult<'a> {
    residue.sort_by_coding_order();
    let Residue { left, right } = residue;

    let shared = left.len().min(right.len());
    let mut pairs: Vec<AlignmentPair<'a>> = left
        .iter()
        .zip(right.iter())
        .map(|(l, r)| AlignmentPair::matched(*l, *r))
        .collect();

    let left_excess = left[shared..].to_vec();
    let right_excess = right[shared..].to_vec();

    if match_with_none {
        pairs.extend(left_excess.into_iter().map(AlignmentPair::left_only));
        pairs.extend(right_excess.into_iter().map(AlignmentPair::right_only));
        return StageResult {
            pairs,
            residue: Residue::default(),
        };
    }

    StageResult {
        pairs,
        residue: Residue::new(left_excess, right_excess),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureTree, Module, ModuleContent, ModuleId};

    fn relation(id: f64) -> Module {
        Module::new(id, ModuleContent::Relation(FeatureTree::new()))
    }

    #[test]
    fn pads_shorter_side_with_none() {
        let (a, b) = (relation(2.0), relation(1.0));
        let x = relation(5.0);

        let result = align_by_coding_order(Residue::new(vec![&a, &b], vec![&x]), true);

        let ids: Vec<_> = result.pairs.iter().map(|p| p.ids()).collect();
        assert_eq!(
            ids,
            vec![
                (Some(ModuleId(1.0)), Some(ModuleId(5.0))),
                (Some(ModuleId(2.0)), None),
            ]
        );
        assert!(result.residue.is_empty());
    }

    #[test]
    fn without_none_returns_excess_as_residue() {
        let a = relation(1.0);
        let (x, y) = (relation(9.0), relation(8.0));

        let result = align_by_coding_order(Residue::new(vec![&a], vec![&x, &y]), false);

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].ids(), (Some(ModuleId(1.0)), Some(ModuleId(8.0))));
        assert!(result.residue.left.is_empty());
        assert_eq!(result.residue.right.len(), 1);
        assert_eq!(result.residue.right[0].id, ModuleId(9.0));
        assert!(result.pairs.iter().all(|p| p.is_matched()));
    }

    #[test]
    fn equal_lengths_with_none_introduce_no_none() {
        let (a, b) = (relation(1.0), relation(2.0));
        let (x, y) = (relation(3.0), relation(4.0));

        let result = align_by_coding_order(Residue::new(vec![&b, &a], vec![&y, &x]), true);

        assert!(result.pairs.iter().all(|p| p.is_matched()));
        assert_eq!(result.residue, Residue::default());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let result = align_by_coding_order(Residue::default(), true);
        assert!(result.pairs.is_empty());
        assert!(result.residue.is_empty());
    }
}
