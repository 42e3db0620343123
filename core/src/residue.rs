//! Pairs, residues, and the bookkeeping shared by every matching stage.
//!
//! A stage consumes a [`Residue`] and returns a [`StageResult`]: the pairs it settled
//! plus a new residue for the next stage. Matchers never remove from a list while
//! scanning it; they record matched indices first and rebuild both residues afterwards.

use crate::model::{Module, ModuleId};
use std::collections::HashSet;

/// One row of an alignment: a module from each sign, or a module with no counterpart.
///
/// # Invariants
///
/// At most one side is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentPair<'a> {
    left: Option<&'a Module>,
    right: Option<&'a Module>,
}

impl<'a> AlignmentPair<'a> {
    pub fn matched(left: &'a Module, right: &'a Module) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn left_only(left: &'a Module) -> Self {
        Self {
            left: Some(left),
            right: None,
        }
    }

    pub fn right_only(right: &'a Module) -> Self {
        Self {
            left: None,
            right: Some(right),
        }
    }

    /// `None` for the one combination a pair may not hold.
    pub fn from_options(left: Option<&'a Module>, right: Option<&'a Module>) -> Option<Self> {
        if left.is_none() && right.is_none() {
            return None;
        }
        Some(Self { left, right })
    }

    pub fn left(&self) -> Option<&'a Module> {
        self.left
    }

    pub fn right(&self) -> Option<&'a Module> {
        self.right
    }

    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn ids(&self) -> (Option<ModuleId>, Option<ModuleId>) {
        (self.left.map(|m| m.id), self.right.map(|m| m.id))
    }

    pub fn swapped(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

/// Per-sign working lists of modules not yet matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Residue<'a> {
    pub left: Vec<&'a Module>,
    pub right: Vec<&'a Module>,
}

impl<'a> Residue<'a> {
    pub fn new(left: Vec<&'a Module>, right: Vec<&'a Module>) -> Self {
        Self { left, right }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// True when both sides still hold something to match.
    pub fn is_contested(&self) -> bool {
        !self.left.is_empty() && !self.right.is_empty()
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn extend(&mut self, other: Residue<'a>) {
        self.left.extend(other.left);
        self.right.extend(other.right);
    }

    /// Sorts both sides by coding order.
    pub fn sort_by_coding_order(&mut self) {
        self.left.sort_by_key(|m| m.id);
        self.right.sort_by_key(|m| m.id);
    }

    /// Drops repeated references to the same module on each side, keeping first
    /// occurrences. Distinct modules that happen to share an id are both kept.
    pub fn dedup(&mut self) {
        dedup_modules(&mut self.left);
        dedup_modules(&mut self.right);
    }
}

fn dedup_modules(modules: &mut Vec<&Module>) {
    let mut seen: HashSet<*const Module> = HashSet::with_capacity(modules.len());
    modules.retain(|m| seen.insert(std::ptr::from_ref(*m)));
}

/// What one stage settled, plus what it hands to the next stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageResult<'a> {
    pub pairs: Vec<AlignmentPair<'a>>,
    pub residue: Residue<'a>,
}

impl<'a> StageResult<'a> {
    pub fn unmatched(residue: Residue<'a>) -> Self {
        Self {
            pairs: Vec::new(),
            residue,
        }
    }

    /// Folds a sub-stage in: its pairs are kept and its residue joins ours.
    pub fn absorb(&mut self, other: StageResult<'a>) {
        self.pairs.extend(other.pairs);
        self.residue.extend(other.residue);
    }
}

/// Pairs each left module, in coding order, with the first unused right module
/// accepted by `accept`. Modules left over on either side form the residue.
pub(crate) fn pair_greedily<'a, F>(mut residue: Residue<'a>, mut accept: F) -> StageResult<'a>
where
    F: FnMut(&Module, &Module) -> bool,
{
    residue.sort_by_coding_order();
    let Residue { left, right } = residue;

    let mut right_used = vec![false; right.len()];
    let mut left_used = vec![false; left.len()];
    let mut pairs = Vec::new();

    for (i, l) in left.iter().enumerate() {
        let found = right
            .iter()
            .enumerate()
            .find(|(j, r)| !right_used[*j] && accept(*l, **r))
            .map(|(j, _)| j);
        if let Some(j) = found {
            right_used[j] = true;
            left_used[i] = true;
            pairs.push(AlignmentPair::matched(*l, right[j]));
        }
    }

    let left_rest = left
        .into_iter()
        .zip(left_used)
        .filter_map(|(m, used)| (!used).then_some(m))
        .collect();
    let right_rest = right
        .into_iter()
        .zip(right_used)
        .filter_map(|(m, used)| (!used).then_some(m))
        .collect();

    StageResult {
        pairs,
        residue: Residue::new(left_rest, right_rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureTree, ModuleContent};

    fn relation(id: f64) -> Module {
        Module::new(id, ModuleContent::Relation(FeatureTree::new()))
    }

    #[test]
    fn pair_rejects_double_none() {
        assert!(AlignmentPair::from_options(None, None).is_none());
        let m = relation(1.0);
        let pair = AlignmentPair::from_options(Some(&m), None).expect("one side is set");
        assert!(!pair.is_matched());
        assert_eq!(pair.swapped().ids(), (None, Some(ModuleId(1.0))));
    }

    #[test]
    fn greedy_pairing_respects_coding_order_and_leaves_residue() {
        let (a, b, c) = (relation(3.0), relation(1.0), relation(2.0));
        let (x, y) = (relation(10.0), relation(20.0));

        let result = pair_greedily(Residue::new(vec![&a, &b, &c], vec![&y, &x]), |_, _| true);

        let ids: Vec<_> = result.pairs.iter().map(|p| p.ids()).collect();
        assert_eq!(
            ids,
            vec![
                (Some(ModuleId(1.0)), Some(ModuleId(10.0))),
                (Some(ModuleId(2.0)), Some(ModuleId(20.0))),
            ]
        );
        assert_eq!(result.residue.left.len(), 1);
        assert_eq!(result.residue.left[0].id, ModuleId(3.0));
        assert!(result.residue.right.is_empty());
    }

    #[test]
    fn greedy_pairing_with_rejecting_predicate_keeps_everything() {
        let (a, x) = (relation(1.0), relation(2.0));
        let result = pair_greedily(Residue::new(vec![&a], vec![&x]), |_, _| false);
        assert!(result.pairs.is_empty());
        assert_eq!(result.residue.len(), 2);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let a = relation(1.0);
        let mut residue = Residue::new(vec![&a, &a], vec![]);
        residue.dedup();
        assert_eq!(residue.left.len(), 1);
    }

    #[test]
    fn dedup_keeps_distinct_modules_sharing_an_id() {
        let (a, b) = (relation(1.0), relation(1.0));
        let mut residue = Residue::new(vec![&a, &b, &a], vec![&b]);
        residue.dedup();
        assert_eq!(residue.left.len(), 2);
        assert!(std::ptr::eq(residue.left[0], &a));
        assert!(std::ptr::eq(residue.left[1], &b));
        assert_eq!(residue.right.len(), 1);
    }
}
