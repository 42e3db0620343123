//! Alignment entry points.
//!
//! [`try_align_modules`] dispatches one module kind through the pipeline:
//! articulator partitioning for kinds attached to articulators, the kind's content
//! matcher for the rest, and a padded coding-order pass to finish. [`try_align_signs`]
//! runs every kind and collects the results into a [`SignAlignment`].

use crate::articulator::align_by_articulator;
use crate::coding_order::align_by_coding_order;
use crate::config::AlignConfig;
use crate::content::{MatchContext, content_matcher};
use crate::error::AlignError;
use crate::handshape::HandshapeTable;
use crate::model::{Module, ModuleKind, Sign};
use crate::residue::{AlignmentPair, Residue};
use serde::Serialize;

/// Matched / one-sided totals for a list of pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentCounts {
    pub matched: usize,
    pub left_only: usize,
    pub right_only: usize,
}

impl AlignmentCounts {
    pub fn from_pairs(pairs: &[AlignmentPair<'_>]) -> AlignmentCounts {
        let mut counts = AlignmentCounts::default();
        for pair in pairs {
            match (pair.left(), pair.right()) {
                (Some(_), Some(_)) => counts.matched += 1,
                (Some(_), None) => counts.left_only += 1,
                (None, Some(_)) => counts.right_only += 1,
                (None, None) => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.matched + self.left_only + self.right_only
    }

    fn add(&mut self, other: AlignmentCounts) {
        self.matched += other.matched;
        self.left_only += other.left_only;
        self.right_only += other.right_only;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KindAlignment<'a> {
    pub kind: ModuleKind,
    pub pairs: Vec<AlignmentPair<'a>>,
}

impl KindAlignment<'_> {
    pub fn counts(&self) -> AlignmentCounts {
        AlignmentCounts::from_pairs(&self.pairs)
    }
}

/// Per-kind alignment of two whole signs, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignAlignment<'a> {
    pub gloss1: &'a str,
    pub gloss2: &'a str,
    pub kinds: Vec<KindAlignment<'a>>,
}

impl<'a> SignAlignment<'a> {
    pub fn pairs(&self, kind: ModuleKind) -> &[AlignmentPair<'a>] {
        self.kinds
            .iter()
            .find(|k| k.kind == kind)
            .map(|k| k.pairs.as_slice())
            .unwrap_or(&[])
    }

    pub fn counts(&self) -> Vec<(ModuleKind, AlignmentCounts)> {
        self.kinds.iter().map(|k| (k.kind, k.counts())).collect()
    }

    pub fn total_counts(&self) -> AlignmentCounts {
        let mut total = AlignmentCounts::default();
        for kind in &self.kinds {
            total.add(kind.counts());
        }
        total
    }
}

fn one_sided<'a>(mut modules: Vec<&'a Module>, left: bool) -> Vec<AlignmentPair<'a>> {
    modules.sort_by_key(|m| m.id);
    let wrap: fn(&'a Module) -> AlignmentPair<'a> = if left {
        AlignmentPair::left_only
    } else {
        AlignmentPair::right_only
    };
    modules.into_iter().map(wrap).collect()
}

/// Pairs the modules of `kind` from two signs.
///
/// Every module of that kind in either sign appears in exactly one returned pair.
/// Fails only when a content matcher trips its partition check and
/// `config.on_invariant_violation` is `ReturnError`.
pub fn try_align_modules<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    kind: ModuleKind,
    config: &AlignConfig,
    handshapes: &HandshapeTable,
) -> Result<Vec<AlignmentPair<'a>>, AlignError> {
    if kind == ModuleKind::SignType {
        return Ok(AlignmentPair::from_options(sign1.sign_type(), sign2.sign_type())
            .into_iter()
            .collect());
    }

    let left = sign1.modules_of_kind(kind);
    let right = sign2.modules_of_kind(kind);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ok(Vec::new()),
        (false, true) => return Ok(one_sided(left, true)),
        (true, false) => return Ok(one_sided(right, false)),
        (false, false) => {}
    }

    let ctx = MatchContext { config, handshapes };
    let matcher = content_matcher(kind, config);
    let residue = Residue::new(left, right);

    if kind.uses_articulators() {
        return align_by_articulator(residue, matcher, &ctx);
    }

    let stage = matcher.match_content(residue, &ctx)?;
    let mut pairs = stage.pairs;
    pairs.extend(align_by_coding_order(stage.residue, true).pairs);
    log::debug!("{}: {} pairs", kind, pairs.len());
    Ok(pairs)
}

/// Infallible form of [`try_align_modules`].
///
/// Partition check failures are logged and their leftovers folded into the fallback
/// stages, regardless of `config.on_invariant_violation`.
pub fn align_modules<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    kind: ModuleKind,
    config: &AlignConfig,
    handshapes: &HandshapeTable,
) -> Vec<AlignmentPair<'a>> {
    let degrading = config.degrading();
    match try_align_modules(sign1, sign2, kind, &degrading, handshapes) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::warn!("{} alignment failed, using coding order: {}", kind, e);
            let residue = Residue::new(sign1.modules_of_kind(kind), sign2.modules_of_kind(kind));
            align_by_coding_order(residue, true).pairs
        }
    }
}

/// Validates both signs, then aligns every kind in display order.
pub fn try_align_signs<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    config: &AlignConfig,
    handshapes: &HandshapeTable,
) -> Result<SignAlignment<'a>, AlignError> {
    sign1.validate()?;
    sign2.validate()?;

    let mut kinds = Vec::with_capacity(ModuleKind::ALL.len());
    for kind in ModuleKind::ALL {
        let pairs = try_align_modules(sign1, sign2, kind, config, handshapes)?;
        kinds.push(KindAlignment { kind, pairs });
    }
    Ok(SignAlignment {
        gloss1: &sign1.gloss,
        gloss2: &sign2.gloss,
        kinds,
    })
}

/// Infallible form of [`try_align_signs`]. Signs are not validated.
pub fn align_signs<'a>(
    sign1: &'a Sign,
    sign2: &'a Sign,
    config: &AlignConfig,
    handshapes: &HandshapeTable,
) -> SignAlignment<'a> {
    let kinds = ModuleKind::ALL
        .into_iter()
        .map(|kind| KindAlignment {
            kind,
            pairs: align_modules(sign1, sign2, kind, config, handshapes),
        })
        .collect();
    SignAlignment {
        gloss1: &sign1.gloss,
        gloss2: &sign2.gloss,
        kinds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Articulator, ArticulatorNumber, FeatureTree, MOVEMENT_TYPE_NODE, ModuleContent, ModuleId,
    };

    fn relation(id: f64) -> Module {
        Module::new(id, ModuleContent::Relation(FeatureTree::new()))
    }

    fn shape(id: f64, name: &str) -> Module {
        let path = [MOVEMENT_TYPE_NODE, "Perceptual shape", "Shape", name];
        Module::new(
            id,
            ModuleContent::Movement(FeatureTree::from_checked_paths([path])),
        )
        .with_articulators(Articulator::Hand, ArticulatorNumber::One)
    }

    fn ids(pairs: &[AlignmentPair<'_>]) -> Vec<(Option<ModuleId>, Option<ModuleId>)> {
        pairs.iter().map(|p| p.ids()).collect()
    }

    #[test]
    fn kind_absent_from_both_signs_yields_nothing() {
        let (s1, s2) = (Sign::new("a"), Sign::new("b"));
        let config = AlignConfig::default();
        let table = HandshapeTable::predefined();
        let pairs = align_modules(&s1, &s2, ModuleKind::Movement, &config, table);
        assert!(pairs.is_empty());
    }

    #[test]
    fn one_sided_kind_pairs_with_none_in_coding_order() {
        let s1 = Sign::new("a").with_module(relation(3.0)).with_module(relation(1.0));
        let s2 = Sign::new("b");
        let config = AlignConfig::default();
        let table = HandshapeTable::predefined();
        let pairs = align_modules(&s1, &s2, ModuleKind::Relation, &config, table);
        assert_eq!(
            ids(&pairs),
            vec![(Some(ModuleId(1.0)), None), (Some(ModuleId(3.0)), None)]
        );

        let mirrored = align_modules(&s2, &s1, ModuleKind::Relation, &config, table);
        assert_eq!(
            ids(&mirrored),
            vec![(None, Some(ModuleId(1.0))), (None, Some(ModuleId(3.0)))]
        );
    }

    #[test]
    fn sign_type_is_a_single_pair() {
        let st = |id: f64| Module::new(id, ModuleContent::SignType(FeatureTree::new()));
        let s1 = Sign::new("a").with_sign_type(st(1.0));
        let s2 = Sign::new("b").with_sign_type(st(2.0));
        let empty = Sign::new("c");
        let config = AlignConfig::default();
        let table = HandshapeTable::predefined();

        let pairs = align_modules(&s1, &s2, ModuleKind::SignType, &config, table);
        assert_eq!(ids(&pairs), vec![(Some(ModuleId(1.0)), Some(ModuleId(2.0)))]);

        let pairs = align_modules(&s1, &empty, ModuleKind::SignType, &config, table);
        assert_eq!(ids(&pairs), vec![(Some(ModuleId(1.0)), None)]);

        let pairs = align_modules(&empty, &empty, ModuleKind::SignType, &config, table);
        assert!(pairs.is_empty());
    }

    #[test]
    fn sign_alignment_counts_every_kind() {
        let s1 = Sign::new("a").with_module(relation(1.0)).with_module(relation(2.0));
        let s2 = Sign::new("b").with_module(relation(5.0));
        let table = HandshapeTable::predefined();
        let alignment = try_align_signs(&s1, &s2, &AlignConfig::strict(), table)
            .expect("valid signs align");

        assert_eq!(alignment.kinds.len(), ModuleKind::ALL.len());
        let total = alignment.total_counts();
        assert_eq!(
            total,
            AlignmentCounts {
                matched: 1,
                left_only: 1,
                right_only: 0
            }
        );
        assert_eq!(alignment.pairs(ModuleKind::Relation).len(), 2);
        assert!(alignment.pairs(ModuleKind::Movement).is_empty());
    }

    #[test]
    fn invalid_sign_is_rejected_by_try_align_signs() {
        let s1 = Sign::new("dup").with_module(relation(1.0)).with_module(relation(1.0));
        let s2 = Sign::new("b");
        let table = HandshapeTable::predefined();
        let err = try_align_signs(&s1, &s2, &AlignConfig::default(), table)
            .expect_err("duplicate ids are rejected");
        assert_eq!(err.code(), "SIGNALIGN_002");
    }

    #[test]
    fn strict_surfaces_violation_while_infallible_form_degrades() {
        let s1 = Sign::new("a")
            .with_module(shape(1.0, "Straight"))
            .with_module(shape(2.0, "Arc"));
        let s2 = Sign::new("b")
            .with_module(shape(3.0, "Circle"))
            .with_module(shape(4.0, "Zigzag"));
        let config = AlignConfig::strict();
        let table = HandshapeTable::predefined();

        let err = try_align_modules(&s1, &s2, ModuleKind::Movement, &config, table)
            .expect_err("no shape matches across the signs");
        assert_eq!(err.code(), "SIGNALIGN_001");

        let pairs = align_modules(&s1, &s2, ModuleKind::Movement, &config, table);
        assert_eq!(
            ids(&pairs),
            vec![
                (Some(ModuleId(1.0)), Some(ModuleId(3.0))),
                (Some(ModuleId(2.0)), Some(ModuleId(4.0))),
            ]
        );
    }
}
