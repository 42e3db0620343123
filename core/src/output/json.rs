//! JSON projection of an alignment.
//!
//! Pairs are written as module ids only; module content stays with the caller.

use crate::engine::{AlignmentCounts, KindAlignment, SignAlignment};
use crate::model::{ModuleId, ModuleKind};
use crate::residue::AlignmentPair;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairIds {
    pub left: Option<ModuleId>,
    pub right: Option<ModuleId>,
}

impl From<&AlignmentPair<'_>> for PairIds {
    fn from(pair: &AlignmentPair<'_>) -> Self {
        let (left, right) = pair.ids();
        PairIds { left, right }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindReport {
    pub kind: ModuleKind,
    pub counts: AlignmentCounts,
    pub pairs: Vec<PairIds>,
}

impl From<&KindAlignment<'_>> for KindReport {
    fn from(kind: &KindAlignment<'_>) -> Self {
        KindReport {
            kind: kind.kind,
            counts: kind.counts(),
            pairs: kind.pairs.iter().map(PairIds::from).collect(),
        }
    }
}

/// Owned, serializable form of a [`SignAlignment`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    pub gloss1: String,
    pub gloss2: String,
    pub totals: AlignmentCounts,
    pub kinds: Vec<KindReport>,
}

impl From<&SignAlignment<'_>> for AlignmentReport {
    fn from(alignment: &SignAlignment<'_>) -> Self {
        AlignmentReport {
            gloss1: alignment.gloss1.to_string(),
            gloss2: alignment.gloss2.to_string(),
            totals: alignment.total_counts(),
            kinds: alignment.kinds.iter().map(KindReport::from).collect(),
        }
    }
}

pub fn pairs_to_json(pairs: &[AlignmentPair<'_>]) -> serde_json::Value {
    let ids: Vec<PairIds> = pairs.iter().map(PairIds::from).collect();
    serde_json::json!(ids)
}

pub fn alignment_to_json(alignment: &SignAlignment<'_>) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(AlignmentReport::from(alignment))
}

pub fn serialize_alignment(alignment: &SignAlignment<'_>) -> serde_json::Result<String> {
    serde_json::to_string(&AlignmentReport::from(alignment))
}

pub fn serialize_alignment_pretty(alignment: &SignAlignment<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&AlignmentReport::from(alignment))
}
