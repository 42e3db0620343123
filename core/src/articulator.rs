//! Articulator partitioning.
//!
//! Each side's modules are bucketed into a 3x3 grid of articulator (hand, arm, leg) by
//! articulator number (1, 2, both). The kind's content matcher then runs on pairs of
//! buckets at decreasing precision:
//!
//! 1. **Exact**: same articulator, same number.
//! 2. **Subset**: a single number on one side against "both" on the other.
//! 3. **Within articulator**: every remaining bucket of one articulator pooled.
//! 4. **Cross articulator**: tiers 1-3 again between hand/arm, hand/leg, and arm/leg, in
//!    both directions.
//!
//! Modules with no usable articulator assignment skip the tiers. Everything still
//! unmatched at the end is paired by coding order, padding with `None`.

use crate::coding_order::align_by_coding_order;
use crate::content::{ContentMatcher, MatchContext};
use crate::error::AlignError;
use crate::model::{Articulator, ArticulatorNumber, Module};
use crate::residue::{AlignmentPair, Residue};

const SUBSET_NUMBERS: [(ArticulatorNumber, ArticulatorNumber); 4] = [
    (ArticulatorNumber::One, ArticulatorNumber::Both),
    (ArticulatorNumber::Both, ArticulatorNumber::One),
    (ArticulatorNumber::Two, ArticulatorNumber::Both),
    (ArticulatorNumber::Both, ArticulatorNumber::Two),
];

const CROSS_ARTICULATORS: [(Articulator, Articulator); 3] = [
    (Articulator::Hand, Articulator::Arm),
    (Articulator::Hand, Articulator::Leg),
    (Articulator::Arm, Articulator::Leg),
];

#[derive(Debug, Default)]
struct ArticulatorGrid<'a> {
    cells: [[Vec<&'a Module>; 3]; 3],
    unassigned: Vec<&'a Module>,
}

impl<'a> ArticulatorGrid<'a> {
    fn from_modules(modules: Vec<&'a Module>) -> Self {
        let mut grid = ArticulatorGrid::default();
        for module in modules {
            grid.insert(module);
        }
        grid
    }

    fn insert(&mut self, module: &'a Module) {
        let slot = module
            .articulators
            .and_then(|spec| spec.number().map(|number| (spec.articulator, number)));
        match slot {
            Some((articulator, number)) => {
                self.cells[articulator.index()][number.index()].push(module)
            }
            None => self.unassigned.push(module),
        }
    }

    fn take(&mut self, articulator: Articulator, numbers: &[ArticulatorNumber]) -> Vec<&'a Module> {
        let row = &mut self.cells[articulator.index()];
        let mut taken = Vec::new();
        for number in numbers {
            taken.append(&mut row[number.index()]);
        }
        taken
    }

    fn into_modules(self) -> Vec<&'a Module> {
        let mut modules: Vec<&'a Module> = self.cells.into_iter().flatten().flatten().collect();
        modules.extend(self.unassigned);
        modules
    }
}

struct Partitioner<'a, 'm, 'c> {
    left: ArticulatorGrid<'a>,
    right: ArticulatorGrid<'a>,
    pairs: Vec<AlignmentPair<'a>>,
    matcher: &'m dyn ContentMatcher,
    ctx: &'m MatchContext<'c>,
}

impl<'a> Partitioner<'a, '_, '_> {
    /// Runs the matcher on the selected buckets and returns unmatched modules to their
    /// own buckets.
    fn match_cells(
        &mut self,
        left_articulator: Articulator,
        left_numbers: &[ArticulatorNumber],
        right_articulator: Articulator,
        right_numbers: &[ArticulatorNumber],
    ) -> Result<(), AlignError> {
        let residue = Residue::new(
            self.left.take(left_articulator, left_numbers),
            self.right.take(right_articulator, right_numbers),
        );
        let residue = if residue.is_contested() {
            log::trace!(
                "{:?} matcher: {:?}{:?} vs {:?}{:?}",
                self.matcher.kind(),
                left_articulator,
                left_numbers,
                right_articulator,
                right_numbers
            );
            let stage = self.matcher.match_content(residue, self.ctx)?;
            self.pairs.extend(stage.pairs);
            stage.residue
        } else {
            residue
        };

        for module in residue.left {
            self.left.insert(module);
        }
        for module in residue.right {
            self.right.insert(module);
        }
        Ok(())
    }

    fn exact_tier(&mut self, left: Articulator, right: Articulator) -> Result<(), AlignError> {
        for number in ArticulatorNumber::ALL {
            self.match_cells(left, &[number], right, &[number])?;
        }
        Ok(())
    }

    fn subset_tier(&mut self, left: Articulator, right: Articulator) -> Result<(), AlignError> {
        for (left_number, right_number) in SUBSET_NUMBERS {
            self.match_cells(left, &[left_number], right, &[right_number])?;
        }
        Ok(())
    }

    fn pooled_tier(&mut self, left: Articulator, right: Articulator) -> Result<(), AlignError> {
        self.match_cells(left, &ArticulatorNumber::ALL, right, &ArticulatorNumber::ALL)
    }

    fn run(&mut self) -> Result<(), AlignError> {
        for articulator in Articulator::ALL {
            self.exact_tier(articulator, articulator)?;
        }
        for articulator in Articulator::ALL {
            self.subset_tier(articulator, articulator)?;
        }
        for articulator in Articulator::ALL {
            self.pooled_tier(articulator, articulator)?;
        }
        log::debug!("articulator tiers 1-3: {} pairs", self.pairs.len());

        if !self.ctx.config.enable_cross_articulator_matching {
            return Ok(());
        }
        for (first, second) in CROSS_ARTICULATORS {
            for (left, right) in [(first, second), (second, first)] {
                self.exact_tier(left, right)?;
                self.subset_tier(left, right)?;
                self.pooled_tier(left, right)?;
            }
        }
        log::debug!("articulator tier 4: {} pairs total", self.pairs.len());
        Ok(())
    }
}

/// Aligns same-kind modules of two signs by articulator, then by content, then by
/// coding order. Every input module appears in exactly one returned pair.
pub(crate) fn align_by_articulator<'a>(
    residue: Residue<'a>,
    matcher: &dyn ContentMatcher,
    ctx: &MatchContext<'_>,
) -> Result<Vec<AlignmentPair<'a>>, AlignError> {
    let mut partitioner = Partitioner {
        left: ArticulatorGrid::from_modules(residue.left),
        right: ArticulatorGrid::from_modules(residue.right),
        pairs: Vec::new(),
        matcher,
        ctx,
    };
    partitioner.run()?;

    let Partitioner {
        left, right, mut pairs, ..
    } = partitioner;
    let leftover = Residue::new(left.into_modules(), right.into_modules());
    let fallback = align_by_coding_order(leftover, true);
    log::debug!(
        "articulator fallback: {} pairs ({} one-sided)",
        fallback.pairs.len(),
        fallback.pairs.iter().filter(|p| !p.is_matched()).count()
    );
    pairs.extend(fallback.pairs);
    Ok(pairs)
}
