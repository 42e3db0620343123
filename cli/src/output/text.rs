use crate::commands::align::Verbosity;
use anyhow::Result;
use sign_align::{
    AlignmentCounts, AlignmentPair, ArticulatorNumber, Module, ModuleContent, SignAlignment,
};
use std::io::Write;

pub fn write_text_alignment<W: Write>(
    w: &mut W,
    alignment: &SignAlignment<'_>,
    verbosity: Verbosity,
) -> Result<()> {
    if verbosity != Verbosity::Quiet {
        writeln!(w, "Alignment: \"{}\" <-> \"{}\"", alignment.gloss1, alignment.gloss2)?;
        writeln!(w)?;

        for kind in &alignment.kinds {
            if kind.pairs.is_empty() {
                if verbosity == Verbosity::Verbose {
                    writeln!(w, "{}: no modules", kind.kind)?;
                }
                continue;
            }
            writeln!(w, "{}:", kind.kind)?;
            for pair in &kind.pairs {
                writeln!(w, "  {}", render_pair(pair, verbosity))?;
            }
            writeln!(w)?;
        }
    }

    write_summary(w, &alignment.total_counts())
}

fn write_summary<W: Write>(w: &mut W, counts: &AlignmentCounts) -> Result<()> {
    writeln!(
        w,
        "Summary: {} matched, {} only in first, {} only in second",
        counts.matched, counts.left_only, counts.right_only
    )?;
    Ok(())
}

fn render_pair(pair: &AlignmentPair<'_>, verbosity: Verbosity) -> String {
    let side = |module: Option<&Module>| match module {
        Some(m) if verbosity == Verbosity::Verbose => describe_module(m),
        Some(m) => m.id.to_string(),
        None => "-".to_string(),
    };
    format!("{} <-> {}", side(pair.left()), side(pair.right()))
}

/// One-line description: id, articulator, and a short content hint.
pub fn describe_module(module: &Module) -> String {
    let mut out = module.id.to_string();

    if let Some(spec) = module.articulators {
        let number = match spec.number() {
            Some(ArticulatorNumber::One) => "1",
            Some(ArticulatorNumber::Two) => "2",
            Some(ArticulatorNumber::Both) => "both",
            None => "none",
        };
        out.push_str(&format!(" [{:?} {}]", spec.articulator, number).to_lowercase());
    }

    let hint = match &module.content {
        ModuleContent::Movement(_) => module.movement_type().map(|t| t.label().to_string()),
        ModuleContent::Location(_) => module.location_type().map(|t| format!("{:?}", t)),
        ModuleContent::HandConfiguration(hc) => Some(hc.transcription.join("|")),
        ModuleContent::Orientation(o) => {
            let palm: Vec<String> = o
                .palm
                .components()
                .map(|(_, choice)| format!("{:?}", choice).to_lowercase())
                .collect();
            Some(format!("palm {}", palm.join(",")))
        }
        _ => None,
    };
    if let Some(hint) = hint {
        out.push(' ');
        out.push_str(&hint);
    }
    out
}
