use anyhow::Result;
use sign_align::{AlignmentReport, SignAlignment};
use std::io::Write;

pub fn write_json_alignment<W: Write>(w: &mut W, alignment: &SignAlignment<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, &AlignmentReport::from(alignment))?;
    writeln!(w)?;
    Ok(())
}
