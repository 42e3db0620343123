use crate::commands::align::load_sign;
use crate::output::text::describe_module;
use anyhow::Result;
use sign_align::ModuleKind;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &str) -> Result<ExitCode> {
    let sign = load_sign(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let filename = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| path.into());

    writeln!(handle, "Sign: {} ({})", sign.gloss, filename)?;
    match sign.sign_type() {
        Some(module) => writeln!(handle, "Sign type: {}", describe_module(module))?,
        None => writeln!(handle, "Sign type: none")?,
    }

    for kind in ModuleKind::ALL {
        if kind == ModuleKind::SignType {
            continue;
        }
        let mut modules = sign.modules_of_kind(kind);
        if modules.is_empty() {
            continue;
        }
        modules.sort_by_key(|m| m.id);
        writeln!(handle, "{}: {} module(s)", kind, modules.len())?;
        for module in modules {
            writeln!(handle, "  - {}", describe_module(module))?;
        }
    }

    if let Err(e) = sign.validate() {
        writeln!(handle)?;
        writeln!(handle, "Warning: {}", e)?;
    }

    Ok(ExitCode::from(0))
}
