use crate::OutputFormat;
use crate::output::{json, text};
use anyhow::{Context, Result};
use sign_align::{
    AlignConfig, AlignSession, HandshapeTable, InvariantBehavior, KindAlignment, ModuleKind, Sign,
    SignAlignment,
};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub struct AlignArgs<'p> {
    pub sign1_path: &'p str,
    pub sign2_path: &'p str,
    pub format: OutputFormat,
    pub kind: Option<ModuleKind>,
    pub config_path: Option<&'p str>,
    pub handshapes_path: Option<&'p str>,
    pub coding_order_only: bool,
    pub strict: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn run(args: AlignArgs<'_>) -> Result<ExitCode> {
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let config = build_config(args.config_path, args.coding_order_only, args.strict)?;
    let session = match args.handshapes_path {
        Some(path) => AlignSession::with_handshapes(load_handshapes(path)?),
        None => AlignSession::new(),
    };

    let sign1 = load_sign(args.sign1_path)?;
    let sign2 = load_sign(args.sign2_path)?;

    let alignment = match args.kind {
        Some(kind) => align_one_kind(&session, &sign1, &sign2, kind, &config)?,
        None => session
            .try_align_signs(&sign1, &sign2, &config)
            .context("Alignment failed")?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match args.format {
        OutputFormat::Text => text::write_text_alignment(&mut handle, &alignment, verbosity)?,
        OutputFormat::Json => json::write_json_alignment(&mut handle, &alignment)?,
    }
    handle.flush()?;

    Ok(exit_code_from_alignment(&alignment))
}

fn align_one_kind<'a>(
    session: &AlignSession,
    sign1: &'a Sign,
    sign2: &'a Sign,
    kind: ModuleKind,
    config: &AlignConfig,
) -> Result<SignAlignment<'a>> {
    sign1.validate()?;
    sign2.validate()?;
    let pairs = session
        .try_align_modules(sign1, sign2, kind, config)
        .with_context(|| format!("Alignment of {} modules failed", kind))?;
    Ok(SignAlignment {
        gloss1: &sign1.gloss,
        gloss2: &sign2.gloss,
        kinds: vec![KindAlignment { kind, pairs }],
    })
}

pub(crate) fn load_sign(path: &str) -> Result<Sign> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read sign: {}", path))?;
    let sign: Sign =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse sign: {}", path))?;
    Ok(sign)
}

fn load_handshapes(path: &str) -> Result<HandshapeTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read handshape table: {}", path))?;
    let table: HandshapeTable = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse handshape table: {}", path))?;
    if table.is_empty() {
        log::warn!("handshape table {} is empty; only forearm matching applies", path);
    }
    Ok(table)
}

/// The CLI degrades on partition check failures unless `--strict` is given or the config
/// file sets `on_invariant_violation` itself.
fn build_config(path: Option<&str>, coding_order_only: bool, strict: bool) -> Result<AlignConfig> {
    let (mut config, explicit_behavior) = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config: {}", path))?;
            let explicit = value.get("on_invariant_violation").is_some();
            let config = serde_json::from_value::<AlignConfig>(value)
                .with_context(|| format!("Failed to parse config: {}", path))?;
            (config, explicit)
        }
        None => (AlignConfig::default(), false),
    };
    if coding_order_only {
        config.enable_content_matching = false;
    }
    if strict {
        config.on_invariant_violation = InvariantBehavior::ReturnError;
    } else if !explicit_behavior {
        config.on_invariant_violation = InvariantBehavior::Degrade;
    }
    config.validate().context("Invalid alignment config")?;
    log::debug!("alignment config: {:?}", config);
    Ok(config)
}

fn exit_code_from_alignment(alignment: &SignAlignment<'_>) -> ExitCode {
    let totals = alignment.total_counts();
    if totals.left_only == 0 && totals.right_only == 0 {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
