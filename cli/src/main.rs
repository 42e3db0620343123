mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use sign_align::{AlignError, ModuleKind};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sign-align")]
#[command(about = "Align the modules of two coded signs")]
#[command(version)]
pub struct Cli {
    #[arg(long, short, global = true, help = "Verbose mode: debug logging and module details")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Align two signs module by module")]
    Align {
        #[arg(help = "Path to the first sign (JSON)")]
        sign1: String,
        #[arg(help = "Path to the second sign (JSON)")]
        sign2: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, value_enum, help = "Align only this module kind")]
        kind: Option<KindArg>,
        #[arg(long, value_name = "PATH", help = "Alignment config (JSON)")]
        config: Option<String>,
        #[arg(
            long,
            value_name = "PATH",
            help = "Handshape table replacing the predefined one (JSON)"
        )]
        handshapes: Option<String>,
        #[arg(long, help = "Skip content matching; pair by articulator and coding order only")]
        coding_order_only: bool,
        #[arg(long, help = "Fail instead of degrading when a partition check trips")]
        strict: bool,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
    },
    #[command(about = "Show the modules coded for a sign")]
    Info {
        #[arg(help = "Path to the sign (JSON)")]
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    SignType,
    Movement,
    Location,
    Relation,
    Orientation,
    HandConfiguration,
    NonManual,
}

impl From<KindArg> for ModuleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::SignType => ModuleKind::SignType,
            KindArg::Movement => ModuleKind::Movement,
            KindArg::Location => ModuleKind::Location,
            KindArg::Relation => ModuleKind::Relation,
            KindArg::Orientation => ModuleKind::Orientation,
            KindArg::HandConfiguration => ModuleKind::HandConfiguration,
            KindArg::NonManual => ModuleKind::NonManual,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Align {
            sign1,
            sign2,
            format,
            kind,
            config,
            handshapes,
            coding_order_only,
            strict,
            quiet,
        } => commands::align::run(commands::align::AlignArgs {
            sign1_path: &sign1,
            sign2_path: &sign2,
            format,
            kind: kind.map(ModuleKind::from),
            config_path: config.as_deref(),
            handshapes_path: handshapes.as_deref(),
            coding_order_only,
            strict,
            quiet,
            verbose: cli.verbose,
        }),
        Commands::Info { path } => commands::info::run(&path),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_internal_error(err) {
        ExitCode::from(3)
    } else {
        ExitCode::from(2)
    }
}

fn is_internal_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<AlignError>()
            .is_some_and(|e| !matches!(e, AlignError::InvalidSign { .. }))
    })
}
