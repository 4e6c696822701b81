//! Command-line front end for the Kiln compiler.
//!
//! ```bash
//! # build an executable
//! kilnc main.kn util.kn -o prog
//!
//! # run main in the JIT; the exit code is its return value
//! kilnc --jit main.kn
//!
//! # write main.ll into out/
//! kilnc --emit llvm --out-dir out main.kn
//! ```

use atty::Stream as AtStream;
use clap::Parser;
use kilnc::diagnostics::{self, CompileError};
use kilnc::{CompileOptions, EmitKind};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kilnc", about = "Kiln compiler", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Source files to compile
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Run `main` in the JIT instead of writing output
    #[arg(long)]
    jit: bool,

    /// Kind of output to write
    #[arg(long, value_enum, default_value_t = EmitKind::Exe)]
    emit: EmitKind,

    /// Optimization level (0-3)
    #[arg(short = 'O', long = "opt-level", default_value_t = 2)]
    opt_level: u32,

    /// Relocation model: static or pic
    #[arg(long = "relocation-model", default_value = "pic")]
    relocation_model: String,

    /// Library to link against; may be repeated
    #[arg(short = 'l', long = "link", value_name = "LIB")]
    link: Vec<String>,

    /// Executable name
    #[arg(short = 'o', long = "output", default_value = "a.out")]
    output: PathBuf,

    /// Directory for .ll, .s and .o output
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Color diagnostics: auto, always or never
    #[arg(long)]
    color: Option<String>,
}

fn main() -> ExitCode {
    let _ = env_logger::try_init();
    let cli = Cli::parse();

    let enable_color = match cli.color.as_deref() {
        Some("always") => true,
        Some("never") => false,
        _ => atty::is(AtStream::Stderr),
    };
    colored::control::set_override(enable_color);

    let program = std::env::args()
        .next()
        .map(|a| {
            std::path::Path::new(&a)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(a)
        })
        .unwrap_or_else(|| "kilnc".to_string());

    let options = CompileOptions {
        src_files: cli.files,
        jit: cli.jit,
        emit: cli.emit,
        opt_level: cli.opt_level,
        relocation_model: cli.relocation_model,
        link_libs: cli.link,
        output: cli.output,
        out_dir: cli.out_dir,
    };

    match kilnc::compile(options) {
        Ok(Some(code)) => ExitCode::from(code as u8),
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CompileError>() {
                Some(ce) => diagnostics::report(&program, ce),
                None => diagnostics::report_message(&program, &format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
