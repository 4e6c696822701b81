//! Kiln compiler library.
//!
//! Parses Kiln source, lowers it to LLVM IR through [`codegen`], and either
//! writes artifacts or runs the program in the JIT. The `kilnc` binary is a
//! thin clap front end over [`compile`].

pub mod builder;
pub mod codegen;
pub mod diagnostics;
pub mod linking;
pub mod parser;
pub mod types;

use anyhow::{Context as _, Result};
use builder::{CodeGenerator, GeneratorConfig, SourceUnit};
use std::path::PathBuf;

/// The artifact a non-JIT compilation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitKind {
    /// A linked executable.
    #[default]
    Exe,
    /// `<stem>.s` per unit.
    Asm,
    /// `<stem>.o` per unit.
    Obj,
    /// `<stem>.ll` per unit.
    Llvm,
}

/// Compilation options for the Kiln compiler.
///
/// Everything the driver needs is passed in explicitly; nothing is read
/// from the environment except the linker override.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Source files, compiled in order as separate units
    pub src_files: Vec<PathBuf>,

    /// Run `main` in the JIT instead of writing artifacts
    pub jit: bool,

    /// Artifact kind when not running in the JIT
    pub emit: EmitKind,

    /// 0 to 3
    pub opt_level: u32,

    /// `static` or `pic`
    pub relocation_model: String,

    /// Libraries passed to the linker as `-l<name>`
    pub link_libs: Vec<String>,

    /// Executable path
    pub output: PathBuf,

    /// Directory for `.ll`, `.s` and `.o` artifacts
    pub out_dir: Option<PathBuf>,
}

impl CompileOptions {
    pub fn new(src_files: Vec<PathBuf>) -> Self {
        let defaults = GeneratorConfig::default();
        Self {
            src_files,
            jit: false,
            emit: EmitKind::default(),
            opt_level: defaults.opt_level,
            relocation_model: defaults.relocation_model,
            link_libs: Vec::new(),
            output: PathBuf::from("a.out"),
            out_dir: None,
        }
    }
}

/// Compile the sources named in `options`.
///
/// Returns `Some(code)` with `main`'s result when the program ran in the
/// JIT and `None` after writing artifacts.
pub fn compile(options: CompileOptions) -> Result<Option<i32>> {
    if options.src_files.is_empty() {
        anyhow::bail!("no input files");
    }

    let mut units = Vec::with_capacity(options.src_files.len());
    for path in &options.src_files {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read input file '{}'", path.display()))?;
        units.push(SourceUnit::new(path.clone(), source));
    }

    let config = GeneratorConfig {
        opt_level: options.opt_level,
        relocation_model: options.relocation_model.clone(),
    };
    let context = inkwell::context::Context::create();
    let generator = CodeGenerator::new(&context, &config, &units)?;
    log::debug!("lowered {} unit(s)", generator.unit_count());

    if options.jit {
        let code = generator.jit_execute()?;
        return Ok(Some(code));
    }

    let out_dir = options.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    match options.emit {
        EmitKind::Exe => generator.emit_executable(&options.output, &options.link_libs)?,
        EmitKind::Asm => {
            generator.emit_assembly(&out_dir)?;
        }
        EmitKind::Obj => {
            generator.emit_object(&out_dir)?;
        }
        EmitKind::Llvm => {
            generator.emit_llvm_ir(&out_dir)?;
        }
    }
    Ok(None)
}
