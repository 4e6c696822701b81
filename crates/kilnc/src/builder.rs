//! The code generator driver.
//!
//! [`CodeGenerator::new`] parses and lowers every translation unit against
//! one shared LLVM context, verifying each module as it completes. The
//! finished modules can then be written out as IR, assembly or objects,
//! linked into an executable, or handed to the JIT.

use crate::codegen::{CodeGen, FUNCTION_PIPELINE, FunctionPasses};
use crate::diagnostics::{CompileError, Diagnostic, ErrorReporter};
use crate::linking;
use crate::parser;

use inkwell::OptimizationLevel;
use inkwell::context::Context;
use inkwell::execution_engine::ExecutionEngine;
use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine,
};
use inkwell::types::BasicTypeEnum;
use std::fs;
use std::path::{Path, PathBuf};

/// One source file and its text.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub source: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        SourceUnit {
            path: path.into(),
            source: source.into(),
        }
    }

    /// File name without extension, used to name artifacts.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("out")
            .to_string()
    }
}

/// Backend settings shared by every unit.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// 0 to 3.
    pub opt_level: u32,
    /// `static` or `pic`.
    pub relocation_model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            opt_level: 2,
            relocation_model: "pic".to_string(),
        }
    }
}

/// Validated form of [`GeneratorConfig`].
#[derive(Debug, Clone, Copy)]
struct BackendSettings {
    opt_level: u32,
    llvm_opt: OptimizationLevel,
    reloc: RelocMode,
}

impl BackendSettings {
    fn from_config(config: &GeneratorConfig) -> Result<Self, CompileError> {
        let llvm_opt = match config.opt_level {
            0 => OptimizationLevel::None,
            1 => OptimizationLevel::Less,
            2 => OptimizationLevel::Default,
            3 => OptimizationLevel::Aggressive,
            n => {
                return Err(CompileError::Config(format!(
                    "invalid optimization level '{}'",
                    n
                )));
            }
        };
        let reloc = match config.relocation_model.to_ascii_lowercase().as_str() {
            "static" => RelocMode::Static,
            "pic" => RelocMode::PIC,
            _ => {
                return Err(CompileError::Config(format!(
                    "invalid relocation model '{}'",
                    config.relocation_model
                )));
            }
        };
        Ok(BackendSettings {
            opt_level: config.opt_level,
            llvm_opt,
            reloc,
        })
    }
}

/// Creates a target machine for the host.
///
/// The generic CPU is tried before `native`, which some targets reject.
fn host_target_machine(
    opt: OptimizationLevel,
    reloc: RelocMode,
) -> Result<TargetMachine, CompileError> {
    Target::initialize_native(&InitializationConfig::default())
        .map_err(|e| CompileError::Backend(format!("failed to initialize native target: {}", e)))?;
    let triple = TargetMachine::get_default_triple();
    let target = Target::from_triple(&triple)
        .map_err(|e| CompileError::Backend(format!("failed to get target from triple: {}", e)))?;

    for cpu in ["", "native"] {
        if let Some(machine) =
            target.create_target_machine(&triple, cpu, "", opt, reloc, CodeModel::Default)
        {
            return Ok(machine);
        }
    }
    Err(CompileError::Backend(
        "failed to create a target machine for the host".to_string(),
    ))
}

struct LoweredUnit<'ctx> {
    stem: String,
    module: Module<'ctx>,
}

/// Owns the lowered modules of a compilation.
pub struct CodeGenerator<'ctx> {
    settings: BackendSettings,
    target_machine: TargetMachine,
    units: Vec<LoweredUnit<'ctx>>,
}

impl<'ctx> CodeGenerator<'ctx> {
    /// Validate `config`, then parse, lower and verify every unit in order.
    ///
    /// The first error in any unit aborts the whole compilation.
    pub fn new(
        context: &'ctx Context,
        config: &GeneratorConfig,
        units: &[SourceUnit],
    ) -> Result<Self, CompileError> {
        let settings = BackendSettings::from_config(config)?;
        let target_machine = host_target_machine(settings.llvm_opt, settings.reloc)?;
        let target_data = target_machine.get_target_data();
        let data_layout = target_data.get_data_layout();
        let triple = target_machine.get_triple();

        let mut lowered = Vec::with_capacity(units.len());
        for unit in units {
            let file = unit.path.to_string_lossy();
            let reporter = ErrorReporter::new(&file, &unit.source);
            log::debug!("lowering {}", file);

            let ast = parser::parse_source(&unit.source)
                .map_err(|d| CompileError::Parse(reporter.locate(d)))?;

            let passes = if settings.opt_level > 0 {
                Some(FunctionPasses {
                    machine: host_target_machine(settings.llvm_opt, settings.reloc)?,
                    pipeline: FUNCTION_PIPELINE,
                })
            } else {
                None
            };

            let codegen = CodeGen::new(context, &unit.stem(), passes);
            codegen.module.set_triple(&triple);
            codegen.module.set_data_layout(&data_layout);
            codegen
                .gen_module(&ast)
                .map_err(|d| CompileError::Codegen(reporter.locate(d)))?;

            let module = codegen.into_module();
            module.verify().map_err(|e| {
                CompileError::Codegen(reporter.locate(
                    Diagnostic::simple("module failed verification")
                        .with_note(e.to_string().trim_end().to_string()),
                ))
            })?;

            lowered.push(LoweredUnit {
                stem: unit.stem(),
                module,
            });
        }

        Ok(CodeGenerator {
            settings,
            target_machine,
            units: lowered,
        })
    }

    /// Textual IR of every unit, in order.
    pub fn ir_strings(&self) -> Vec<String> {
        self.units
            .iter()
            .map(|u| u.module.print_to_string().to_string())
            .collect()
    }

    /// Writes `<stem>.ll` for each unit into `out_dir`.
    pub fn emit_llvm_ir(&self, out_dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = out_dir.join(format!("{}.ll", unit.stem));
            let ir = unit.module.print_to_string().to_string();
            write_artifact(&path, ir.as_bytes())?;
            written.push(path);
        }
        Ok(written)
    }

    /// Writes `<stem>.s` for each unit into `out_dir`.
    pub fn emit_assembly(&self, out_dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
        self.emit_machine_code(out_dir, FileType::Assembly, "s")
    }

    /// Writes `<stem>.o` for each unit into `out_dir`.
    pub fn emit_object(&self, out_dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
        self.emit_machine_code(out_dir, FileType::Object, "o")
    }

    fn emit_machine_code(
        &self,
        out_dir: &Path,
        file_type: FileType,
        ext: &str,
    ) -> Result<Vec<PathBuf>, CompileError> {
        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = out_dir.join(format!("{}.{}", unit.stem, ext));
            let buffer = self
                .target_machine
                .write_to_memory_buffer(&unit.module, file_type)
                .map_err(|e| {
                    CompileError::Backend(format!("failed to emit '{}': {}", path.display(), e))
                })?;
            write_artifact(&path, buffer.as_slice())?;
            written.push(path);
        }
        Ok(written)
    }

    /// Emit every unit as an object in a scratch directory and link them into
    /// `output`.
    pub fn emit_executable(&self, output: &Path, libs: &[String]) -> Result<(), CompileError> {
        let scratch = tempfile::Builder::new()
            .prefix("kilnc-")
            .tempdir()
            .map_err(|e| CompileError::File {
                path: std::env::temp_dir().display().to_string(),
                source: e,
            })?;

        let mut objects = Vec::with_capacity(self.units.len());
        for (idx, unit) in self.units.iter().enumerate() {
            let path = scratch.path().join(format!("{}-{}.o", idx, unit.stem));
            let buffer = self
                .target_machine
                .write_to_memory_buffer(&unit.module, FileType::Object)
                .map_err(|e| CompileError::Backend(format!("failed to emit object: {}", e)))?;
            write_artifact(&path, buffer.as_slice())?;
            objects.push(path);
        }

        let static_reloc = matches!(self.settings.reloc, RelocMode::Static);
        linking::link_executable(&objects, output, libs, static_reloc)
    }

    /// Link every unit into one module and run its `main` in the JIT.
    ///
    /// Consumes the generator: the modules belong to the execution engine
    /// from here on.
    pub fn jit_execute(self) -> Result<i32, CompileError> {
        let mut units = self.units.into_iter();
        let Some(first) = units.next() else {
            return Err(CompileError::Jit("symbol main could not be found".to_string()));
        };
        let module = first.module;
        for unit in units {
            module
                .link_in_module(unit.module)
                .map_err(|e| CompileError::Jit(format!("failed to link '{}': {}", unit.stem, e)))?;
        }

        let main_ret = match module.get_function("main") {
            Some(f) if f.count_basic_blocks() > 0 => {
                if f.count_params() != 0 {
                    return Err(CompileError::Jit("main must take no parameters".to_string()));
                }
                f.get_type().get_return_type()
            }
            _ => return Err(CompileError::Jit("symbol main could not be found".to_string())),
        };

        ExecutionEngine::link_in_mc_jit();
        let engine = module
            .create_jit_execution_engine(self.settings.llvm_opt)
            .map_err(|e| CompileError::Jit(format!("failed to create JIT engine: {}", e)))?;
        log::debug!("running main in the JIT");

        // The entry point is called with the width it was declared with.
        let width = match main_ret {
            None => 0,
            Some(BasicTypeEnum::IntType(t)) => t.get_bit_width(),
            Some(_) => {
                return Err(CompileError::Jit(
                    "main must return an integer or void".to_string(),
                ));
            }
        };
        let lookup_err = |e| CompileError::Jit(format!("symbol main could not be found: {}", e));
        // SAFETY: `main` takes no parameters and returns `width` bits, as checked above.
        let code = unsafe {
            match width {
                0 => {
                    engine
                        .get_function::<unsafe extern "C" fn()>("main")
                        .map_err(lookup_err)?
                        .call();
                    0
                }
                8 => engine
                    .get_function::<unsafe extern "C" fn() -> i8>("main")
                    .map_err(lookup_err)?
                    .call() as i32,
                16 => engine
                    .get_function::<unsafe extern "C" fn() -> i16>("main")
                    .map_err(lookup_err)?
                    .call() as i32,
                32 => engine
                    .get_function::<unsafe extern "C" fn() -> i32>("main")
                    .map_err(lookup_err)?
                    .call(),
                _ => engine
                    .get_function::<unsafe extern "C" fn() -> i64>("main")
                    .map_err(lookup_err)?
                    .call() as i32,
            }
        };
        Ok(code)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), CompileError> {
    log::debug!("writing {}", path.display());
    fs::write(path, bytes).map_err(|e| CompileError::File {
        path: path.display().to_string(),
        source: e,
    })
}
