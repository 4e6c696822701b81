use anyhow::Result;
use inkwell::context::Context;
use kilnc::builder::{CodeGenerator, GeneratorConfig, SourceUnit};
use kilnc::{CompileOptions, EmitKind};
use tempfile::tempdir;

const PROGRAM: &str = "fn main() -> i32 { return 1 + 2 * 3; }";

#[test]
fn writes_ir_assembly_and_object_by_stem() -> Result<()> {
    let dir = tempdir()?;
    let context = Context::create();
    let units = [SourceUnit::new("/somewhere/prog.kn", PROGRAM)];
    let generator = CodeGenerator::new(&context, &GeneratorConfig::default(), &units)?;

    let ll = generator.emit_llvm_ir(dir.path())?;
    let asm = generator.emit_assembly(dir.path())?;
    let obj = generator.emit_object(dir.path())?;

    assert_eq!(ll, vec![dir.path().join("prog.ll")]);
    assert_eq!(asm, vec![dir.path().join("prog.s")]);
    assert_eq!(obj, vec![dir.path().join("prog.o")]);

    let ir = std::fs::read_to_string(&ll[0])?;
    assert!(ir.contains("define i32 @main()"), "{}", ir);
    assert!(std::fs::metadata(&obj[0])?.len() > 0);
    Ok(())
}

#[test]
fn unwritable_output_is_a_file_error() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("does").join("not").join("exist");
    let context = Context::create();
    let units = [SourceUnit::new("prog.kn", PROGRAM)];
    let generator = CodeGenerator::new(&context, &GeneratorConfig::default(), &units)?;

    let err = generator.emit_llvm_ir(&missing).unwrap_err();
    assert!(
        matches!(err, kilnc::diagnostics::CompileError::File { .. }),
        "{:?}",
        err
    );
    assert!(err.to_string().starts_with("cannot open output file"));
    Ok(())
}

#[test]
fn compile_api_runs_jit_and_writes_llvm() -> Result<()> {
    let dir = tempdir()?;
    let src = dir.path().join("seven.kn");
    std::fs::write(&src, PROGRAM)?;

    let mut options = CompileOptions::new(vec![src.clone()]);
    options.jit = true;
    assert_eq!(kilnc::compile(options)?, Some(7));

    let mut options = CompileOptions::new(vec![src]);
    options.emit = EmitKind::Llvm;
    options.out_dir = Some(dir.path().to_path_buf());
    assert_eq!(kilnc::compile(options)?, None);
    assert!(dir.path().join("seven.ll").exists());
    Ok(())
}

#[test]
fn compile_api_requires_inputs() {
    let err = kilnc::compile(CompileOptions::new(Vec::new())).unwrap_err();
    assert_eq!(err.to_string(), "no input files");
}
