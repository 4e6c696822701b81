use anyhow::Result;
use inkwell::context::Context;
use kilnc::builder::{CodeGenerator, GeneratorConfig, SourceUnit};
use kilnc::diagnostics::CompileError;

use crate::common::compile_err;

#[test]
fn unknown_variable_points_at_its_line() -> Result<()> {
    let err = compile_err("fn main() -> i32 {\n  return y;\n}")?;
    assert!(matches!(err, CompileError::Codegen(_)), "{:?}", err);
    let text = err.to_string();
    assert_eq!(
        text,
        "In file test.kn, line 2:\nerror: unknown variable 'y' referenced\n  return y;\n         ^"
    );
    Ok(())
}

#[test]
fn parse_errors_are_located() -> Result<()> {
    let err = compile_err("fn main() -> i32 {\n  return 1\n}")?;
    let CompileError::Parse(diag) = &err else {
        anyhow::bail!("expected parse error, got {:?}", err);
    };
    assert!(diag.message.starts_with("syntax error"), "{}", diag.message);
    assert_eq!(diag.file.as_deref(), Some("test.kn"));
    assert!(diag.location.is_some());
    Ok(())
}

#[test]
fn invalid_opt_level_is_rejected_before_lowering() -> Result<()> {
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    let config = GeneratorConfig {
        opt_level: 7,
        ..GeneratorConfig::default()
    };
    // The source is broken too; the configuration error must come first.
    let units = [SourceUnit::new("bad.kn", "fn main(")];
    let Err(err) = CodeGenerator::new(&context, &config, &units) else {
        anyhow::bail!("opt level 7 should be rejected");
    };
    assert!(matches!(err, CompileError::Config(_)));
    assert_eq!(err.to_string(), "invalid optimization level '7'");
    Ok(())
}

#[test]
fn error_in_second_unit_names_that_file() -> Result<()> {
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    let units = [
        SourceUnit::new("src/first.kn", "fn main() -> i32 { return 0; }"),
        SourceUnit::new("src/second.kn", "fn g() -> i32 { return q; }"),
    ];
    let Err(err) = CodeGenerator::new(&context, &GeneratorConfig::default(), &units) else {
        anyhow::bail!("second unit should fail");
    };
    let diag = err
        .diagnostic()
        .ok_or_else(|| anyhow::anyhow!("expected a diagnostic, got {:?}", err))?;
    assert_eq!(diag.file.as_deref(), Some("second.kn"));
    assert_eq!(diag.location.as_ref().map(|l| l.line), Some(1));
    Ok(())
}
