//! Common testing utilities for the kilnc test suite.
//!
//! - `gen_ir_for_source`: lower one source string and return its IR
//! - `compile_err`: lower a source string that must fail
//! - `jit_run`: lower and run `main` in the JIT
//!
//! Everything runs with diagnostics suppressed so failing cases stay quiet.

#![allow(dead_code)]

use anyhow::Result;
use inkwell::context::Context;
use kilnc::builder::{CodeGenerator, GeneratorConfig, SourceUnit};
use kilnc::diagnostics::CompileError;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(opt_level: u32) -> GeneratorConfig {
    GeneratorConfig {
        opt_level,
        ..GeneratorConfig::default()
    }
}

/// Lower `src` at optimization level 0 so block and value names survive.
pub fn gen_ir_for_source(src: &str) -> Result<String> {
    init_logging();
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    let generator =
        CodeGenerator::new(&context, &config(0), &[SourceUnit::new("test.kn", src)])?;
    generator
        .ir_strings()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no module produced"))
}

/// Lower `src`, expecting it to be rejected.
pub fn compile_err(src: &str) -> Result<CompileError> {
    init_logging();
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    match CodeGenerator::new(&context, &config(0), &[SourceUnit::new("test.kn", src)]) {
        Ok(_) => anyhow::bail!("expected compilation to fail"),
        Err(e) => Ok(e),
    }
}

/// Message of the diagnostic behind a rejected source.
pub fn compile_err_message(src: &str) -> Result<String> {
    let err = compile_err(src)?;
    Ok(err
        .diagnostic()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| err.to_string()))
}

pub fn jit_run_opt(src: &str, opt_level: u32) -> Result<i32> {
    init_logging();
    let _diag_guard = kilnc::diagnostics::suppress();
    let context = Context::create();
    let generator = CodeGenerator::new(
        &context,
        &config(opt_level),
        &[SourceUnit::new("test.kn", src)],
    )?;
    Ok(generator.jit_execute()?)
}

/// Lower `src` and run its `main` in the JIT.
pub fn jit_run(src: &str) -> Result<i32> {
    jit_run_opt(src, 0)
}
