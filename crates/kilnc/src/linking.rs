//! Linking object files into an executable.
//!
//! The system C compiler driver does the actual link so the C runtime and
//! libc come along. `KILN_LINKER` overrides the driver; otherwise the first
//! of `cc`, `clang` and `gcc` that runs is used.

use crate::diagnostics::CompileError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable naming the linker driver.
pub const LINKER_ENV: &str = "KILN_LINKER";

const LINKER_CANDIDATES: [&str; 3] = ["cc", "clang", "gcc"];

fn is_prog_available(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// The linker driver to run.
pub fn find_linker() -> Result<String, CompileError> {
    if let Ok(linker) = std::env::var(LINKER_ENV)
        && !linker.is_empty()
    {
        return Ok(linker);
    }
    LINKER_CANDIDATES
        .iter()
        .find(|c| is_prog_available(c))
        .map(|c| c.to_string())
        .ok_or_else(|| {
            CompileError::Backend(format!(
                "no linker found; tried {} (set {} to override)",
                LINKER_CANDIDATES.join(", "),
                LINKER_ENV
            ))
        })
}

/// Arguments passed to the linker driver, minus the program itself.
pub fn linker_args(
    objects: &[PathBuf],
    output: &Path,
    libs: &[String],
    static_reloc: bool,
) -> Vec<String> {
    let mut args: Vec<String> = objects
        .iter()
        .map(|o| o.display().to_string())
        .collect();
    // Position-dependent objects cannot go into a PIE.
    if static_reloc {
        args.push("-no-pie".to_string());
    }
    args.push("-o".to_string());
    args.push(output.display().to_string());
    args.extend(libs.iter().map(|l| format!("-l{}", l)));
    args
}

/// Links `objects` into the executable `output`.
pub fn link_executable(
    objects: &[PathBuf],
    output: &Path,
    libs: &[String],
    static_reloc: bool,
) -> Result<(), CompileError> {
    let linker = find_linker()?;
    let args = linker_args(objects, output, libs, static_reloc);
    log::debug!("linking with {} {}", linker, args.join(" "));

    let out = Command::new(&linker).args(&args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CompileError::Backend(format!("linker '{}' not found in PATH", linker))
        } else {
            CompileError::Backend(format!("failed to run linker '{}': {}", linker, e))
        }
    })?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(CompileError::Backend(format!(
            "{} failed to link '{}': {}",
            linker,
            output.display(),
            stderr.trim_end()
        )));
    }
    Ok(())
}
