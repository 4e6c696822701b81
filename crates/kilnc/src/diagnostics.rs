//! Diagnostic reporting utilities for the Kiln compiler.
//!
//! Lowering code reports problems as a [`Diagnostic`] carrying a message and
//! the byte offset of the offending node. The driver attaches file and
//! source-line information through an [`ErrorReporter`] once a translation
//! unit fails, then wraps the result in a [`CompileError`].
//!
//! Output looks like:
//!
//! ```text
//! In file main.kn, line 2:
//! error: unknown variable 'y' referenced
//!   return y;
//!          ^
//! ```

use colored::Colorize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result alias used throughout lowering.
pub type DiagnosticResult<T> = Result<T, Diagnostic>;

/// Structured diagnostic container for propagating compiler errors.
///
/// Lowering creates these with only a message and (usually) a span start;
/// `file` and `location` are filled in by [`ErrorReporter::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary error message describing the issue
    pub message: String,
    /// File the error occurred in, once known
    pub file: Option<String>,
    /// Optional additional context
    pub note: Option<String>,
    /// Byte offset into the source text of the offending node
    pub span_start: Option<usize>,
    /// Resolved line information for `span_start`
    pub location: Option<SourceLocation>,
}

/// A 1-based line number plus the text of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl Diagnostic {
    /// Creates a diagnostic with only an error message.
    pub fn simple(msg: impl Into<String>) -> Self {
        Diagnostic {
            message: msg.into(),
            file: None,
            note: None,
            span_start: None,
            location: None,
        }
    }

    /// Creates a span-aware diagnostic pointing at `span_start`.
    pub fn simple_with_span(msg: impl Into<String>, span_start: usize) -> Self {
        Diagnostic {
            message: msg.into(),
            file: None,
            note: None,
            span_start: Some(span_start),
            location: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.location) {
            (Some(file), Some(loc)) => writeln!(f, "In file {}, line {}:", file, loc.line)?,
            (Some(file), None) => writeln!(f, "In file {}:", file)?,
            _ => {}
        }
        write!(f, "error: {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, "\n{}\n{}^", loc.text, " ".repeat(loc.column))?;
        }
        if let Some(note) = &self.note {
            write!(f, "\nnote: {}", note)?;
        }
        Ok(())
    }
}

/// Every way a compilation can fail.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The source did not parse.
    #[error("{0}")]
    Parse(Diagnostic),

    /// Lowering rejected the program, or the backend verifier rejected the
    /// lowered IR.
    #[error("{0}")]
    Codegen(Diagnostic),

    /// An output path could not be opened or written.
    #[error("cannot open output file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JIT engine setup failed or the entry symbol is missing.
    #[error("{0}")]
    Jit(String),

    /// Target machine creation, emission or linking failed.
    #[error("{0}")]
    Backend(String),

    /// Invalid optimization level or relocation model.
    #[error("{0}")]
    Config(String),
}

impl CompileError {
    /// The diagnostic behind a parse or codegen failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            CompileError::Parse(d) | CompileError::Codegen(d) => Some(d),
            _ => None,
        }
    }
}

/// Finds the start of the line containing `offset` by walking backwards
/// until a newline or the start of input.
pub fn line_start(source: &str, offset: usize) -> usize {
    let bytes = source.as_bytes();
    let mut idx = offset.min(bytes.len());
    while idx > 0 && bytes[idx - 1] != b'\n' {
        idx -= 1;
    }
    idx
}

/// 1-based line number of `offset`.
pub fn line_number(source: &str, offset: usize) -> usize {
    let start = line_start(source, offset);
    source.as_bytes()[..start]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Text of the line containing `offset`, without its newline.
pub fn line_text(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let end = source[start..]
        .find('\n')
        .map_or(source.len(), |n| start + n);
    source[start..end].trim_end_matches('\r')
}

/// Builds position-annotated diagnostics for one translation unit.
pub struct ErrorReporter<'s> {
    file: &'s str,
    source: &'s str,
}

impl<'s> ErrorReporter<'s> {
    pub fn new(file: &'s str, source: &'s str) -> Self {
        ErrorReporter { file, source }
    }

    /// Attach the file name and, when the diagnostic has a span, the line
    /// number and line text.
    pub fn locate(&self, mut diag: Diagnostic) -> Diagnostic {
        diag.file = Some(sanitize_file_path(self.file));
        if let Some(offset) = diag.span_start {
            let offset = offset.min(self.source.len());
            let start = line_start(self.source, offset);
            diag.location = Some(SourceLocation {
                line: line_number(self.source, offset),
                column: self.source[start..offset].chars().count(),
                text: line_text(self.source, offset).to_string(),
            });
        }
        diag
    }

    /// Format `message` at `span_start` the way [`Diagnostic`] displays.
    pub fn format_error(&self, span_start: usize, message: &str) -> String {
        self.locate(Diagnostic::simple_with_span(message, span_start))
            .to_string()
    }
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Prints a compile error to stderr, prefixed by the program name for
/// errors that have no source position.
pub fn report(program_name: &str, err: &CompileError) {
    match err.diagnostic() {
        Some(d) => {
            if DIAGNOSTICS_ENABLED.load(Ordering::SeqCst) {
                emit_diagnostic(d);
                eprintln!("compilation terminated.");
            }
        }
        None => report_message(program_name, &err.to_string()),
    }
}

/// Prints `<program>: error: <message>` and the termination line.
pub fn report_message(program_name: &str, message: &str) {
    if !DIAGNOSTICS_ENABLED.load(Ordering::SeqCst) {
        return;
    }
    eprintln!("{}: {} {}", program_name, "error:".red().bold(), message);
    eprintln!("compilation terminated.");
}

/// Prints a located diagnostic with a colored `error:` label.
pub fn emit_diagnostic(d: &Diagnostic) {
    if !DIAGNOSTICS_ENABLED.load(Ordering::SeqCst) {
        return;
    }
    match (&d.file, &d.location) {
        (Some(file), Some(loc)) => eprintln!("In file {}, line {}:", file, loc.line),
        (Some(file), None) => eprintln!("In file {}:", file),
        _ => {}
    }
    eprintln!("{} {}", "error:".red().bold(), d.message);
    if let Some(loc) = &d.location {
        eprintln!("{}", loc.text);
        eprintln!("{}{}", " ".repeat(loc.column), "^".green().bold());
    }
    if let Some(note) = &d.note {
        eprintln!("{} {}", "note:".blue().bold(), note);
    }
}

/// Keeps only the file name so diagnostics don't leak directory layout.
fn sanitize_file_path(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string()
}

/// Temporarily suppresses diagnostic output, mainly for tests.
///
/// ```rust
/// use kilnc::diagnostics;
/// let _guard = diagnostics::suppress();
/// // nothing is printed until `_guard` is dropped
/// ```
pub fn suppress() -> SuppressGuard {
    let prev = DIAGNOSTICS_ENABLED.swap(false, Ordering::SeqCst);
    SuppressGuard { prev }
}

/// RAII guard restoring the previous diagnostic state on drop.
pub struct SuppressGuard {
    prev: bool,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        DIAGNOSTICS_ENABLED.store(self.prev, Ordering::SeqCst);
    }
}
