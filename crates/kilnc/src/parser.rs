//! Kiln parser utilities
//!
//! A thin wrapper around `kiln_parser` that turns its errors into compiler
//! diagnostics. The grammar itself lives in `kiln_parser`.

use crate::diagnostics::{Diagnostic, DiagnosticResult};
use kiln_ast::Module;

/// Parse one translation unit.
pub fn parse_source(source: &str) -> DiagnosticResult<Module> {
    kiln_parser::parse_module(source)
        .map_err(|e| Diagnostic::simple_with_span(format!("syntax error: {}", e), e.span.start))
}
