//! Diagnostics: reported-and-continue conditions of bulk operations.
//!
//! Bulk operations never stop on these; they collect them and hand them
//! back so the caller decides whether to log, count, or abort.

use std::fmt;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One condition about one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code, see [`codes`].
    pub code: &'static str,
    /// Reference designator of the symbol concerned (may be empty).
    pub reference: String,
    /// Field concerned, if any.
    pub field: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &'static str, reference: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            reference: reference.to_owned(),
            field: None,
            message: message.into(),
        }
    }

    pub fn warning(code: &'static str, reference: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, reference, message)
        }
    }

    /// Set the field this diagnostic is about.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}", self.severity, self.code, self.reference)?;
        if let Some(field) = &self.field {
            write!(f, " ({field})")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
pub mod codes {
    /// No database row matched a non-special symbol.
    pub const NO_MATCH: &str = "E0001";
    /// Removal of a reserved-prefix field was refused.
    pub const PROTECTED_FIELD: &str = "E0002";

    /// Symbol has several properties with the same name.
    pub const DUPLICATE_PROPERTY: &str = "W0001";
    /// Symbol has no Reference property.
    pub const MISSING_REFERENCE: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during a bulk operation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// No database row matched the symbol.
    pub fn no_match(&mut self, reference: &str) {
        self.add(Diagnostic::error(
            codes::NO_MATCH,
            reference,
            "no match found in the component database",
        ));
    }

    /// Removing `field` was refused.
    pub fn protected_field(&mut self, reference: &str, field: &str) {
        self.add(
            Diagnostic::error(codes::PROTECTED_FIELD, reference, "cannot remove a protected field")
                .with_field(field),
        );
    }

    /// `field` appears more than once; the last one is used for matching.
    pub fn duplicate_property(&mut self, reference: &str, field: &str) {
        self.add(
            Diagnostic::warning(
                codes::DUPLICATE_PROPERTY,
                reference,
                "duplicate property, the last one is used",
            )
            .with_field(field),
        );
    }

    pub fn missing_reference(&mut self) {
        self.add(Diagnostic::warning(
            codes::MISSING_REFERENCE,
            "",
            "symbol has no Reference property",
        ));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(codes::PROTECTED_FIELD, "R1", "cannot remove a protected field")
            .with_field("ki_keywords");
        assert_eq!(
            diag.to_string(),
            "error[E0002] R1 (ki_keywords): cannot remove a protected field"
        );
    }

    #[test]
    fn test_collector() {
        let mut collector = DiagnosticCollector::new();
        assert!(collector.is_empty());

        collector.duplicate_property("R1", "MPN");
        assert!(!collector.has_errors());

        collector.no_match("R2");
        assert!(collector.has_errors());
        assert_eq!(collector.len(), 2);

        let diagnostics = collector.finish();
        assert_eq!(diagnostics[1].code, codes::NO_MATCH);
        assert_eq!(diagnostics[1].reference, "R2");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }
}
