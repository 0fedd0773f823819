//! Registry of diagnostic codes emitted by `linq-check`.

use diagnostics::{Diagnostic, Span};

/// Metadata describing a diagnostic code.
#[derive(Clone, Copy, Debug)]
pub struct Code {
  /// Stable string identifier, e.g. `LINQ0001`.
  pub id: &'static str,
  /// Short description of what the diagnostic reports.
  pub description: &'static str,
  /// Notes automatically added to the diagnostic.
  pub notes: &'static [&'static str],
}

impl Code {
  pub const fn new(id: &'static str, description: &'static str, notes: &'static [&'static str]) -> Self {
    Code {
      id,
      description,
      notes,
    }
  }

  pub const fn as_str(&self) -> &'static str {
    self.id
  }

  pub fn warning(&self, message: impl Into<String>, primary: Span) -> Diagnostic {
    let mut diagnostic = Diagnostic::warning(self.id, message, primary);
    for note in self.notes {
      diagnostic.push_note(*note);
    }
    diagnostic
  }
}

/// LINQ0001: a remote query operator projects a type the remote provider
/// cannot represent.
///
/// - Primary span: the whole operator call, receiver included.
/// - Labels: secondary on the lambda body, naming the offending type.
/// - Notes: one, on what remote providers can represent.
pub const NON_REMOTE_PROJECTION: Code = Code::new(
  "LINQ0001",
  "query cannot be translated for remote evaluation",
  &["remote query providers only represent scalars, enums, anonymous records and arrays of them"],
);
