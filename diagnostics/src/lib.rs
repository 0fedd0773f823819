//! Shared diagnostics model and rendering utilities.
//!
//! ```
//! use diagnostics::render::render_diagnostic;
//! use diagnostics::{Diagnostic, SimpleFiles, Span, TextRange};
//!
//! let mut files = SimpleFiles::new();
//! let file = files.add("Orders.cs", "orders.Select(o => o.Customer)");
//! let diag = Diagnostic::warning(
//!   "TEST0001",
//!   "an example warning",
//!   Span::new(file, TextRange::new(0, 6)),
//! );
//!
//! let rendered = render_diagnostic(&files, &diag);
//! assert!(rendered.contains("warning[TEST0001]"));
//! assert!(rendered.contains("--> Orders.cs:1:1"));
//! ```

pub mod files;
pub mod render;

pub use files::SimpleFiles;

use query_ast::loc::Loc;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// A stable identifier for a source unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

/// A byte range in a file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }
}

impl From<Loc> for TextRange {
  /// Saturates offsets that do not fit `u32`.
  fn from(value: Loc) -> Self {
    Self {
      start: u32::try_from(value.0).unwrap_or(u32::MAX),
      end: u32::try_from(value.1).unwrap_or(u32::MAX),
    }
  }
}

/// A span across a specific file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct Span {
  pub file: FileId,
  pub range: TextRange,
}

impl Span {
  pub const fn new(file: FileId, range: TextRange) -> Self {
    Self { file, range }
  }

  pub fn from_loc(file: FileId, loc: Loc) -> Self {
    Self::new(file, loc.into())
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A label attached to a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Label {
  pub span: Span,
  pub message: String,
  pub is_primary: bool,
}

impl Label {
  pub fn primary(span: Span, message: impl Into<String>) -> Self {
    Self {
      span,
      message: message.into(),
      is_primary: true,
    }
  }

  pub fn secondary(span: Span, message: impl Into<String>) -> Self {
    Self {
      span,
      message: message.into(),
      is_primary: false,
    }
  }
}

/// A user-facing diagnostic with optional labels and notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub primary: Span,
  pub labels: Vec<Label>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    code: &'static str,
    message: impl Into<String>,
    primary: Span,
  ) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      primary,
      labels: Vec::new(),
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Error, code, message, primary)
  }

  pub fn warning(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Warning, code, message, primary)
  }

  pub fn with_label(mut self, label: Label) -> Self {
    self.labels.push(label);
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.push_note(note);
    self
  }

  pub fn push_note(&mut self, note: impl Into<String>) {
    self.notes.push(note.into());
  }
}

/// Orders labels by file and offset, primary labels first.
pub fn sort_labels(labels: &mut [Label]) {
  labels.sort_by(|a, b| {
    b.is_primary
      .cmp(&a.is_primary)
      .then(a.span.cmp(&b.span))
      .then(a.message.cmp(&b.message))
  });
}

/// Orders diagnostics by primary span then code so output does not depend on
/// traversal or scheduling order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
  diagnostics.sort_by(|a, b| {
    a.primary
      .cmp(&b.primary)
      .then(a.code.cmp(b.code))
      .then(a.message.cmp(&b.message))
  });
}
