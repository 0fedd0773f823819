use crate::sort_labels;
use crate::Diagnostic;
use crate::FileId;
use crate::Label;
use std::fmt::Write;

/// Provides access to source text for rendering diagnostics.
pub trait SourceProvider {
  fn file_name(&self, file: FileId) -> Option<&str>;
  fn file_text(&self, file: FileId) -> Option<&str>;
}

/// Render a diagnostic into a human-readable string with caret highlighting.
///
/// Each label gets its own snippet line; multi-line spans are underlined up
/// to the end of their first line.
pub fn render_diagnostic(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  let mut labels = Vec::with_capacity(diagnostic.labels.len() + 1);
  labels.push(Label::primary(diagnostic.primary, diagnostic.message.clone()));
  labels.extend(diagnostic.labels.iter().cloned());
  sort_labels(&mut labels);

  let _ = writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  );

  let mut current_file = None;
  for label in &labels {
    let name = provider.file_name(label.span.file).unwrap_or("<unknown>");
    let text = provider.file_text(label.span.file);
    let Some(text) = text else {
      if current_file != Some(label.span.file) {
        let _ = writeln!(output, " --> {name}:?:?");
        let _ = writeln!(output, "  | <source unavailable>");
        current_file = Some(label.span.file);
      }
      if !label.message.is_empty() {
        let _ = writeln!(output, "  = label: {}", label.message);
      }
      continue;
    };

    let start = clamp_to_char_boundary(text, label.span.range.start as usize);
    let end = clamp_to_char_boundary(text, label.span.range.end as usize).max(start);
    let (line_no, line_start, line_end) = line_containing(text, start);
    if current_file != Some(label.span.file) {
      let col = text[line_start..start].chars().count() + 1;
      let _ = writeln!(output, " --> {name}:{line_no}:{col}");
      current_file = Some(label.span.file);
    }

    let line = &text[line_start..line_end];
    let gutter = line_no.to_string().len();
    let pad = text[line_start..start].chars().count();
    let width = text[start..end.min(line_end)].chars().count().max(1);
    let marker = if label.is_primary { '^' } else { '-' };
    let _ = writeln!(output, "{:>gutter$} |", "");
    let _ = writeln!(output, "{line_no} | {line}");
    let _ = write!(
      output,
      "{:>gutter$} | {}{}",
      "",
      " ".repeat(pad),
      marker.to_string().repeat(width)
    );
    if label.message.is_empty() {
      output.push('\n');
    } else {
      let _ = writeln!(output, " {}", label.message);
    }
  }

  for note in &diagnostic.notes {
    let _ = writeln!(output, "= note: {note}");
  }
  output
}

fn clamp_to_char_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while offset > 0 && !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}

/// One-based line number plus the byte bounds of the line holding `offset`.
fn line_containing(text: &str, offset: usize) -> (usize, usize, usize) {
  let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
  let line_end = text[offset..]
    .find('\n')
    .map(|i| offset + i)
    .unwrap_or(text.len());
  let line_no = text[..line_start].matches('\n').count() + 1;
  (line_no, line_start, line_end)
}
