use diagnostics::Diagnostic;

/// Receives reported diagnostics. The primary span of each diagnostic
/// identifies the offending call-site.
pub trait DiagnosticSink {
  fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
  fn report(&mut self, diagnostic: Diagnostic) {
    self.push(diagnostic);
  }
}
