use crate::codes::NON_REMOTE_PROJECTION;
use crate::config::AnalyzerConfig;
use crate::evaluable::EvaluabilityCtx;
use crate::model::{ResolvedSymbol, SemanticModel};
use crate::sink::DiagnosticSink;
use diagnostics::{FileId, Label, Span};
use query_ast::ast::expr::CallExpr;
use query_ast::ast::node::Node;
use query_ast::print::print_call;
use tracing::{debug, trace};

/// How a candidate call-site was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
  /// The resolver returned nothing, or something other than a method.
  NotResolved,
  /// Bound to a method outside the remote operator family.
  NotRemote,
  NoArgument,
  /// The first argument is not a lambda, even after unwrapping.
  NotLambda,
  /// The oracle has no converted type for the lambda body.
  Untyped,
  Evaluable,
  Reported,
}

/// Checks one call-site already matched by name against resolution and the
/// type of its first lambda argument.
pub struct Classifier<'a> {
  model: &'a dyn SemanticModel,
  config: &'a AnalyzerConfig,
  evaluable: EvaluabilityCtx<'a>,
  file: FileId,
  text: Option<&'a str>,
  sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Classifier<'a> {
  pub fn new(
    model: &'a dyn SemanticModel,
    config: &'a AnalyzerConfig,
    file: FileId,
    text: Option<&'a str>,
    sink: &'a mut dyn DiagnosticSink,
  ) -> Self {
    Self {
      model,
      config,
      evaluable: EvaluabilityCtx::new(model.types(), config.max_type_depth),
      file,
      text,
      sink,
    }
  }

  pub fn classify_call(&mut self, call: &Node<CallExpr>) -> Verdict {
    let method = match self.model.resolve_call(call) {
      Some(ResolvedSymbol::Method(method)) => method,
      _ => {
        trace!(loc = ?call.loc, "call-site has no method symbol");
        return Verdict::NotResolved;
      }
    };
    let remote = method
      .containing_type
      .as_deref()
      .is_some_and(|ty| self.config.remote_family.contains(ty));
    if !remote {
      trace!(method = %method.name, containing_type = ?method.containing_type, "not a remote query operator");
      return Verdict::NotRemote;
    }
    let Some(argument) = call.stx.first_argument() else {
      return Verdict::NoArgument;
    };
    let Some(lambda) = argument.stx.value.unwrap_transparent().as_lambda() else {
      trace!(method = %method.name, "first argument is not a lambda");
      return Verdict::NotLambda;
    };
    let body = &lambda.stx.body;
    let Some(ty) = self.model.converted_type(body) else {
      return Verdict::Untyped;
    };
    if self.evaluable.is_client_evaluable(Some(ty)) {
      return Verdict::Evaluable;
    }

    let types = self.model.types();
    let rendered = self.render(call);
    let offender = self.evaluable.explain(ty).unwrap_or(ty);
    let mut label = format!(
      "`{}` is not representable by the remote query provider",
      types.display(offender)
    );
    if offender != ty {
      label.push_str(&format!(" (in `{}`)", types.display(ty)));
    }
    let diagnostic = NON_REMOTE_PROJECTION
      .warning(
        format!("query cannot be translated for remote evaluation: `{rendered}`"),
        Span::from_loc(self.file, call.loc),
      )
      .with_label(Label::secondary(Span::from_loc(self.file, body.loc), label));
    debug!(code = NON_REMOTE_PROJECTION.id, method = %method.name, expression = %rendered, "reporting non-translatable query");
    self.sink.report(diagnostic);
    Verdict::Reported
  }

  /// The call exactly as written when the unit's text is known, otherwise a
  /// rendering of the tree.
  fn render(&self, call: &Node<CallExpr>) -> String {
    self
      .text
      .and_then(|text| call.loc.slice(text))
      .map(str::to_string)
      .unwrap_or_else(|| print_call(call))
  }
}
