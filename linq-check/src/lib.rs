//! Flags query operator calls whose projected type a remote query provider
//! cannot represent.
//!
//! A pass walks a resolved expression tree, picks out calls named like query
//! operators (`Where`, `Select`, `OrderBy`, `Join` by default), keeps those
//! the [`model::SemanticModel`] binds to the remote operator family, and
//! classifies the converted type of their first lambda argument's body. The
//! pass never fails; call-sites it cannot judge are skipped.
//!
//! ```
//! use diagnostics::FileId;
//! use linq_check::config::AnalyzerConfig;
//! use linq_check::model::{AssocModel, ConvertedType, MethodSymbol, ResolvedSymbol};
//! use linq_check::{Analyzer, SourceUnit};
//! use query_ast::ast::expr::Expr;
//! use query_ast::build::*;
//! use query_types::TypeStore;
//!
//! let mut types = TypeStore::new();
//! let customer = types.named("Shop.Customer");
//!
//! let body = member(id("o"), "Customer").with_assoc(ConvertedType(customer));
//! let mut root = method_call(id("orders"), "Select", vec![lambda(&["o"], body)]);
//! if let Expr::Call(call) = &mut *root.stx {
//!   call.assoc.set(ResolvedSymbol::Method(MethodSymbol::new("Select", "System.Linq.Queryable")));
//! }
//!
//! let unit = SourceUnit::new(FileId(0), vec![root]);
//! let config = AnalyzerConfig::default();
//! let mut diagnostics = Vec::new();
//! let summary = Analyzer::new(&config).check_unit(&AssocModel::new(&types), &unit, &mut diagnostics);
//! assert_eq!(summary.reported, 1);
//! assert!(diagnostics[0].message.contains("orders.Select(o => o.Customer)"));
//! ```

pub mod classify;
pub mod codes;
pub mod config;
pub mod evaluable;
mod locator;
pub mod model;
pub mod sink;

use classify::Classifier;
use config::AnalyzerConfig;
use derive_visitor::Drive;
use diagnostics::{sort_diagnostics, Diagnostic, FileId};
use locator::ChainLocator;
use model::SemanticModel;
use query_ast::ast::expr::Expr;
use query_ast::ast::node::Node;
use rayon::prelude::*;
use sink::DiagnosticSink;
use std::sync::atomic::AtomicBool;
use tracing::debug_span;

/// One source unit's expression roots as handed over by the host.
pub struct SourceUnit {
  pub file: FileId,
  /// Original text, when available; node locs index into it.
  pub text: Option<String>,
  pub roots: Vec<Node<Expr>>,
}

impl SourceUnit {
  pub fn new(file: FileId, roots: Vec<Node<Expr>>) -> Self {
    Self {
      file,
      text: None,
      roots,
    }
  }

  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = Some(text.into());
    self
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitSummary {
  /// Distinct call-sites handed to the classifier.
  pub classified: usize,
  pub reported: usize,
  /// Set when the pass stopped early because cancellation was requested.
  pub cancelled: bool,
}

/// Configured entry point for checking units.
pub struct Analyzer<'a> {
  config: &'a AnalyzerConfig,
  cancellation: Option<&'a AtomicBool>,
}

impl<'a> Analyzer<'a> {
  pub fn new(config: &'a AnalyzerConfig) -> Self {
    Self {
      config,
      cancellation: None,
    }
  }

  /// Checked before each call-site; once set, remaining call-sites are
  /// skipped.
  pub fn with_cancellation(mut self, flag: &'a AtomicBool) -> Self {
    self.cancellation = Some(flag);
    self
  }

  pub fn check_unit(
    &self,
    model: &dyn SemanticModel,
    unit: &SourceUnit,
    sink: &mut dyn DiagnosticSink,
  ) -> UnitSummary {
    let span = debug_span!(
      "linq_check.analyze",
      file = unit.file.0,
      roots = unit.roots.len(),
      classified = tracing::field::Empty,
      reported = tracing::field::Empty,
    );
    let _guard = span.enter();

    let classifier = Classifier::new(model, self.config, unit.file, unit.text.as_deref(), sink);
    let mut locator = ChainLocator::new(self.config, classifier, self.cancellation);
    for root in &unit.roots {
      root.drive(&mut locator);
      if locator.cancelled {
        break;
      }
    }

    let summary = UnitSummary {
      classified: locator.classified_count(),
      reported: locator.reported,
      cancelled: locator.cancelled,
    };
    span.record("classified", summary.classified);
    span.record("reported", summary.reported);
    summary
  }

  /// Checks a single expression tree with no source text.
  pub fn check_expr(
    &self,
    model: &dyn SemanticModel,
    file: FileId,
    root: &Node<Expr>,
    sink: &mut dyn DiagnosticSink,
  ) -> UnitSummary {
    let classifier = Classifier::new(model, self.config, file, None, sink);
    let mut locator = ChainLocator::new(self.config, classifier, self.cancellation);
    root.drive(&mut locator);
    UnitSummary {
      classified: locator.classified_count(),
      reported: locator.reported,
      cancelled: locator.cancelled,
    }
  }
}

#[derive(Debug)]
pub struct UnitReport {
  pub file: FileId,
  /// Sorted by span.
  pub diagnostics: Vec<Diagnostic>,
  pub summary: UnitSummary,
}

/// Checks independent units in parallel. Each unit gets its own caches; the
/// model is only read. Reports come back in the order of `units`.
pub fn analyze_units<M>(config: &AnalyzerConfig, model: &M, units: &[SourceUnit]) -> Vec<UnitReport>
where
  M: SemanticModel + Sync,
{
  let analyzer = Analyzer::new(config);
  units
    .par_iter()
    .map(|unit| {
      let mut diagnostics = Vec::new();
      let summary = analyzer.check_unit(model, unit, &mut diagnostics);
      sort_diagnostics(&mut diagnostics);
      UnitReport {
        file: unit.file,
        diagnostics,
        summary,
      }
    })
    .collect()
}
