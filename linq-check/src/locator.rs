use crate::classify::{Classifier, Verdict};
use crate::config::AnalyzerConfig;
use ahash::HashSet;
use derive_visitor::Visitor;
use query_ast::ast::expr::{CallExpr, Expr};
use query_ast::ast::node::Node;
use std::sync::atomic::{AtomicBool, Ordering};

type CallExprNode = Node<CallExpr>;

/// Finds call-sites shaped like query operator invocations.
///
/// The tree nests a chain `x.A().B()` as `Call(Member(Call(Member(x, A)), B))`,
/// so besides a call's own operator name the locator looks one level into its
/// receiver. Driving the visitor covers the rest of the tree, including chains
/// inside lambda bodies and opaque nodes.
#[derive(Visitor)]
#[visitor(CallExprNode(enter))]
pub(crate) struct ChainLocator<'a> {
  config: &'a AnalyzerConfig,
  classifier: Classifier<'a>,
  cancellation: Option<&'a AtomicBool>,
  // A link is reachable both from its own visit and from the call wrapping it.
  classified: HashSet<usize>,
  pub(crate) reported: usize,
  pub(crate) cancelled: bool,
}

impl<'a> ChainLocator<'a> {
  pub fn new(
    config: &'a AnalyzerConfig,
    classifier: Classifier<'a>,
    cancellation: Option<&'a AtomicBool>,
  ) -> Self {
    Self {
      config,
      classifier,
      cancellation,
      classified: HashSet::default(),
      reported: 0,
      cancelled: false,
    }
  }

  pub fn classified_count(&self) -> usize {
    self.classified.len()
  }

  fn enter_call_expr_node(&mut self, node: &CallExprNode) {
    if self.cancelled || self.cancellation.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
      self.cancelled = true;
      return;
    }

    match &*node.stx.callee.stx {
      Expr::Member(member) => {
        match &*member.stx.left.stx {
          Expr::Call(receiver) => self.analyze_nested(receiver),
          Expr::Id(id) if self.config.is_operator(&id.stx.name) => self.classify(node),
          Expr::Member(inner) if self.config.is_operator(&inner.stx.right) => self.classify(node),
          _ => {}
        }
        if self.config.is_operator(&member.stx.right) {
          self.classify(node);
        }
      }
      Expr::Id(id) if self.config.is_operator(&id.stx.name) => self.classify(node),
      _ => {}
    }
  }

  /// The receiver of a member call is itself a call; check that inner link.
  fn analyze_nested(&mut self, call: &CallExprNode) {
    let name = match &*call.stx.callee.stx {
      Expr::Member(member) => &member.stx.right,
      Expr::Id(id) => &id.stx.name,
      _ => return,
    };
    if self.config.is_operator(name) {
      self.classify(call);
    }
  }

  fn classify(&mut self, call: &CallExprNode) {
    if !self.classified.insert(call.identity()) {
      return;
    }
    if self.classifier.classify_call(call) == Verdict::Reported {
      self.reported += 1;
    }
  }
}
