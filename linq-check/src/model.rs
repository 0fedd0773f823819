//! The narrow view of name resolution and typing the checker consumes.

use query_ast::ast::expr::{CallExpr, Expr};
use query_ast::ast::node::Node;
use query_types::{TypeId, TypeStore};

/// What a call-site resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedSymbol {
  Method(MethodSymbol),
  /// Resolved, but not to a method (delegate field, property of delegate type...).
  Other { kind: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSymbol {
  pub name: String,
  /// Fully-qualified name of the declaring type.
  pub containing_type: Option<String>,
}

impl MethodSymbol {
  pub fn new(name: impl Into<String>, containing_type: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      containing_type: Some(containing_type.into()),
    }
  }
}

/// Type of an expression after implicit conversions at its point of use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertedType(pub TypeId);

/// Read-only resolver and type oracle for one or more source units.
///
/// Passed explicitly into every pass; implementations must answer from
/// already-computed data, the checker calls them once per candidate call-site.
pub trait SemanticModel {
  fn types(&self) -> &TypeStore;

  fn resolve_call(&self, call: &Node<CallExpr>) -> Option<ResolvedSymbol>;

  fn converted_type(&self, expr: &Node<Expr>) -> Option<TypeId>;
}

/// Reads facts a resolver stored on the nodes themselves: a
/// [`ResolvedSymbol`] on call nodes and a [`ConvertedType`] on expressions.
pub struct AssocModel<'a> {
  types: &'a TypeStore,
}

impl<'a> AssocModel<'a> {
  pub fn new(types: &'a TypeStore) -> Self {
    Self { types }
  }
}

impl SemanticModel for AssocModel<'_> {
  fn types(&self) -> &TypeStore {
    self.types
  }

  fn resolve_call(&self, call: &Node<CallExpr>) -> Option<ResolvedSymbol> {
    call.assoc.get::<ResolvedSymbol>().cloned()
  }

  fn converted_type(&self, expr: &Node<Expr>) -> Option<TypeId> {
    expr.assoc.get::<ConvertedType>().map(|ty| ty.0)
  }
}
