#![allow(dead_code)]

use linq_check::model::{AssocModel, ConvertedType, MethodSymbol, ResolvedSymbol, SemanticModel};
use query_ast::ast::expr::{CallExpr, Expr};
use query_ast::ast::node::Node;
use query_ast::build::{id, lambda, member, method_call};
use query_types::{TypeId, TypeStore};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const QUERYABLE: &str = "System.Linq.Queryable";
pub const ENUMERABLE: &str = "System.Linq.Enumerable";

/// Answers from node annotations and counts how often it is asked.
pub struct TestModel {
  pub types: TypeStore,
  resolves: AtomicUsize,
  conversions: AtomicUsize,
}

impl TestModel {
  pub fn new(types: TypeStore) -> Self {
    Self {
      types,
      resolves: AtomicUsize::new(0),
      conversions: AtomicUsize::new(0),
    }
  }

  pub fn resolves(&self) -> usize {
    self.resolves.load(Ordering::SeqCst)
  }

  pub fn conversions(&self) -> usize {
    self.conversions.load(Ordering::SeqCst)
  }
}

impl SemanticModel for TestModel {
  fn types(&self) -> &TypeStore {
    &self.types
  }

  fn resolve_call(&self, call: &Node<CallExpr>) -> Option<ResolvedSymbol> {
    self.resolves.fetch_add(1, Ordering::SeqCst);
    AssocModel::new(&self.types).resolve_call(call)
  }

  fn converted_type(&self, expr: &Node<Expr>) -> Option<TypeId> {
    self.conversions.fetch_add(1, Ordering::SeqCst);
    AssocModel::new(&self.types).converted_type(expr)
  }
}

/// Marks a call node as resolved to `name` declared on `containing_type`.
pub fn resolve(mut call: Node<Expr>, containing_type: &str) -> Node<Expr> {
  if let Expr::Call(inner) = &mut *call.stx {
    let name = inner.stx.member_name().unwrap_or_default().to_string();
    inner
      .assoc
      .set(ResolvedSymbol::Method(MethodSymbol::new(name, containing_type)));
  }
  call
}

/// `receiver.name(p => body)` resolved on `containing_type`, the body typed as
/// `body_type`.
pub fn op(
  receiver: Node<Expr>,
  name: &str,
  containing_type: &str,
  body: Node<Expr>,
  body_type: Option<TypeId>,
) -> Node<Expr> {
  let body = match body_type {
    Some(ty) => body.with_assoc(ConvertedType(ty)),
    None => body,
  };
  let call = method_call(receiver, name, vec![lambda(&["x"], body)]);
  resolve(call, containing_type)
}

/// `receiver.name(x => x.field)` on the remote operator family.
pub fn remote(receiver: Node<Expr>, name: &str, field: &str, body_type: TypeId) -> Node<Expr> {
  op(
    receiver,
    name,
    QUERYABLE,
    member(id("x"), field),
    Some(body_type),
  )
}
