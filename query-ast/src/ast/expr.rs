use super::node::Node;
use derive_more::derive::{From, TryInto};
use derive_visitor::{Drive, DriveMut};
use serde::Serialize;

// Each variant wraps Node<T> so visitors can observe Node<T> instead of just T.
#[derive(Debug, Drive, DriveMut, From, Serialize, TryInto)]
#[serde(tag = "$t")]
pub enum Expr {
  AnonObj(Node<AnonObjExpr>),
  Call(Node<CallExpr>),
  Cast(Node<CastExpr>),
  Id(Node<IdExpr>),
  Lambda(Node<LambdaExpr>),
  Lit(Node<LitExpr>),
  Member(Node<MemberExpr>),
  Paren(Node<ParenExpr>),
  /// Any shape the checker has no special knowledge of. Its children are
  /// still traversed so chains nested inside it are found.
  Other(Node<OtherExpr>),
}

/// `new { Name = c.Name, c.Total }`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct AnonObjExpr {
  pub members: Vec<Node<AnonObjMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct AnonObjMember {
  /// Absent for projection initializers such as `new { c.Total }`.
  #[drive(skip)]
  pub name: Option<String>,
  pub value: Node<Expr>,
}

/// An argument slot of a call. The value is wrapped so named arguments and
/// similar annotations do not change the shape of the expression inside.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CallArg {
  #[drive(skip)]
  pub name: Option<String>,
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CallExpr {
  pub callee: Node<Expr>,
  pub arguments: Vec<Node<CallArg>>,
}

impl CallExpr {
  /// The member name when the callee is `receiver.name`.
  pub fn member_name(&self) -> Option<&str> {
    match &*self.callee.stx {
      Expr::Member(member) => Some(member.stx.right.as_str()),
      _ => None,
    }
  }

  pub fn first_argument(&self) -> Option<&Node<CallArg>> {
    self.arguments.first()
  }
}

/// `(Type)value`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct CastExpr {
  #[drive(skip)]
  pub type_name: String,
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct IdExpr {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LambdaExpr {
  #[drive(skip)]
  pub params: Vec<String>,
  pub body: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum LitValue {
  Bool(bool),
  Null,
  // Kept as written so rendering round-trips the source spelling.
  Num(String),
  Str(String),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitExpr {
  #[drive(skip)]
  pub value: LitValue,
}

// The right side is a plain name rather than an IdExpr: it is not a variable usage.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct MemberExpr {
  pub left: Node<Expr>,
  #[drive(skip)]
  pub right: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct OtherExpr {
  /// Rendered text for the node as the host would print it.
  #[drive(skip)]
  pub text: String,
  pub children: Vec<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ParenExpr {
  pub value: Node<Expr>,
}

impl Node<Expr> {
  /// Strips parentheses and casts, which do not change what the wrapped
  /// expression is.
  pub fn unwrap_transparent(&self) -> &Node<Expr> {
    let mut current = self;
    loop {
      current = match &*current.stx {
        Expr::Paren(paren) => &paren.stx.value,
        Expr::Cast(cast) => &cast.stx.value,
        _ => return current,
      };
    }
  }

  pub fn as_lambda(&self) -> Option<&Node<LambdaExpr>> {
    match &*self.stx {
      Expr::Lambda(lambda) => Some(lambda),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::build::{call, cast, id, lambda, member, paren};

  #[test]
  fn unwrap_transparent_strips_nested_wrappers() {
    let expr = paren(cast("Func<int, bool>", paren(lambda(&["x"], id("x")))));
    assert!(expr.unwrap_transparent().as_lambda().is_some());
    assert!(expr.as_lambda().is_none());
  }

  #[test]
  fn member_name_only_for_member_callees() {
    let chained = call(member(id("orders"), "Where"), vec![]);
    let bare = call(id("Where"), vec![]);
    let crate::ast::expr::Expr::Call(chained) = *chained.stx else {
      unreachable!()
    };
    let crate::ast::expr::Expr::Call(bare) = *bare.stx else {
      unreachable!()
    };
    assert_eq!(chained.stx.member_name(), Some("Where"));
    assert_eq!(bare.stx.member_name(), None);
  }
}
