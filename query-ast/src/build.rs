//! Helpers for hosts and tests that construct trees directly.
//!
//! All nodes are created with an empty [`Loc`]; call [`locate`] on a finished
//! tree to render it and assign every node the span of its own text.

use crate::ast::expr::{
  AnonObjExpr, AnonObjMember, CallArg, CallExpr, CastExpr, Expr, IdExpr, LambdaExpr, LitExpr,
  LitValue, MemberExpr, OtherExpr, ParenExpr,
};
use crate::ast::node::Node;
use crate::loc::Loc;
use crate::print::Printer;

fn node<S, F>(stx: S, wrap: F) -> Node<Expr>
where
  S: derive_visitor::Drive + derive_visitor::DriveMut,
  F: FnOnce(Node<S>) -> Expr,
{
  Node::new(Loc::default(), stx).wrap(wrap)
}

pub fn id(name: impl Into<String>) -> Node<Expr> {
  node(IdExpr { name: name.into() }, Expr::Id)
}

pub fn member(left: Node<Expr>, right: impl Into<String>) -> Node<Expr> {
  node(
    MemberExpr {
      left,
      right: right.into(),
    },
    Expr::Member,
  )
}

pub fn arg(value: Node<Expr>) -> Node<CallArg> {
  Node::new(Loc::default(), CallArg { name: None, value })
}

pub fn named_arg(name: impl Into<String>, value: Node<Expr>) -> Node<CallArg> {
  Node::new(Loc::default(), CallArg {
    name: Some(name.into()),
    value,
  })
}

pub fn call(callee: Node<Expr>, arguments: Vec<Node<CallArg>>) -> Node<Expr> {
  node(CallExpr { callee, arguments }, Expr::Call)
}

/// `receiver.name(args...)` with plain positional arguments.
pub fn method_call(receiver: Node<Expr>, name: &str, args: Vec<Node<Expr>>) -> Node<Expr> {
  call(member(receiver, name), args.into_iter().map(arg).collect())
}

pub fn lambda(params: &[&str], body: Node<Expr>) -> Node<Expr> {
  node(
    LambdaExpr {
      params: params.iter().map(|p| p.to_string()).collect(),
      body,
    },
    Expr::Lambda,
  )
}

pub fn paren(value: Node<Expr>) -> Node<Expr> {
  node(ParenExpr { value }, Expr::Paren)
}

pub fn cast(type_name: impl Into<String>, value: Node<Expr>) -> Node<Expr> {
  node(
    CastExpr {
      type_name: type_name.into(),
      value,
    },
    Expr::Cast,
  )
}

pub fn lit_num(value: impl Into<String>) -> Node<Expr> {
  node(
    LitExpr {
      value: LitValue::Num(value.into()),
    },
    Expr::Lit,
  )
}

pub fn lit_str(value: impl Into<String>) -> Node<Expr> {
  node(
    LitExpr {
      value: LitValue::Str(value.into()),
    },
    Expr::Lit,
  )
}

pub fn lit_bool(value: bool) -> Node<Expr> {
  node(
    LitExpr {
      value: LitValue::Bool(value),
    },
    Expr::Lit,
  )
}

pub fn anon(members: Vec<(Option<&str>, Node<Expr>)>) -> Node<Expr> {
  let members = members
    .into_iter()
    .map(|(name, value)| {
      Node::new(Loc::default(), AnonObjMember {
        name: name.map(str::to_string),
        value,
      })
    })
    .collect();
  node(AnonObjExpr { members }, Expr::AnonObj)
}

pub fn other(text: impl Into<String>, children: Vec<Node<Expr>>) -> Node<Expr> {
  node(
    OtherExpr {
      text: text.into(),
      children,
    },
    Expr::Other,
  )
}

/// Renders `root` and assigns every node in it the location of its own text
/// within the returned string.
pub fn locate(root: &mut Node<Expr>) -> String {
  let mut printer = Printer::new();
  printer.write_located(root);
  printer.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn locate_assigns_spans_matching_text() {
    let mut root = method_call(id("orders"), "Where", vec![lambda(
      &["o"],
      member(id("o"), "Paid"),
    )]);
    let text = locate(&mut root);
    assert_eq!(text, "orders.Where(o => o.Paid)");
    assert_eq!(root.loc.slice(&text), Some("orders.Where(o => o.Paid)"));

    let Expr::Call(call) = &*root.stx else {
      panic!("expected call");
    };
    assert_eq!(call.stx.callee.loc.slice(&text), Some("orders.Where"));
    let argument = &call.stx.arguments[0];
    assert_eq!(argument.loc.slice(&text), Some("o => o.Paid"));
    let lambda = argument.stx.value.as_lambda().unwrap();
    assert_eq!(lambda.stx.body.loc.slice(&text), Some("o.Paid"));
  }
}
