//! Renders trees back into source-like text.
//!
//! The output is what diagnostics quote when the host did not supply the
//! original source text of a unit.

use crate::ast::expr::{AnonObjExpr, CallExpr, Expr, LambdaExpr, LitValue};
use crate::ast::node::Node;
use crate::loc::Loc;

pub fn print_expr(expr: &Node<Expr>) -> String {
  let mut printer = Printer::new();
  printer.write_expr(expr);
  printer.finish()
}

pub fn print_call(call: &Node<CallExpr>) -> String {
  let mut printer = Printer::new();
  printer.write_call(&call.stx);
  printer.finish()
}

#[derive(Default)]
pub struct Printer {
  out: String,
}

impl Printer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn finish(self) -> String {
    self.out
  }

  pub fn write_expr(&mut self, expr: &Node<Expr>) {
    match &*expr.stx {
      Expr::AnonObj(anon) => self.write_anon(&anon.stx),
      Expr::Call(call) => self.write_call(&call.stx),
      Expr::Cast(cast) => {
        self.out.push('(');
        self.out.push_str(&cast.stx.type_name);
        self.out.push(')');
        self.write_expr(&cast.stx.value);
      }
      Expr::Id(id) => self.out.push_str(&id.stx.name),
      Expr::Lambda(lambda) => self.write_lambda(&lambda.stx),
      Expr::Lit(lit) => self.write_lit(&lit.stx.value),
      Expr::Member(member) => {
        self.write_expr(&member.stx.left);
        self.out.push('.');
        self.out.push_str(&member.stx.right);
      }
      Expr::Paren(paren) => {
        self.out.push('(');
        self.write_expr(&paren.stx.value);
        self.out.push(')');
      }
      Expr::Other(other) => self.out.push_str(&other.stx.text),
    }
  }

  pub fn write_call(&mut self, call: &CallExpr) {
    self.write_expr(&call.callee);
    self.out.push('(');
    for (i, arg) in call.arguments.iter().enumerate() {
      if i > 0 {
        self.out.push_str(", ");
      }
      if let Some(name) = &arg.stx.name {
        self.out.push_str(name);
        self.out.push_str(": ");
      }
      self.write_expr(&arg.stx.value);
    }
    self.out.push(')');
  }

  fn write_lambda(&mut self, lambda: &LambdaExpr) {
    self.write_params(&lambda.params);
    self.write_expr(&lambda.body);
  }

  fn write_anon(&mut self, anon: &AnonObjExpr) {
    self.out.push_str("new {");
    for (i, member) in anon.members.iter().enumerate() {
      self.out.push_str(if i > 0 { ", " } else { " " });
      if let Some(name) = &member.stx.name {
        self.out.push_str(name);
        self.out.push_str(" = ");
      }
      self.write_expr(&member.stx.value);
    }
    self.out.push_str(" }");
  }

  fn write_params(&mut self, params: &[String]) {
    match params {
      [single] => self.out.push_str(single),
      _ => {
        self.out.push('(');
        self.out.push_str(&params.join(", "));
        self.out.push(')');
      }
    }
    self.out.push_str(" => ");
  }

  fn write_lit(&mut self, value: &LitValue) {
    match value {
      LitValue::Bool(v) => self.out.push_str(if *v { "true" } else { "false" }),
      LitValue::Null => self.out.push_str("null"),
      LitValue::Num(raw) => self.out.push_str(raw),
      LitValue::Str(s) => {
        self.out.push('"');
        for ch in s.chars() {
          match ch {
            '"' => self.out.push_str("\\\""),
            '\\' => self.out.push_str("\\\\"),
            '\n' => self.out.push_str("\\n"),
            c => self.out.push(c),
          }
        }
        self.out.push('"');
      }
    }
  }

  fn mark(&self) -> usize {
    self.out.len()
  }

  /// Same output as [`Printer::write_expr`], additionally storing each node's
  /// span within the output in its `loc`.
  pub fn write_located(&mut self, expr: &mut Node<Expr>) {
    let start = self.mark();
    match &mut *expr.stx {
      Expr::AnonObj(anon) => {
        self.out.push_str("new {");
        for (i, member) in anon.stx.members.iter_mut().enumerate() {
          self.out.push_str(if i > 0 { ", " } else { " " });
          let member_start = self.mark();
          if let Some(name) = &member.stx.name {
            self.out.push_str(name);
            self.out.push_str(" = ");
          }
          self.write_located(&mut member.stx.value);
          member.loc = Loc(member_start, self.mark());
        }
        self.out.push_str(" }");
        anon.loc = Loc(start, self.mark());
      }
      Expr::Call(call) => {
        self.write_located(&mut call.stx.callee);
        self.out.push('(');
        for (i, arg) in call.stx.arguments.iter_mut().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          }
          let arg_start = self.mark();
          if let Some(name) = &arg.stx.name {
            self.out.push_str(name);
            self.out.push_str(": ");
          }
          self.write_located(&mut arg.stx.value);
          arg.loc = Loc(arg_start, self.mark());
        }
        self.out.push(')');
        call.loc = Loc(start, self.mark());
      }
      Expr::Cast(cast) => {
        self.out.push('(');
        self.out.push_str(&cast.stx.type_name);
        self.out.push(')');
        self.write_located(&mut cast.stx.value);
        cast.loc = Loc(start, self.mark());
      }
      Expr::Id(id) => {
        self.out.push_str(&id.stx.name);
        id.loc = Loc(start, self.mark());
      }
      Expr::Lambda(lambda) => {
        self.write_params(&lambda.stx.params);
        self.write_located(&mut lambda.stx.body);
        lambda.loc = Loc(start, self.mark());
      }
      Expr::Lit(lit) => {
        self.write_lit(&lit.stx.value);
        lit.loc = Loc(start, self.mark());
      }
      Expr::Member(member) => {
        self.write_located(&mut member.stx.left);
        self.out.push('.');
        self.out.push_str(&member.stx.right);
        member.loc = Loc(start, self.mark());
      }
      Expr::Paren(paren) => {
        self.out.push('(');
        self.write_located(&mut paren.stx.value);
        self.out.push(')');
        paren.loc = Loc(start, self.mark());
      }
      Expr::Other(other) => {
        // Children of opaque nodes are not part of the printed text.
        self.out.push_str(&other.stx.text);
        other.loc = Loc(start, self.mark());
      }
    }
    expr.loc = Loc(start, self.mark());
  }
}
