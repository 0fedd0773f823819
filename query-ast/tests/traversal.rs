use derive_visitor::{Drive, Visitor};
use query_ast::ast::expr::{CallExpr, IdExpr};
use query_ast::ast::node::Node;
use query_ast::build::*;

type CallExprNode = Node<CallExpr>;
type IdExprNode = Node<IdExpr>;

#[derive(Default, Visitor)]
#[visitor(CallExprNode(enter), IdExprNode(enter))]
struct Collect {
  calls: Vec<String>,
  ids: Vec<String>,
}

impl Collect {
  fn enter_call_expr_node(&mut self, node: &CallExprNode) {
    self.calls.push(node.stx.member_name().unwrap_or("<fn>").to_string());
  }

  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    self.ids.push(node.stx.name.clone());
  }
}

#[test]
fn drive_reaches_calls_nested_in_lambdas_and_opaque_nodes() {
  let inner = method_call(id("lines"), "Select", vec![lambda(&["l"], member(id("l"), "Qty"))]);
  let tree = other("sum(...)", vec![method_call(id("orders"), "Where", vec![lambda(
    &["o"],
    other("o.Lines.Any(...)", vec![inner]),
  )])]);

  let mut collect = Collect::default();
  tree.drive(&mut collect);
  assert_eq!(collect.calls, vec!["Where", "Select"]);
  assert_eq!(collect.ids, vec!["orders", "lines", "l"]);
}

#[test]
fn serializes_with_variant_tags() {
  let tree = method_call(id("orders"), "Take", vec![lit_num("5")]);
  let json = serde_json::to_value(&tree).unwrap();
  assert_eq!(json["$t"], "Call");
  assert_eq!(json["callee"]["$t"], "Member");
  assert_eq!(json["callee"]["right"], "Take");
  assert_eq!(json["arguments"][0]["value"]["value"]["kind"], "Num");
  assert_eq!(json["arguments"][0]["value"]["value"]["value"], "5");
}
