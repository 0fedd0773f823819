mod common;

use common::{op, remote, resolve, TestModel, ENUMERABLE, QUERYABLE};
use diagnostics::{FileId, TextRange};
use linq_check::config::AnalyzerConfig;
use linq_check::model::ResolvedSymbol;
use linq_check::{Analyzer, SourceUnit, UnitSummary};
use query_ast::ast::expr::Expr;
use query_ast::ast::node::Node;
use query_ast::build::*;
use query_types::{ScalarKind, TypeStore};
use std::sync::atomic::AtomicBool;

fn check(model: &TestModel, unit: &SourceUnit) -> (UnitSummary, Vec<diagnostics::Diagnostic>) {
  let config = AnalyzerConfig::default();
  let mut diagnostics = Vec::new();
  let summary = Analyzer::new(&config).check_unit(model, unit, &mut diagnostics);
  (summary, diagnostics)
}

fn located(mut root: Node<Expr>) -> SourceUnit {
  let text = locate(&mut root);
  SourceUnit::new(FileId(0), vec![root]).with_text(text)
}

#[test]
fn scalar_filter_is_not_reported() {
  let model = TestModel::new(TypeStore::new());
  let root = remote(id("orders"), "Where", "Name", model.types.string());
  let (summary, diagnostics) = check(&model, &located(root));
  assert!(diagnostics.is_empty());
  assert_eq!(summary.classified, 1);
  assert_eq!(summary.reported, 0);
}

#[test]
fn opaque_projection_is_reported_with_source_text() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let root = remote(id("orders"), "Select", "Customer", customer);
  let unit = located(root);
  let (summary, diagnostics) = check(&model, &unit);

  assert_eq!(summary.reported, 1);
  assert_eq!(diagnostics.len(), 1);
  let diagnostic = &diagnostics[0];
  assert_eq!(diagnostic.code, "LINQ0001");
  assert!(diagnostic
    .message
    .contains("`orders.Select(x => x.Customer)`"));
  assert_eq!(diagnostic.primary.file, FileId(0));
  assert_eq!(diagnostic.primary.range, TextRange::new(0, 30));
  assert_eq!(diagnostic.labels.len(), 1);
  assert!(diagnostic.labels[0]
    .message
    .contains("`Shop.Customer` is not representable"));
}

#[test]
fn non_operator_calls_never_reach_the_resolver() {
  let model = TestModel::new(TypeStore::new());
  let take = resolve(method_call(id("orders"), "Take", vec![lit_num("5")]), QUERYABLE);
  let (summary, diagnostics) = check(&model, &located(take));
  assert!(diagnostics.is_empty());
  assert_eq!(summary.classified, 0);
  assert_eq!(model.resolves(), 0);
}

#[test]
fn operators_from_other_declaring_types_are_ignored() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let root = op(
    id("orders"),
    "Select",
    ENUMERABLE,
    member(id("x"), "Customer"),
    Some(customer),
  );
  let (summary, diagnostics) = check(&model, &located(root));
  assert!(diagnostics.is_empty());
  assert_eq!(summary.classified, 1);
  assert_eq!(model.resolves(), 1);
  assert_eq!(model.conversions(), 0);
}

#[test]
fn each_chain_link_is_classified_independently() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let chain = remote(id("orders"), "Where", "Paid", model.types.boolean());
  let chain = remote(chain, "Select", "Customer", customer);
  let chain = remote(chain, "OrderBy", "Name", model.types.string());
  let unit = located(chain);
  let (summary, diagnostics) = check(&model, &unit);

  assert_eq!(summary.classified, 3);
  assert_eq!(model.resolves(), 3);
  assert_eq!(diagnostics.len(), 1);
  assert!(diagnostics[0]
    .message
    .contains("`orders.Where(x => x.Paid).Select(x => x.Customer)`"));
}

#[test]
fn non_operator_link_still_exposes_its_receiver() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let chain = remote(id("orders"), "Select", "Customer", customer);
  let chain = resolve(method_call(chain, "Take", vec![lit_num("10")]), QUERYABLE);
  let (summary, diagnostics) = check(&model, &located(chain));
  assert_eq!(summary.classified, 1);
  assert_eq!(diagnostics.len(), 1);
}

#[test]
fn chains_inside_lambdas_and_opaque_nodes_are_found() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let ints = types.array(types.int32());
  let model = TestModel::new(types);

  let inner = remote(member(id("x"), "Orders"), "Select", "Customer", customer);
  let outer = op(id("groups"), "Select", QUERYABLE, inner, Some(ints));
  let wrapped = other("await ToListAsync(...)", vec![outer]);
  let unit = SourceUnit::new(FileId(3), vec![wrapped]);
  let (summary, diagnostics) = check(&model, &unit);

  assert_eq!(summary.classified, 2);
  assert_eq!(diagnostics.len(), 1);
  assert!(diagnostics[0]
    .message
    .contains("`x.Orders.Select(x => x.Customer)`"));
}

#[test]
fn bare_operator_identifier_calls_are_classified() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let body = member(id("x"), "Customer").with_assoc(linq_check::model::ConvertedType(customer));
  let root = resolve(
    call(id("Select"), vec![arg(lambda(&["x"], body))]),
    QUERYABLE,
  );
  if let Expr::Call(call) = &*root.stx {
    assert!(matches!(
      call.assoc.get::<ResolvedSymbol>(),
      Some(ResolvedSymbol::Method(_))
    ));
  }
  let (summary, diagnostics) = check(&model, &located(root));
  assert_eq!(summary.classified, 1);
  assert_eq!(diagnostics.len(), 1);
}

#[test]
fn member_receiver_named_like_an_operator_is_classified() {
  let model = TestModel::new(TypeStore::new());
  let mut root = method_call(member(id("db"), "Select"), "Invoke", vec![lit_num("1")]);
  if let Expr::Call(call) = &mut *root.stx {
    call.assoc.set(ResolvedSymbol::Other {
      kind: "delegate".to_string(),
    });
  }
  let (summary, diagnostics) = check(&model, &located(root));
  assert_eq!(summary.classified, 1);
  assert_eq!(model.resolves(), 1);
  assert!(diagnostics.is_empty());
}

#[test]
fn unresolved_calls_are_skipped() {
  let model = TestModel::new(TypeStore::new());
  let root = method_call(id("orders"), "Where", vec![lambda(&["x"], member(id("x"), "Paid"))]);
  let (summary, diagnostics) = check(&model, &located(root));
  assert_eq!(summary.classified, 1);
  assert!(diagnostics.is_empty());
  assert_eq!(model.conversions(), 0);
}

#[test]
fn every_call_site_is_classified_once_per_pass() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let chain = remote(id("orders"), "Select", "Customer", customer);
  let chain = remote(chain, "Where", "Paid", model.types.boolean());
  let (summary, diagnostics) = check(&model, &located(chain));
  assert_eq!(summary.classified, 2);
  assert_eq!(model.resolves(), 2);
  assert_eq!(diagnostics.len(), 1);
}

#[test]
fn other_unit_roots_are_all_visited() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let roots = vec![
    remote(id("a"), "Select", "Customer", customer),
    remote(id("b"), "Where", "Paid", model.types.boolean()),
    remote(id("c"), "OrderBy", "Customer", customer),
  ];
  let unit = SourceUnit::new(FileId(1), roots);
  let (summary, diagnostics) = check(&model, &unit);
  assert_eq!(summary.classified, 3);
  assert_eq!(summary.reported, 2);
  // Without source text the message quotes the rendered tree.
  assert!(diagnostics[0].message.contains("`a.Select(x => x.Customer)`"));
  assert!(diagnostics[1].message.contains("`c.OrderBy(x => x.Customer)`"));
}

#[test]
fn cancelled_pass_stops_before_classifying() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let unit = located(remote(id("orders"), "Select", "Customer", customer));
  let config = AnalyzerConfig::default();
  let cancel = AtomicBool::new(true);
  let mut diagnostics = Vec::new();
  let summary = Analyzer::new(&config)
    .with_cancellation(&cancel)
    .check_unit(&model, &unit, &mut diagnostics);
  assert!(summary.cancelled);
  assert_eq!(summary.classified, 0);
  assert!(diagnostics.is_empty());
  assert_eq!(model.resolves(), 0);
}

#[test]
fn custom_operator_set_is_honoured() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let config = AnalyzerConfig::from_json_str(r#"{ "recognized_operators": ["GroupBy"] }"#).unwrap();
  let root = located(remote(id("orders"), "GroupBy", "Customer", customer));
  let ignored = located(remote(id("orders"), "Select", "Customer", customer));

  let mut diagnostics = Vec::new();
  let analyzer = Analyzer::new(&config);
  assert_eq!(analyzer.check_unit(&model, &root, &mut diagnostics).reported, 1);
  assert_eq!(analyzer.check_unit(&model, &ignored, &mut diagnostics).classified, 0);
  assert_eq!(diagnostics.len(), 1);
}

#[test]
fn scalar_projection_of_decimal_is_not_reported() {
  let mut types = TypeStore::new();
  let record = types.anonymous([
    ("Id", types.int32()),
    ("Total", types.scalar(ScalarKind::Decimal)),
  ]);
  let model = TestModel::new(types);
  let (_, diagnostics) = check(&model, &located(remote(id("orders"), "Select", "Summary", record)));
  assert!(diagnostics.is_empty());
}

#[test]
fn single_expressions_can_be_checked_without_a_unit() {
  let mut types = TypeStore::new();
  let customer = types.named("Shop.Customer");
  let model = TestModel::new(types);
  let root = remote(id("orders"), "Select", "Customer", customer);
  let config = AnalyzerConfig::default();
  let mut diagnostics = Vec::new();
  let summary = Analyzer::new(&config).check_expr(&model, FileId(9), &root, &mut diagnostics);
  assert_eq!(summary.reported, 1);
  assert_eq!(diagnostics[0].primary.file, FileId(9));
}
