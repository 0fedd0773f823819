//! Unit dumps: JSON exports of a resolved source unit.
//!
//! A dump carries the expression trees of one unit together with what the
//! host's resolver knew about them. Loading a dump stores those facts in node
//! assoc data, where [`linq_check::model::AssocModel`] reads them back.

use linq_check::model::{ConvertedType, MethodSymbol, ResolvedSymbol};
use query_ast::ast::expr::{
  AnonObjExpr, AnonObjMember, CallArg, CallExpr, CastExpr, Expr, IdExpr, LambdaExpr, LitExpr,
  LitValue, MemberExpr, OtherExpr, ParenExpr,
};
use query_ast::ast::node::Node;
use query_ast::loc::Loc;
use query_types::{Member, ScalarKind, TypeId, TypeKind, TypeStore, TypeStoreError};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("malformed unit dump: {0}")]
  Json(#[from] serde_json::Error),
  #[error("type index {index} is out of range, the dump declares {len} types")]
  DanglingType { index: usize, len: usize },
  #[error(transparent)]
  Type(#[from] TypeStoreError),
  #[error("unsupported literal value {0}")]
  InvalidLiteral(Value),
  #[error("loc [{0}, {1}] ends before it starts")]
  InvalidLoc(usize, usize),
}

#[derive(Debug, Deserialize)]
pub struct UnitDump {
  pub file: String,
  #[serde(default)]
  pub text: Option<String>,
  #[serde(default)]
  pub types: Vec<TypeDump>,
  #[serde(default)]
  pub roots: Vec<ExprDump>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDump {
  Scalar {
    scalar: ScalarKind,
  },
  Enum {
    name: String,
    #[serde(default = "default_underlying")]
    underlying: ScalarKind,
  },
  Anonymous {
    members: Vec<MemberDump>,
  },
  Array {
    element: usize,
    #[serde(default = "default_rank")]
    rank: u8,
  },
  Named {
    name: String,
    #[serde(default)]
    args: Vec<usize>,
  },
}

fn default_underlying() -> ScalarKind {
  ScalarKind::Int32
}

fn default_rank() -> u8 {
  1
}

#[derive(Debug, Deserialize)]
pub struct MemberDump {
  pub name: String,
  #[serde(rename = "type")]
  pub ty: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExprDump {
  #[serde(default)]
  pub loc: Option<(usize, usize)>,
  /// Index into the dump's `types`.
  #[serde(default)]
  pub converted_type: Option<usize>,
  #[serde(flatten)]
  pub kind: ExprKindDump,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKindDump {
  Anon {
    members: Vec<AnonMemberDump>,
  },
  Call {
    callee: Box<ExprDump>,
    #[serde(default)]
    args: Vec<ArgDump>,
    #[serde(default)]
    resolved: Option<ResolvedDump>,
  },
  Cast {
    type_name: String,
    value: Box<ExprDump>,
  },
  Id {
    name: String,
  },
  Lambda {
    #[serde(default)]
    params: Vec<String>,
    body: Box<ExprDump>,
  },
  Lit {
    value: Value,
  },
  Member {
    left: Box<ExprDump>,
    name: String,
  },
  Paren {
    value: Box<ExprDump>,
  },
  Other {
    #[serde(default)]
    text: String,
    #[serde(default)]
    children: Vec<ExprDump>,
  },
}

#[derive(Debug, Deserialize)]
pub struct AnonMemberDump {
  #[serde(default)]
  pub name: Option<String>,
  pub value: ExprDump,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgDump {
  Named(NamedArgDump),
  Positional(ExprDump),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedArgDump {
  pub name: String,
  pub value: ExprDump,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResolvedDump {
  Method {
    method: String,
    #[serde(default)]
    containing_type: Option<String>,
  },
  Other {
    other: String,
  },
}

impl UnitDump {
  pub fn from_json_str(text: &str) -> Result<Self, DumpError> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn read(path: &Path) -> Result<Self, DumpError> {
    let text = fs::read_to_string(path).map_err(|source| DumpError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&text)
  }

  /// Adds this dump's types to `store` and converts its roots. Type entries
  /// may refer to each other in any order, so recursive types survive.
  pub fn load(self, store: &mut TypeStore) -> Result<LoadedUnit, DumpError> {
    let ids: Vec<TypeId> = self.types.iter().map(|_| store.reserve()).collect();
    let lookup = TypeLookup { ids: &ids };
    for (slot, ty) in ids.iter().zip(self.types) {
      store.define(*slot, lookup.kind(ty)?)?;
    }
    let roots = self
      .roots
      .into_iter()
      .map(|root| lookup.expr(root))
      .collect::<Result<_, _>>()?;
    Ok(LoadedUnit {
      file: self.file,
      text: self.text,
      roots,
    })
  }
}

pub struct LoadedUnit {
  pub file: String,
  pub text: Option<String>,
  pub roots: Vec<Node<Expr>>,
}

struct TypeLookup<'a> {
  ids: &'a [TypeId],
}

impl TypeLookup<'_> {
  fn id(&self, index: usize) -> Result<TypeId, DumpError> {
    self.ids.get(index).copied().ok_or(DumpError::DanglingType {
      index,
      len: self.ids.len(),
    })
  }

  fn kind(&self, ty: TypeDump) -> Result<TypeKind, DumpError> {
    Ok(match ty {
      TypeDump::Scalar { scalar } => TypeKind::Scalar(scalar),
      TypeDump::Enum { name, underlying } => {
        if !underlying.is_integral() {
          return Err(TypeStoreError::InvalidEnumUnderlying { name, underlying }.into());
        }
        TypeKind::Enum { name, underlying }
      }
      TypeDump::Anonymous { members } => TypeKind::Anonymous(
        members
          .into_iter()
          .map(|m| {
            Ok(Member {
              name: m.name,
              ty: self.id(m.ty)?,
            })
          })
          .collect::<Result<_, DumpError>>()?,
      ),
      TypeDump::Array { element, rank } => TypeKind::Array {
        element: self.id(element)?,
        rank: rank.max(1),
      },
      TypeDump::Named { name, args } => TypeKind::Named {
        name,
        args: args
          .into_iter()
          .map(|a| self.id(a))
          .collect::<Result<_, _>>()?,
      },
    })
  }

  fn expr(&self, dump: ExprDump) -> Result<Node<Expr>, DumpError> {
    let loc = match dump.loc {
      Some((start, end)) if end < start => return Err(DumpError::InvalidLoc(start, end)),
      Some((start, end)) => Loc(start, end),
      None => Loc::default(),
    };
    let expr = match dump.kind {
      ExprKindDump::Anon { members } => {
        let members = members
          .into_iter()
          .map(|m| {
            let value = self.expr(m.value)?;
            Ok(Node::new(value.loc, AnonObjMember {
              name: m.name,
              value,
            }))
          })
          .collect::<Result<_, DumpError>>()?;
        Node::new(loc, AnonObjExpr { members }).wrap(Expr::AnonObj)
      }
      ExprKindDump::Call {
        callee,
        args,
        resolved,
      } => {
        let callee = self.expr(*callee)?;
        let arguments = args
          .into_iter()
          .map(|a| self.arg(a))
          .collect::<Result<_, _>>()?;
        let mut call = Node::new(loc, CallExpr { callee, arguments });
        if let Some(resolved) = resolved {
          call.assoc.set(match resolved {
            ResolvedDump::Method {
              method,
              containing_type,
            } => ResolvedSymbol::Method(MethodSymbol {
              name: method,
              containing_type,
            }),
            ResolvedDump::Other { other } => ResolvedSymbol::Other { kind: other },
          });
        }
        call.wrap(Expr::Call)
      }
      ExprKindDump::Cast { type_name, value } => Node::new(loc, CastExpr {
        type_name,
        value: self.expr(*value)?,
      })
      .wrap(Expr::Cast),
      ExprKindDump::Id { name } => Node::new(loc, IdExpr { name }).wrap(Expr::Id),
      ExprKindDump::Lambda { params, body } => Node::new(loc, LambdaExpr {
        params,
        body: self.expr(*body)?,
      })
      .wrap(Expr::Lambda),
      ExprKindDump::Lit { value } => Node::new(loc, LitExpr {
        value: literal(value)?,
      })
      .wrap(Expr::Lit),
      ExprKindDump::Member { left, name } => Node::new(loc, MemberExpr {
        left: self.expr(*left)?,
        right: name,
      })
      .wrap(Expr::Member),
      ExprKindDump::Paren { value } => Node::new(loc, ParenExpr {
        value: self.expr(*value)?,
      })
      .wrap(Expr::Paren),
      ExprKindDump::Other { text, children } => Node::new(loc, OtherExpr {
        text,
        children: children
          .into_iter()
          .map(|c| self.expr(c))
          .collect::<Result<_, _>>()?,
      })
      .wrap(Expr::Other),
    };
    match dump.converted_type {
      Some(index) => Ok(expr.with_assoc(ConvertedType(self.id(index)?))),
      None => Ok(expr),
    }
  }

  fn arg(&self, dump: ArgDump) -> Result<Node<CallArg>, DumpError> {
    let (name, value) = match dump {
      ArgDump::Named(named) => (Some(named.name), self.expr(named.value)?),
      ArgDump::Positional(value) => (None, self.expr(value)?),
    };
    Ok(Node::new(value.loc, CallArg { name, value }))
  }
}

fn literal(value: Value) -> Result<LitValue, DumpError> {
  Ok(match value {
    Value::Null => LitValue::Null,
    Value::Bool(v) => LitValue::Bool(v),
    Value::Number(n) => LitValue::Num(n.to_string()),
    Value::String(s) => LitValue::Str(s),
    other => return Err(DumpError::InvalidLiteral(other)),
  })
}
