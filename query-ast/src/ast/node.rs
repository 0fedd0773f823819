use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::{Drive, DriveMut};
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Type-keyed side table attached to every node.
///
/// Resolvers store whatever they computed for a node here (one value per
/// Rust type); analyses read it back without the tree knowing the types.
#[derive(Default)]
pub struct NodeAssocData {
  // Send + Sync so whole trees can be checked from rayon workers.
  map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NodeAssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    self
      .map
      .get(&TypeId::of::<T>())
      .and_then(|v| v.downcast_ref())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, v: T) {
    self.map.insert(TypeId::of::<T>(), Box::new(v));
  }

  pub fn remove<T: Any>(&mut self) -> bool {
    self.map.remove(&TypeId::of::<T>()).is_some()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // Hand-built and synthesized nodes may have an empty loc.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: NodeAssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
      assoc: NodeAssocData::default(),
    }
  }

  /// Wraps the node inside another node with the same loc, with syntax derived from the provided callback.
  pub fn wrap<T: Drive + DriveMut, F: FnOnce(Node<S>) -> T>(self, f: F) -> Node<T> {
    let loc = self.loc;
    let stx = f(self);
    Node::new(loc, stx)
  }

  /// Identity of this node for the lifetime of the tree. The syntax is boxed,
  /// so the address survives moves of the `Node` itself.
  pub fn identity(&self) -> usize {
    &*self.stx as *const S as usize
  }

  pub fn with_assoc<T: Any + Send + Sync>(mut self, v: T) -> Node<S> {
    self.assoc.set(v);
    self
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::expr::{Expr, IdExpr};

  #[test]
  fn assoc_data_is_keyed_by_type() {
    struct Resolved(u32);
    struct Other;
    let mut assoc = NodeAssocData::default();
    assoc.set(Resolved(32));
    assert_eq!(assoc.get::<Resolved>().unwrap().0, 32);
    assert!(assoc.get::<Other>().is_none());
    assert!(assoc.remove::<Resolved>());
    assert!(assoc.is_empty());
  }

  #[test]
  fn identity_survives_moves() {
    let node = Node::new(Loc(0, 1), IdExpr { name: "x".into() });
    let before = node.identity();
    let wrapped: Node<Expr> = node.wrap(Expr::Id);
    match &*wrapped.stx {
      Expr::Id(inner) => assert_eq!(inner.identity(), before),
      other => panic!("unexpected {other:?}"),
    }
  }
}
