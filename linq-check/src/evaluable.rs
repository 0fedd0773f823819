//! Decides whether a type is plain data a remote query provider can carry.
//!
//! The answer for a [`TypeId`] depends only on its structure, so results are
//! memoized per context. Type graphs may be cyclic (see
//! [`query_types::TypeStore::reserve`]); a type reached again while it is
//! still being evaluated describes infinite data and is not evaluable.

use ahash::{HashMap, HashSet};
use query_types::{ScalarKind, TypeId, TypeKind, TypeStore};
use std::cell::{Cell, RefCell};
use tracing::debug_span;

pub struct EvaluabilityCtx<'a> {
  store: &'a TypeStore,
  max_depth: usize,
  cache: RefCell<HashMap<TypeId, Option<usize>>>,
  in_progress: RefCell<HashSet<TypeId>>,
  truncated: Cell<bool>,
}

/// Scalars every remote provider maps to a column type.
pub fn is_transportable_scalar(kind: ScalarKind) -> bool {
  matches!(
    kind,
    ScalarKind::String
      | ScalarKind::Boolean
      | ScalarKind::Byte
      | ScalarKind::Char
      | ScalarKind::DateTime
      | ScalarKind::Decimal
      | ScalarKind::Double
      | ScalarKind::Int16
      | ScalarKind::Int32
      | ScalarKind::Int64
      | ScalarKind::Single
      | ScalarKind::UInt16
      | ScalarKind::UInt32
      | ScalarKind::UInt64
  )
}

impl<'a> EvaluabilityCtx<'a> {
  pub fn new(store: &'a TypeStore, max_depth: usize) -> Self {
    Self {
      store,
      max_depth,
      cache: RefCell::new(HashMap::default()),
      in_progress: RefCell::new(HashSet::default()),
      truncated: Cell::new(false),
    }
  }

  /// Missing type information is treated permissively.
  pub fn is_client_evaluable(&self, ty: Option<TypeId>) -> bool {
    match ty {
      None => true,
      Some(ty) => self.evaluate(ty),
    }
  }

  pub fn evaluate(&self, ty: TypeId) -> bool {
    let cached = self
      .cache
      .borrow()
      .get(&ty)
      .map(|hit| hit.is_some_and(|height| height <= self.max_depth));
    let span = debug_span!(
      "linq_check.evaluable",
      type_id = ty.0,
      cache_hit = cached.is_some(),
      outcome = tracing::field::Empty,
    );
    let _guard = span.enter();
    if let Some(hit) = cached {
      span.record("outcome", hit);
      return hit;
    }
    self.truncated.set(false);
    let outcome = self.evaluate_inner(ty, 0).is_some();
    span.record("outcome", outcome);
    outcome
  }

  /// `Some(height)` when `ty` is evaluable, where `height` is the deepest
  /// nesting below it. Evaluable types are cached with their height so a hit
  /// deeper in another type still honours the depth limit.
  fn evaluate_inner(&self, ty: TypeId, depth: usize) -> Option<usize> {
    if depth > self.max_depth {
      self.truncated.set(true);
      return None;
    }
    if let Some(hit) = self.cache.borrow().get(&ty).copied() {
      return match hit {
        Some(height) if depth + height > self.max_depth => {
          self.truncated.set(true);
          None
        }
        hit => hit,
      };
    }
    if !self.in_progress.borrow_mut().insert(ty) {
      return None;
    }

    let outcome = match self.store.try_get(ty) {
      None => None,
      Some(TypeKind::Enum { .. }) => Some(0),
      Some(TypeKind::Scalar(kind)) => is_transportable_scalar(*kind).then_some(0),
      Some(TypeKind::Anonymous(members)) => members.iter().try_fold(0, |height, member| {
        self
          .evaluate_inner(member.ty, depth + 1)
          .map(|inner| height.max(inner + 1))
      }),
      Some(TypeKind::Array { element, .. }) => self
        .evaluate_inner(*element, depth + 1)
        .map(|inner| inner + 1),
      Some(TypeKind::Named { .. }) | Some(TypeKind::Placeholder) => None,
    };

    self.in_progress.borrow_mut().remove(&ty);
    // A negative answer may only be an artifact of the depth cut-off.
    if outcome.is_some() || !self.truncated.get() {
      self.cache.borrow_mut().insert(ty, outcome);
    }
    outcome
  }

  /// The innermost type that makes `ty` not evaluable, e.g. the offending
  /// member of an anonymous record or the element of an array. `None` when
  /// `ty` is evaluable.
  pub fn explain(&self, ty: TypeId) -> Option<TypeId> {
    if self.evaluate(ty) {
      return None;
    }
    let mut visited = HashSet::default();
    let mut current = ty;
    loop {
      if !visited.insert(current) || visited.len() > self.max_depth {
        return Some(current);
      }
      let next = match self.store.try_get(current) {
        Some(TypeKind::Anonymous(members)) => members
          .iter()
          .map(|member| member.ty)
          .find(|member| !self.evaluate(*member)),
        Some(TypeKind::Array { element, .. }) => Some(*element),
        _ => None,
      };
      match next {
        Some(next) => current = next,
        None => return Some(current),
      }
    }
  }
}
