use crate::types::{TypeId, TypeKind, TypeStore};
use std::fmt;

// Recursive graphs are cut off rather than printed forever.
const MAX_DISPLAY_DEPTH: usize = 8;

pub struct TypeDisplay<'a> {
  store: &'a TypeStore,
  id: TypeId,
}

impl TypeStore {
  pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
    TypeDisplay { store: self, id }
  }
}

impl fmt::Display for TypeDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_type(self.store, self.id, 0, f)
  }
}

fn write_type(store: &TypeStore, id: TypeId, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
  if depth > MAX_DISPLAY_DEPTH {
    return f.write_str("...");
  }
  let Some(kind) = store.try_get(id) else {
    return write!(f, "<unknown #{}>", id.0);
  };
  match kind {
    TypeKind::Scalar(scalar) => f.write_str(scalar.name()),
    TypeKind::Enum { name, .. } => f.write_str(name),
    TypeKind::Anonymous(members) => {
      f.write_str("<anonymous {")?;
      for (i, member) in members.iter().enumerate() {
        f.write_str(if i == 0 { " " } else { ", " })?;
        write!(f, "{}: ", member.name)?;
        write_type(store, member.ty, depth + 1, f)?;
      }
      f.write_str(" }>")
    }
    TypeKind::Array { element, rank } => {
      write_type(store, *element, depth + 1, f)?;
      f.write_str("[")?;
      for _ in 1..*rank {
        f.write_str(",")?;
      }
      f.write_str("]")
    }
    TypeKind::Named { name, args } => {
      f.write_str(name)?;
      if !args.is_empty() {
        f.write_str("<")?;
        for (i, arg) in args.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write_type(store, *arg, depth + 1, f)?;
        }
        f.write_str(">")?;
      }
      Ok(())
    }
    TypeKind::Placeholder => write!(f, "<placeholder #{}>", id.0),
  }
}
