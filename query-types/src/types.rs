use ahash::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Built-in scalar categories a type oracle can report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
  Boolean,
  Byte,
  Char,
  DateTime,
  Decimal,
  Double,
  Int16,
  Int32,
  Int64,
  IntPtr,
  Object,
  SByte,
  Single,
  String,
  UInt16,
  UInt32,
  UInt64,
  UIntPtr,
  Void,
}

impl ScalarKind {
  pub const ALL: [ScalarKind; 19] = [
    ScalarKind::Boolean,
    ScalarKind::Byte,
    ScalarKind::Char,
    ScalarKind::DateTime,
    ScalarKind::Decimal,
    ScalarKind::Double,
    ScalarKind::Int16,
    ScalarKind::Int32,
    ScalarKind::Int64,
    ScalarKind::IntPtr,
    ScalarKind::Object,
    ScalarKind::SByte,
    ScalarKind::Single,
    ScalarKind::String,
    ScalarKind::UInt16,
    ScalarKind::UInt32,
    ScalarKind::UInt64,
    ScalarKind::UIntPtr,
    ScalarKind::Void,
  ];

  /// Source-level spelling used when displaying types.
  pub const fn name(&self) -> &'static str {
    match self {
      ScalarKind::Boolean => "bool",
      ScalarKind::Byte => "byte",
      ScalarKind::Char => "char",
      ScalarKind::DateTime => "DateTime",
      ScalarKind::Decimal => "decimal",
      ScalarKind::Double => "double",
      ScalarKind::Int16 => "short",
      ScalarKind::Int32 => "int",
      ScalarKind::Int64 => "long",
      ScalarKind::IntPtr => "nint",
      ScalarKind::Object => "object",
      ScalarKind::SByte => "sbyte",
      ScalarKind::Single => "float",
      ScalarKind::String => "string",
      ScalarKind::UInt16 => "ushort",
      ScalarKind::UInt32 => "uint",
      ScalarKind::UInt64 => "ulong",
      ScalarKind::UIntPtr => "nuint",
      ScalarKind::Void => "void",
    }
  }

  /// Whether this scalar can back an enumeration.
  pub const fn is_integral(&self) -> bool {
    matches!(
      self,
      ScalarKind::Byte
        | ScalarKind::SByte
        | ScalarKind::Int16
        | ScalarKind::Int32
        | ScalarKind::Int64
        | ScalarKind::UInt16
        | ScalarKind::UInt32
        | ScalarKind::UInt64
    )
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
  pub name: String,
  pub ty: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
  Scalar(ScalarKind),
  Enum {
    name: String,
    underlying: ScalarKind,
  },
  /// A record synthesized from a projection; members keep declaration order.
  Anonymous(Vec<Member>),
  Array {
    element: TypeId,
    rank: u8,
  },
  /// Any declared class, struct, interface or generic instantiation.
  Named {
    name: String,
    args: Vec<TypeId>,
  },
  /// Reserved by [`TypeStore::reserve`] and not defined yet.
  Placeholder,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeStoreError {
  #[error("type {0:?} does not exist in this store")]
  UnknownType(TypeId),
  #[error("type {0:?} is already defined")]
  AlreadyDefined(TypeId),
  #[error("enum `{name}` cannot use {underlying:?} as its underlying type")]
  InvalidEnumUnderlying { name: String, underlying: ScalarKind },
}

#[derive(Debug)]
pub struct TypeStore {
  types: Vec<TypeKind>,
  interner: HashMap<TypeKind, TypeId>,
}

impl Default for TypeStore {
  fn default() -> Self {
    Self::new()
  }
}

impl TypeStore {
  pub fn new() -> Self {
    let mut store = TypeStore {
      types: Vec::new(),
      interner: HashMap::default(),
    };
    // Scalars occupy the first ids in `ScalarKind::ALL` order.
    for kind in ScalarKind::ALL {
      store.intern(TypeKind::Scalar(kind));
    }
    store
  }

  /// Placeholders are never shared: interning one allocates a fresh slot, as
  /// [`TypeStore::reserve`] does.
  pub fn intern(&mut self, kind: TypeKind) -> TypeId {
    if kind == TypeKind::Placeholder {
      return self.reserve();
    }
    if let Some(id) = self.interner.get(&kind) {
      return *id;
    }
    let id = self.push(kind.clone());
    self.interner.insert(kind, id);
    id
  }

  fn push(&mut self, kind: TypeKind) -> TypeId {
    let id = TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
    self.types.push(kind);
    id
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  /// Panics when `id` was not produced by this store; see [`TypeStore::try_get`].
  pub fn get(&self, id: TypeId) -> &TypeKind {
    &self.types[id.0 as usize]
  }

  pub fn try_get(&self, id: TypeId) -> Option<&TypeKind> {
    self.types.get(id.0 as usize)
  }

  pub fn scalar(&self, kind: ScalarKind) -> TypeId {
    let idx = ScalarKind::ALL
      .iter()
      .position(|k| *k == kind)
      .unwrap_or_default();
    TypeId(idx as u32)
  }

  pub fn string(&self) -> TypeId {
    self.scalar(ScalarKind::String)
  }

  pub fn boolean(&self) -> TypeId {
    self.scalar(ScalarKind::Boolean)
  }

  pub fn int32(&self) -> TypeId {
    self.scalar(ScalarKind::Int32)
  }

  pub fn object(&self) -> TypeId {
    self.scalar(ScalarKind::Object)
  }

  pub fn enumeration(
    &mut self,
    name: impl Into<String>,
    underlying: ScalarKind,
  ) -> Result<TypeId, TypeStoreError> {
    let name = name.into();
    if !underlying.is_integral() {
      return Err(TypeStoreError::InvalidEnumUnderlying { name, underlying });
    }
    Ok(self.intern(TypeKind::Enum { name, underlying }))
  }

  pub fn anonymous<N: Into<String>>(&mut self, members: impl IntoIterator<Item = (N, TypeId)>) -> TypeId {
    let members = members
      .into_iter()
      .map(|(name, ty)| Member {
        name: name.into(),
        ty,
      })
      .collect();
    self.intern(TypeKind::Anonymous(members))
  }

  pub fn array(&mut self, element: TypeId) -> TypeId {
    self.array_of_rank(element, 1)
  }

  pub fn array_of_rank(&mut self, element: TypeId, rank: u8) -> TypeId {
    self.intern(TypeKind::Array {
      element,
      rank: rank.max(1),
    })
  }

  pub fn named(&mut self, name: impl Into<String>) -> TypeId {
    self.generic(name, Vec::new())
  }

  pub fn generic(&mut self, name: impl Into<String>, args: Vec<TypeId>) -> TypeId {
    self.intern(TypeKind::Named {
      name: name.into(),
      args,
    })
  }

  /// Allocates an id whose kind is supplied later with [`TypeStore::define`].
  /// Reserved ids are never shared through interning.
  pub fn reserve(&mut self) -> TypeId {
    self.push(TypeKind::Placeholder)
  }

  pub fn define(&mut self, id: TypeId, kind: TypeKind) -> Result<(), TypeStoreError> {
    let slot = self
      .types
      .get_mut(id.0 as usize)
      .ok_or(TypeStoreError::UnknownType(id))?;
    if *slot != TypeKind::Placeholder {
      return Err(TypeStoreError::AlreadyDefined(id));
    }
    *slot = kind;
    Ok(())
  }
}
