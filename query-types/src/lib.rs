//! Resolved type descriptors as handed out by a host's type oracle.
//!
//! Types are interned in a [`TypeStore`] and referred to by [`TypeId`].
//! Structural kinds (anonymous records, arrays, generic instantiations) point
//! at other ids, so a store is a graph; [`TypeStore::reserve`] and
//! [`TypeStore::define`] let a resolver build recursive graphs, which is why
//! consumers must not assume that walking a type terminates on its own.

mod display;
mod types;

pub use display::TypeDisplay;
pub use types::*;
