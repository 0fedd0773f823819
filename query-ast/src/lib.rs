//! Expression trees for fluent query operator chains.
//!
//! Trees are produced by an external parser/resolver. This crate only models
//! them: every node is a [`ast::node::Node`] carrying a [`loc::Loc`], the
//! syntax itself, and a type-keyed side table that resolvers use to attach
//! semantic facts (resolved symbols, converted types) without this crate
//! knowing about them.

pub mod ast;
pub mod build;
pub mod loc;
pub mod print;
