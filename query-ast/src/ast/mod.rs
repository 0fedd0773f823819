pub mod expr;
pub mod node;
