// Abstract Syntax Tree for SBML Mathematical Formulas
//
// An expression is a tree of `AstNode`s. Each node is either a leaf (number,
// name or constant) or a function node holding a closed `FunctionShape`
// variant and its ordered children. The `AstType` discriminator decides which
// representation is active and drives arity rules, MathML element names and
// infix formatting.
//
// The node API is split by concern across the files of this module; all of
// it lives on `AstNode`.

mod builder;
mod canonical;
mod function;
mod node;
mod number;
#[cfg(test)]
pub(crate) mod testing;
mod transform;
mod types;
mod validate;

pub use canonical::canonical_function_type;
pub use function::{CsymbolKind, FunctionNode, FunctionShape, SBML_SYMBOLS_URL};
pub use node::{AstNode, UserData};
pub use number::LeafValue;
pub use types::{Arity, AstType, ShapeClass};
