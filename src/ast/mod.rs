/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// The tree is a closed sum type over expression and statement kinds;
/// nodes are pure data with a canonical source rendering via `Display`.
pub mod ast;
