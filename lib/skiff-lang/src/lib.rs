pub mod ast;
pub mod compiler;
pub mod context;
pub mod error;
pub mod parser;
pub mod passes;
pub mod suggestions;
