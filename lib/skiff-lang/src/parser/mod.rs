pub mod grammar;
pub mod lexer;
