pub mod cst;
pub mod java;
pub mod lexer;
pub mod parser;
pub mod pascal;
pub mod token;
pub mod token_dumper;
