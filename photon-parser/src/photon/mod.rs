//! Main module for photon parsing functionality

pub mod assembling;
pub mod ast;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod transforms;
