//! # Cinder-IR
//!
//! A compact LLVM-style IR system with a whole-module dead function
//! elimination pass.

pub mod base;
pub mod ir;
pub mod opt;
pub mod testing;
pub mod typing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
