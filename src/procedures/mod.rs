//! Built-in procedures shipped with rooda.

mod builtin;

pub use builtin::builtin_procedures;
