// src/process/mod.rs
//
// Per-file stages: load a semicolon-delimited export into a `RawTable`, then
// normalize it into a timestamp-keyed `NormalizedTable`.
pub mod date_parser;
pub mod load;
pub mod locale;
pub mod normalize;
pub mod raw_table;
pub mod utils;

pub use load::load_semicolon_csv;
pub use normalize::{normalize, Column, NormalizedTable};
pub use raw_table::{Cell, RawTable};
