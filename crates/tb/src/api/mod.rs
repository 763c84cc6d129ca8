//! Procedure-style API over the stores.
//!
//! API procedures take plain arguments and answer with plain values; a
//! rejected input is `None` or `false`, never an error. Errors are reserved
//! for storage failures.

mod category;

pub use category::CategoryApi;
