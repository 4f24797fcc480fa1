pub mod models;
pub mod utils;

// Value objects exchanged between the analysis engine and its consumers.
// Everything here is plain data: no I/O and no shared state.
