//! Domain logic for the leasing marketplace: status workflow, company
//! matching, and the shared error/type vocabulary. No I/O lives here.

pub mod error;
pub mod leasing;
pub mod matching;
pub mod roles;
pub mod status;
pub mod types;
