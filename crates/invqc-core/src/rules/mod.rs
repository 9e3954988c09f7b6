//! Stateless QC rules evaluated per record.

pub mod consistency;
pub mod fields;

pub use consistency::{check as check_consistency, ConsistencyFindings};
pub use fields::{check as check_fields, FieldFindings};
