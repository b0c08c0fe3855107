//! Cache layers: in-process state materialized from a backend's document at
//! startup and synchronized back only on an explicit commit.

pub mod cached;
pub mod versioned;
