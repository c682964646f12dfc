//! Progress reporting for research cycles

pub mod reporter;
