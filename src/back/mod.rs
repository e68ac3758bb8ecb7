//! Functions which export decoded modules back into their binary form.

pub mod spv;
