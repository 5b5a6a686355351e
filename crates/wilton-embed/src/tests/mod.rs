//! Test suites for the embedded runtime bootstrap.

pub(crate) mod support;
