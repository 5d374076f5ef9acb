//! Black-box tests for the customer support HTTP API.
//!
//! All tests live under `tests/` and drive the router in-process.
