//! Router construction for the deedlog HTTP server.
//!
//! Split out of the binary so the API tests can drive the router in-process.

pub mod routes;
