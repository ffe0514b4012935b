//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, scripting the exact responses
//! the API sends and checking both the records yielded and the requests made.

#![cfg(test)]


mod test_fetch_all;
