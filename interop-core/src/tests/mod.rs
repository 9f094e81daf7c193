//! Behavioural tests for key classification
//!
//! These suites follow the host runtime's `key_info` conformance scenarios:
//! a Hash with String keys and an instance variable, and a generic object
//! with reader, accessor and writer names.

mod test_key_info_hash;
