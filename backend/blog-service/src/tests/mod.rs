/// Test module for blog-service
///
/// Pure unit tests for the quota, tier, and authorization logic. None of
/// these require a database or any network access.
pub mod fixtures;
pub mod unit_tests;
