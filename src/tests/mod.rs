// Test modules for aws-failure-taxonomy crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities (failure builders, log capture)
pub mod helpers;

// Core unit tests
pub mod category;
