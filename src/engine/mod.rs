pub mod assembler;
pub mod collaborators;
pub mod converter;
pub mod coordinator;
pub mod eligibility;
pub mod price;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
