// Core trading domain
pub mod trading;

// Input rules
pub mod validation;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
