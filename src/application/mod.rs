pub mod bootstrap;

// Trade recording and aggregate queries
pub mod trading;

// System orchestrator
pub mod system;
