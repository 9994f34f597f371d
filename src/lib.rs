//! XR Input
//!
//! Input event routing for mixed-reality applications: disable stack, modal
//! and fallback handler stacks, focus-aware dispatch and typed event raising.

/// Build-time information (git SHA, timestamp, compiler)
pub mod build_info;

/// Layered configuration loading (profile files, environment overrides)
pub mod config;

/// Health checks for configuration, routing and build metadata
pub mod health;

/// Event router, handler stacks and observer registry
pub mod input;

/// Input action, gesture and rule profiles
pub mod profile;

/// Spectator view networking coordinator
pub mod spectator;
