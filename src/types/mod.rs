// CRM workspace shared type definitions
// Each submodule defines types used across the engine.

pub mod errors;
pub mod render;
pub mod route;
pub mod settings;
pub mod tab;
pub mod workspace;
