//! Schema-directed mock value generation for schemock.
//!
//! The engine walks a [`schemock_core::Schema`] tree and synthesizes one
//! value per node, honoring declared checks, resolving lazy definitions
//! under a depth guard, and replaying values for nodes that share a
//! consistency name. All randomness goes through a seeded
//! [`provider::ValueProvider`], so a fixed seed reproduces a run.

pub mod constraints;
pub mod consistency;
pub mod context;
pub mod engine;
pub mod errors;
mod generators;
pub mod guard;
pub mod hook;
pub mod logging;
pub mod model;
pub mod provider;
pub mod transforms;
pub mod value;

pub use engine::{
    GenerationResult, MockGenerator, MultiGenerationResult, generate, multi_generate,
};
pub use errors::GenerationError;
pub use hook::{OverrideContext, OverrideHook};
pub use logging::{LogFormat, init_logging};
pub use model::{GenerateOptions, GenerationIssue, GenerationReport, SizeBounds};
pub use provider::{FakerProvider, LocaleKey, UuidVersion, ValueProvider};
pub use transforms::{TransformRegistry, ValueTransform};
pub use value::GeneratedValue;
