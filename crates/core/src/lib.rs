pub mod config;
pub mod dmmf;
pub mod error;
pub mod model;
pub mod scalars;

// Re-export key types for convenience
pub use config::{BindingOptions, CustomScalarOptions, GeneratorConfig};
pub use dmmf::{Datamodel, DmmfDocument, DmmfEnum, DmmfField, DmmfFieldKind, DmmfModel};
pub use error::GeneratorError;
pub use model::{Cardinality, Entity, EnumDef, Field, ModelGraph, Relation, ScalarKind};
pub use scalars::{ResolvedScalar, ScalarBinding, ScalarEntry, ScalarTable};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
