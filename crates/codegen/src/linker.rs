//! Cross-reference linker.
//!
//! The integrity checkpoint between planning and emission: every symbolic
//! reference in the artifact set is substituted with the concrete artifact
//! id or scalar binding it names. Any reference that cannot be resolved
//! aborts the run; nothing is dropped silently. Cyclic entity relations are
//! already references between distinct artifacts, so no expansion happens
//! here and cycles cost nothing.

use std::collections::HashMap;

use typegql_core::{GeneratorError, ResolvedScalar, ScalarKind, ScalarTable};

use crate::planner::{Artifact, ArtifactSet, PlannedType, Reference};

/// A reference after resolution.
#[derive(Debug, Clone)]
pub enum ResolvedReference {
    /// Index into the linked set's artifact list.
    Artifact(usize),
    /// Scalar binding, kept with its lookup name for import planning.
    Scalar { name: String, binding: ResolvedScalar },
}

#[derive(Debug)]
pub struct LinkedArtifactSet {
    artifacts: Vec<Artifact>,
    by_symbol: HashMap<String, usize>,
    resolved: Vec<Vec<ResolvedReference>>,
}

impl LinkedArtifactSet {
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Artifact> {
        self.by_symbol.get(symbol).map(|&i| &self.artifacts[i])
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.by_symbol.get(symbol).copied()
    }

    /// Resolved references of the artifact at `index`, in declaration order.
    pub fn references(&self, index: usize) -> &[ResolvedReference] {
        &self.resolved[index]
    }
}

/// Resolve every reference in the set, or fail on the first dangling one.
pub fn link(set: ArtifactSet, scalars: &ScalarTable) -> Result<LinkedArtifactSet, GeneratorError> {
    let artifacts = set.into_artifacts();

    let mut by_symbol = HashMap::with_capacity(artifacts.len());
    for (i, artifact) in artifacts.iter().enumerate() {
        by_symbol.insert(artifact.symbol.clone(), i);
    }

    let mut resolved = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        verify_inline_types(artifact, &by_symbol)?;

        let mut refs = Vec::with_capacity(artifact.refs.len());
        for reference in &artifact.refs {
            match reference {
                Reference::Artifact(symbol) => {
                    let index = by_symbol.get(symbol).copied().ok_or_else(|| {
                        GeneratorError::DanglingReference {
                            artifact: artifact.symbol.clone(),
                            reference: symbol.clone(),
                        }
                    })?;
                    refs.push(ResolvedReference::Artifact(index));
                }
                Reference::Scalar(name) => {
                    // The table never fails; unconfigured names fall back to
                    // a primitive binding.
                    let binding = scalars
                        .get(name)
                        .map(|entry| ResolvedScalar::Custom(entry.clone()))
                        .unwrap_or_else(|| scalars.resolve(&scalar_kind_for(name)));
                    refs.push(ResolvedReference::Scalar {
                        name: name.clone(),
                        binding,
                    });
                }
            }
        }
        resolved.push(refs);
    }

    tracing::debug!(artifacts = artifacts.len(), "artifact set linked");

    Ok(LinkedArtifactSet {
        artifacts,
        by_symbol,
        resolved,
    })
}

/// Field and method types must point at artifacts in the same set; the refs
/// list normally mirrors them, but a mismatch is a dangling reference too.
fn verify_inline_types(
    artifact: &Artifact,
    by_symbol: &HashMap<String, usize>,
) -> Result<(), GeneratorError> {
    let check = |ty: &PlannedType| -> Result<(), GeneratorError> {
        if let PlannedType::Ref(symbol) = ty {
            if !by_symbol.contains_key(symbol) {
                return Err(GeneratorError::DanglingReference {
                    artifact: artifact.symbol.clone(),
                    reference: symbol.clone(),
                });
            }
        }
        Ok(())
    };

    for field in &artifact.fields {
        check(&field.ty)?;
    }
    for method in &artifact.methods {
        check(&method.returns)?;
        if let Some(args) = &method.args_symbol {
            if !by_symbol.contains_key(args) {
                return Err(GeneratorError::DanglingReference {
                    artifact: artifact.symbol.clone(),
                    reference: args.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Reverse of [`ScalarTable::lookup_name`], for fallback resolution of the
/// named scalar references the planner records.
fn scalar_kind_for(name: &str) -> ScalarKind {
    match name {
        "DateTime" => ScalarKind::DateTime,
        "JSON" => ScalarKind::Json,
        "Byte" => ScalarKind::Bytes,
        "BigInt" => ScalarKind::BigInt,
        "Decimal" => ScalarKind::Decimal,
        _ => ScalarKind::String,
    }
}
