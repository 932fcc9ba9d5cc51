pub mod emit;
pub mod linker;
pub mod naming;
pub mod planner;
pub mod templates;
pub mod writer;

pub use emit::FileDescriptor;
pub use linker::{link, LinkedArtifactSet};
pub use naming::{NamingMode, NamingStrategy};
pub use planner::{Artifact, ArtifactKind, ArtifactSet, CrudOperation, PlanSummary, Planner};
pub use writer::OutputWriter;

use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use typegql_core::{DmmfDocument, GeneratorConfig, GeneratorError, ModelGraph, ScalarTable};

/// The generation pipeline: load, resolve scalars, plan, link, emit, write.
///
/// Stages run strictly in sequence and any failure aborts the whole run
/// before the output directory is touched.
pub struct CodeGenerator {
    config: GeneratorConfig,
}

impl CodeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the full pipeline and write the generated tree under `out_dir`.
    ///
    /// `alternate` is the host-provided secondary model representation,
    /// consulted only when emitting diagnostic documents.
    pub fn generate(
        &self,
        document: &DmmfDocument,
        alternate: Option<&Value>,
        out_dir: &Path,
    ) -> Result<Vec<FileDescriptor>, GeneratorError> {
        let start = Instant::now();
        let (linked, scalars) = self.build_linked(document)?;

        let files = emit::emit(&linked, &scalars, &self.config, document, alternate)?;

        // Everything is linked and rendered; only now is it safe to be
        // destructive.
        let writer = OutputWriter::new(out_dir);
        writer.prepare()?;
        writer.write_all(&files)?;

        tracing::info!(
            files = files.len(),
            out_dir = %out_dir.display(),
            elapsed = ?start.elapsed(),
            "generation complete"
        );
        Ok(files)
    }

    /// Load, plan and link without emitting or writing anything.
    pub fn check(&self, document: &DmmfDocument) -> Result<PlanSummary, GeneratorError> {
        let (linked, _) = self.build_linked(document)?;
        Ok(PlanSummary {
            artifacts: linked.artifacts().len(),
            resolvers: linked
                .artifacts()
                .iter()
                .filter(|a| a.kind.is_resolver())
                .count(),
            relation_args: linked
                .artifacts()
                .iter()
                .filter(|a| a.kind == ArtifactKind::RelationArgs)
                .count(),
        })
    }

    fn build_linked(
        &self,
        document: &DmmfDocument,
    ) -> Result<(LinkedArtifactSet, ScalarTable), GeneratorError> {
        let graph = ModelGraph::load(document)?;
        tracing::info!(
            entities = graph.entities().len(),
            enums = graph.enums().len(),
            "model graph loaded"
        );

        let scalars = ScalarTable::build(
            &self.config.custom_scalar,
            self.config.use_default_custom_scalars,
        );

        let mode = if self.config.use_original_mapping {
            NamingMode::Original
        } else {
            NamingMode::Generated
        };
        let mut naming = NamingStrategy::new(mode);

        let set = Planner::new(&self.config).plan(&graph, &scalars, &mut naming)?;
        tracing::info!(artifacts = set.artifacts().len(), "artifacts planned");

        let linked = linker::link(set, &scalars)?;
        Ok((linked, scalars))
    }
}
