use thiserror::Error;

/// Error taxonomy for a generation run.
///
/// Every model/planning/linking variant is fatal for the whole run: one
/// malformed entity invalidates the pass because downstream artifacts may
/// reference it. The only deliberate leniency lives in the scalar table,
/// where incomplete custom-scalar overrides are dropped instead of reported.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("malformed model: {0}")]
    MalformedModel(String),

    #[error("relation `{relation}` on entity `{entity}` targets unknown entity `{target}`")]
    UnresolvedRelation {
        entity: String,
        relation: String,
        target: String,
    },

    #[error("naming collision: `{first}` and `{second}` both map to `{name}`")]
    NamingCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("artifact `{artifact}` references `{reference}`, which does not exist in this run")]
    DanglingReference {
        artifact: String,
        reference: String,
    },
}

impl GeneratorError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedModel(detail.into())
    }
}
