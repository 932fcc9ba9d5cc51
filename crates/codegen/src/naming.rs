//! Naming & path strategy.
//!
//! Everything here is a pure function of its inputs: the same
//! (entity, kind, relation) triple always yields the same path and symbol
//! within a run. The strategy also keeps a claim registry so two distinct
//! triples mapping to the same path or symbol abort the run instead of
//! silently overwriting each other.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use typegql_core::GeneratorError;

use crate::planner::{ArtifactKind, CrudOperation};

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// Naming mode, fixed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingMode {
    /// Mirror the source model's own naming exactly; needed when
    /// regenerating over hand-written code expecting stable names.
    Original,
    /// Freely normalize casing and pluralization for readability.
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    pub symbol: String,
    pub path: String,
}

#[derive(Debug)]
pub struct NamingStrategy {
    mode: NamingMode,
    claimed_paths: HashMap<String, String>,
    claimed_symbols: HashMap<String, String>,
}

impl NamingStrategy {
    pub fn new(mode: NamingMode) -> Self {
        Self {
            mode,
            claimed_paths: HashMap::new(),
            claimed_symbols: HashMap::new(),
        }
    }

    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    /// Exported type name for a model-level name.
    pub fn type_name(&self, raw: &str) -> String {
        match self.mode {
            NamingMode::Original => raw.to_string(),
            NamingMode::Generated => to_pascal_case(raw),
        }
    }

    /// Path and symbol for one artifact. `owner` is the entity name for
    /// entity-scoped kinds and the enum name for shared enum types.
    pub fn name_for(
        &self,
        kind: &ArtifactKind,
        owner: Option<&str>,
        relation: Option<&str>,
    ) -> ArtifactName {
        let owner = owner.map(|o| self.type_name(o));
        let e = owner.as_deref().unwrap_or_default();

        let (symbol, path) = match kind {
            ArtifactKind::Model => (e.to_string(), format!("models/{e}.ts")),
            ArtifactKind::EnumType => (e.to_string(), format!("enums/{e}.ts")),
            ArtifactKind::ScalarFieldEnum => {
                let sym = format!("{e}ScalarFieldEnum");
                (sym.clone(), format!("enums/{sym}.ts"))
            }
            ArtifactKind::WhereInput
            | ArtifactKind::WhereUniqueInput
            | ArtifactKind::OrderByInput
            | ArtifactKind::CreateInput
            | ArtifactKind::UpdateInput
            | ArtifactKind::UncheckedCreateInput
            | ArtifactKind::UncheckedUpdateInput => {
                let sym = format!("{e}{}", input_suffix(kind));
                (sym.clone(), format!("resolvers/inputs/{sym}.ts"))
            }
            ArtifactKind::CrudArgs(op) => {
                let sym = format!("{}{e}Args", op.type_prefix());
                (sym.clone(), format!("resolvers/crud/{e}/args/{sym}.ts"))
            }
            ArtifactKind::CrudResolver(op) => {
                let sym = format!("{}{e}Resolver", op.type_prefix());
                (sym.clone(), format!("resolvers/crud/{e}/{sym}.ts"))
            }
            ArtifactKind::RelationsResolver => {
                let sym = format!("{e}RelationsResolver");
                (sym.clone(), format!("resolvers/relations/{e}/{sym}.ts"))
            }
            ArtifactKind::RelationArgs => {
                let rel = to_pascal_case(relation.unwrap_or_default());
                let sym = format!("{e}{rel}Args");
                (sym.clone(), format!("resolvers/relations/{e}/args/{sym}.ts"))
            }
            ArtifactKind::AggregateOutput => {
                let sym = format!("Aggregate{e}");
                (sym.clone(), format!("resolvers/outputs/{sym}.ts"))
            }
            ArtifactKind::AffectedRowsOutput => (
                "AffectedRowsOutput".to_string(),
                "resolvers/outputs/AffectedRowsOutput.ts".to_string(),
            ),
            ArtifactKind::Index => ("resolversIndex".to_string(), "index.ts".to_string()),
        };

        ArtifactName { symbol, path }
    }

    /// GraphQL field name for a CRUD operation on an entity.
    pub fn operation_name(&self, op: CrudOperation, entity: &str) -> String {
        let e = self.type_name(entity);
        match self.mode {
            NamingMode::Original => format!("{}{e}", op.action_name()),
            NamingMode::Generated => match op {
                CrudOperation::FindUnique => to_camel_case(&e),
                CrudOperation::FindMany => pluralize_word(&to_camel_case(&e)),
                _ => format!("{}{e}", op.action_name()),
            },
        }
    }

    /// Claim a name pair for `owner`. Two distinct owners claiming the same
    /// path or symbol is a model defect that aborts the whole run.
    pub fn reserve(&mut self, name: &ArtifactName, owner: &str) -> Result<(), GeneratorError> {
        if let Some(first) = self.claimed_paths.get(&name.path) {
            return Err(GeneratorError::NamingCollision {
                name: name.path.clone(),
                first: first.clone(),
                second: owner.to_string(),
            });
        }
        if let Some(first) = self.claimed_symbols.get(&name.symbol) {
            return Err(GeneratorError::NamingCollision {
                name: name.symbol.clone(),
                first: first.clone(),
                second: owner.to_string(),
            });
        }
        self.claimed_paths
            .insert(name.path.clone(), owner.to_string());
        self.claimed_symbols
            .insert(name.symbol.clone(), owner.to_string());
        Ok(())
    }
}

fn input_suffix(kind: &ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::WhereInput => "WhereInput",
        ArtifactKind::WhereUniqueInput => "WhereUniqueInput",
        ArtifactKind::OrderByInput => "OrderByInput",
        ArtifactKind::CreateInput => "CreateInput",
        ArtifactKind::UpdateInput => "UpdateInput",
        ArtifactKind::UncheckedCreateInput => "UncheckedCreateInput",
        ArtifactKind::UncheckedUpdateInput => "UncheckedUpdateInput",
        _ => unreachable!("not an input kind"),
    }
}

// String transformation helpers

pub fn pluralize_word(word: &str) -> String {
    if word.ends_with('y') && word.len() > 1 {
        format!("{}ies", &word[..word.len() - 1])
    } else if word.ends_with('s') || word.ends_with("sh") || word.ends_with("ch") || word.ends_with('x') {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    match pascal.chars().next() {
        Some(first) => first.to_lowercase().collect::<String>() + &pascal[first.len_utf8()..],
        None => pascal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_helpers() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("Patient"), "Patient");
        assert_eq!(to_camel_case("UserProfile"), "userProfile");
        assert_eq!(pluralize_word("category"), "categories");
        assert_eq!(pluralize_word("box"), "boxes");
        assert_eq!(pluralize_word("patient"), "patients");
    }

    #[test]
    fn identifier_validation() {
        assert!(is_valid_identifier("Patient"));
        assert!(is_valid_identifier("_private"));
        assert!(!is_valid_identifier("2fast"));
        assert!(!is_valid_identifier("bad-name"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn naming_is_deterministic() {
        let naming = NamingStrategy::new(NamingMode::Generated);
        let a = naming.name_for(
            &ArtifactKind::CrudResolver(CrudOperation::Delete),
            Some("Patient"),
            None,
        );
        let b = naming.name_for(
            &ArtifactKind::CrudResolver(CrudOperation::Delete),
            Some("Patient"),
            None,
        );
        assert_eq!(a, b);
        assert_eq!(a.symbol, "DeletePatientResolver");
        assert_eq!(a.path, "resolvers/crud/Patient/DeletePatientResolver.ts");
    }

    #[test]
    fn original_mode_mirrors_model_names() {
        let naming = NamingStrategy::new(NamingMode::Original);
        let name = naming.name_for(&ArtifactKind::Model, Some("user_profile"), None);
        assert_eq!(name.symbol, "user_profile");

        let generated = NamingStrategy::new(NamingMode::Generated);
        let name = generated.name_for(&ArtifactKind::Model, Some("user_profile"), None);
        assert_eq!(name.symbol, "UserProfile");
    }

    #[test]
    fn operation_names_per_mode() {
        let original = NamingStrategy::new(NamingMode::Original);
        let generated = NamingStrategy::new(NamingMode::Generated);

        assert_eq!(
            original.operation_name(CrudOperation::FindUnique, "Patient"),
            "findUniquePatient"
        );
        assert_eq!(
            generated.operation_name(CrudOperation::FindUnique, "Patient"),
            "patient"
        );
        assert_eq!(
            generated.operation_name(CrudOperation::FindMany, "Patient"),
            "patients"
        );
        assert_eq!(
            generated.operation_name(CrudOperation::Delete, "Patient"),
            "deletePatient"
        );
        assert_eq!(
            generated.operation_name(CrudOperation::GroupBy, "Patient"),
            "groupByPatient"
        );
    }

    #[test]
    fn reserve_rejects_collisions() {
        let mut naming = NamingStrategy::new(NamingMode::Generated);
        let a = naming.name_for(&ArtifactKind::Model, Some("user_profile"), None);
        let b = naming.name_for(&ArtifactKind::Model, Some("UserProfile"), None);
        assert_eq!(a.symbol, b.symbol);

        naming.reserve(&a, "user_profile/Model").unwrap();
        let err = naming.reserve(&b, "UserProfile/Model").unwrap_err();
        assert!(matches!(err, GeneratorError::NamingCollision { .. }), "{err}");
    }

    #[test]
    fn relation_args_names() {
        let naming = NamingStrategy::new(NamingMode::Generated);
        let name = naming.name_for(&ArtifactKind::RelationArgs, Some("Creator"), Some("likes"));
        assert_eq!(name.symbol, "CreatorLikesArgs");
        assert_eq!(
            name.path,
            "resolvers/relations/Creator/args/CreatorLikesArgs.ts"
        );
    }
}
