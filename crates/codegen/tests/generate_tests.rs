//! End-to-end pipeline tests: model document in, file descriptors out.

use std::collections::HashMap;

use typegql_codegen::planner::Planner;
use typegql_codegen::{link, CodeGenerator, NamingMode, NamingStrategy};
use typegql_core::dmmf::{Datamodel, DmmfDocument, DmmfEnum, DmmfField, DmmfFieldKind, DmmfModel};
use typegql_core::{BindingOptions, CustomScalarOptions, GeneratorConfig, GeneratorError, ModelGraph, ScalarTable};

fn scalar(name: &str, ty: &str) -> DmmfField {
    DmmfField {
        name: name.to_string(),
        kind: DmmfFieldKind::Scalar,
        type_name: ty.to_string(),
        is_required: true,
        is_list: false,
        is_id: name == "id",
        is_unique: false,
        relation_name: None,
        relation_from_fields: vec![],
        relation_to_fields: vec![],
    }
}

fn relation(name: &str, target: &str, pair: &str, list: bool, from: &[&str]) -> DmmfField {
    DmmfField {
        name: name.to_string(),
        kind: DmmfFieldKind::Object,
        type_name: target.to_string(),
        is_required: !list,
        is_list: list,
        is_id: false,
        is_unique: false,
        relation_name: Some(pair.to_string()),
        relation_from_fields: from.iter().map(|s| s.to_string()).collect(),
        relation_to_fields: vec![],
    }
}

fn model(name: &str, fields: Vec<DmmfField>) -> DmmfModel {
    DmmfModel {
        name: name.to_string(),
        db_name: None,
        fields,
        unique_fields: vec![],
    }
}

fn document(models: Vec<DmmfModel>, enums: Vec<DmmfEnum>) -> DmmfDocument {
    DmmfDocument {
        datamodel: Datamodel { models, enums },
    }
}

fn patient_document() -> DmmfDocument {
    document(
        vec![model(
            "Patient",
            vec![scalar("id", "Int"), scalar("name", "String")],
        )],
        vec![],
    )
}

/// Creator/Problem joined by `likedBy`/`likes` (many) and `creator`/`problems`
/// (one, foreign key on Problem).
fn creator_problem_document() -> DmmfDocument {
    document(
        vec![
            model(
                "Problem",
                vec![
                    scalar("id", "Int"),
                    scalar("problemText", "String"),
                    scalar("creatorId", "Int"),
                    relation("likedBy", "Creator", "ProblemLikes", true, &[]),
                    relation("creator", "Creator", "CreatorProblems", false, &["creatorId"]),
                ],
            ),
            model(
                "Creator",
                vec![
                    scalar("id", "Int"),
                    scalar("name", "String"),
                    relation("likes", "Problem", "ProblemLikes", true, &[]),
                    relation("problems", "Problem", "CreatorProblems", true, &[]),
                ],
            ),
        ],
        vec![],
    )
}

fn generate_to_temp(
    config: GeneratorConfig,
    doc: &DmmfDocument,
) -> (tempfile::TempDir, Vec<typegql_codegen::FileDescriptor>) {
    let dir = tempfile::tempdir().unwrap();
    let files = CodeGenerator::new(config)
        .generate(doc, None, &dir.path().join("generated"))
        .unwrap();
    (dir, files)
}

#[test]
fn scenario_single_entity_full_crud() {
    let (_dir, files) = generate_to_temp(GeneratorConfig::default(), &patient_document());

    let resolver_files: Vec<&str> = files
        .iter()
        .filter(|f| f.path.starts_with("resolvers/crud/Patient/") && !f.path.contains("/args/"))
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(resolver_files.len(), 11, "{resolver_files:?}");

    let args_files = files
        .iter()
        .filter(|f| f.path.starts_with("resolvers/crud/Patient/args/"))
        .count();
    assert_eq!(args_files, 11);

    // No relations on Patient.
    assert!(!files.iter().any(|f| f.path.starts_with("resolvers/relations/")));

    // One index registration listing every resolver.
    let index = files.iter().find(|f| f.path == "index.ts").unwrap();
    for symbol in [
        "FindUniquePatientResolver",
        "FindManyPatientResolver",
        "CreatePatientResolver",
        "CreateManyPatientResolver",
        "UpdatePatientResolver",
        "UpdateManyPatientResolver",
        "UpsertPatientResolver",
        "DeletePatientResolver",
        "DeleteManyPatientResolver",
        "AggregatePatientResolver",
        "GroupByPatientResolver",
    ] {
        assert!(index.content.contains(symbol), "index missing {symbol}");
    }
}

#[test]
fn scenario_relation_pair_links_and_missing_reciprocal_fails() {
    let doc = creator_problem_document();
    let graph = ModelGraph::load(&doc).unwrap();
    let scalars = ScalarTable::build(&HashMap::new(), true);
    let config = GeneratorConfig::default();
    let mut naming = NamingStrategy::new(NamingMode::Generated);
    let set = Planner::new(&config)
        .plan(&graph, &scalars, &mut naming)
        .unwrap();

    let relations_resolver = set.by_symbol("ProblemRelationsResolver").unwrap();
    let refs: Vec<String> = relations_resolver
        .refs
        .iter()
        .map(|r| format!("{r:?}"))
        .collect();
    assert!(refs.iter().any(|r| r.contains("\"Creator\"")), "{refs:?}");
    assert!(
        refs.iter().any(|r| r.contains("ProblemLikedByArgs")),
        "{refs:?}"
    );

    // The whole set links with no dangling references.
    let linked = link(set, &scalars).unwrap();
    for (i, artifact) in linked.artifacts().iter().enumerate() {
        assert_eq!(
            linked.references(i).len(),
            artifact.refs.len(),
            "unresolved references in {}",
            artifact.symbol
        );
    }

    // Dropping Problem's side while Creator still declares `likes` is a
    // malformed model.
    let broken = document(
        vec![
            model(
                "Problem",
                vec![
                    scalar("id", "Int"),
                    scalar("problemText", "String"),
                    scalar("creatorId", "Int"),
                    relation("creator", "Creator", "CreatorProblems", false, &["creatorId"]),
                ],
            ),
            model(
                "Creator",
                vec![
                    scalar("id", "Int"),
                    scalar("name", "String"),
                    relation("likes", "Problem", "ProblemLikes", true, &[]),
                    relation("problems", "Problem", "CreatorProblems", true, &[]),
                ],
            ),
        ],
        vec![],
    );
    let err = ModelGraph::load(&broken).unwrap_err();
    assert!(matches!(err, GeneratorError::MalformedModel(_)), "{err}");
}

#[test]
fn relation_artifact_counts_follow_simple_resolvers() {
    let doc = creator_problem_document();

    let (_dir, files) = generate_to_temp(GeneratorConfig::default(), &doc);
    // Two entities with two relations each: 4 relation args, 2 relations
    // resolvers (one per entity owning relations).
    let relation_args = files
        .iter()
        .filter(|f| f.path.contains("/relations/") && f.path.contains("/args/"))
        .count();
    assert_eq!(relation_args, 4);
    let relation_resolvers = files
        .iter()
        .filter(|f| f.path.contains("/relations/") && !f.path.contains("/args/"))
        .count();
    assert_eq!(relation_resolvers, 2);

    let config = GeneratorConfig {
        simple_resolvers: true,
        ..GeneratorConfig::default()
    };
    let (_dir, files) = generate_to_temp(config, &doc);
    assert!(!files.iter().any(|f| f.path.contains("/relations/")));
}

#[test]
fn relation_args_scope_to_target_entity() {
    let (_dir, files) = generate_to_temp(GeneratorConfig::default(), &creator_problem_document());

    let liked_by = files
        .iter()
        .find(|f| f.path == "resolvers/relations/Problem/args/ProblemLikedByArgs.ts")
        .unwrap();
    // Filter/order/cursor/distinct all come from the target entity, Creator.
    assert!(liked_by.content.contains("CreatorWhereInput"));
    assert!(liked_by.content.contains("CreatorOrderByInput"));
    assert!(liked_by.content.contains("CreatorWhereUniqueInput"));
    assert!(liked_by.content.contains("CreatorScalarFieldEnum"));

    // The distinct enum is restricted to the target's own scalar fields in
    // declaration order.
    let creator_enum = files
        .iter()
        .find(|f| f.path == "enums/CreatorScalarFieldEnum.ts")
        .unwrap();
    let id_pos = creator_enum.content.find("id = \"id\"").unwrap();
    let name_pos = creator_enum.content.find("name = \"name\"").unwrap();
    assert!(id_pos < name_pos);
    assert!(!creator_enum.content.contains("problemText"));
}

#[test]
fn scenario_custom_scalar_override_binds_exclusively() {
    let mut custom_scalar = HashMap::new();
    custom_scalar.insert(
        "DateTime".to_string(),
        CustomScalarOptions {
            graphql: Some(BindingOptions {
                import_name: Some("GraphQLISODateTime".to_string()),
                module: Some("graphql-scalars".to_string()),
            }),
            field: None,
        },
    );
    let config = GeneratorConfig {
        use_default_custom_scalars: false,
        custom_scalar,
        ..GeneratorConfig::default()
    };

    let doc = document(
        vec![model(
            "Visit",
            vec![scalar("id", "Int"), scalar("scheduledAt", "DateTime")],
        )],
        vec![],
    );
    let (_dir, files) = generate_to_temp(config, &doc);

    let model_file = files.iter().find(|f| f.path == "models/Visit.ts").unwrap();
    assert!(model_file
        .content
        .contains("import { GraphQLISODateTime } from \"graphql-scalars\";"));
    assert!(model_file.content.contains("_type => GraphQLISODateTime"));
    // The default binding (plain DateTime import) is never consulted.
    assert!(!model_file.content.contains("_type => DateTime"));
}

#[test]
fn scenario_normalization_collision_writes_nothing() {
    let doc = document(
        vec![
            model("UserProfile", vec![scalar("id", "Int")]),
            model("user_profile", vec![scalar("id", "Int")]),
        ],
        vec![],
    );

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let err = CodeGenerator::new(GeneratorConfig::default())
        .generate(&doc, None, &out)
        .unwrap_err();
    assert!(matches!(err, GeneratorError::NamingCollision { .. }), "{err}");
    assert!(!out.exists(), "collision must not touch the output directory");
}

#[test]
fn emission_is_idempotent() {
    let doc = creator_problem_document();
    let (_dir1, first) = generate_to_temp(GeneratorConfig::default(), &doc);
    let (_dir2, second) = generate_to_temp(GeneratorConfig::default(), &doc);
    assert_eq!(first, second);
}

#[test]
fn unchecked_inputs_substitute_foreign_keys() {
    let config = GeneratorConfig {
        use_unchecked_scalar_inputs: true,
        ..GeneratorConfig::default()
    };
    let (_dir, files) = generate_to_temp(config, &creator_problem_document());

    let checked = files
        .iter()
        .find(|f| f.path == "resolvers/inputs/ProblemCreateInput.ts")
        .unwrap();
    // The checked shape hides the raw foreign key behind the relation field.
    assert!(checked.content.contains("creator"));
    assert!(!checked.content.contains("creatorId"));

    let unchecked = files
        .iter()
        .find(|f| f.path == "resolvers/inputs/ProblemUncheckedCreateInput.ts")
        .unwrap();
    assert!(unchecked.content.contains("creatorId"));
    assert!(!unchecked.content.contains("_type => CreatorWhereUniqueInput"));

    // Creator has no foreign-key scalars, so no unchecked variants for it.
    assert!(!files
        .iter()
        .any(|f| f.path == "resolvers/inputs/CreatorUncheckedCreateInput.ts"));
}

#[test]
fn original_mapping_mirrors_action_names() {
    let config = GeneratorConfig {
        use_original_mapping: true,
        ..GeneratorConfig::default()
    };
    let (_dir, files) = generate_to_temp(config, &patient_document());
    let find_unique = files
        .iter()
        .find(|f| f.path == "resolvers/crud/Patient/FindUniquePatientResolver.ts")
        .unwrap();
    assert!(find_unique.content.contains("async findUniquePatient("));

    let (_dir, files) = generate_to_temp(GeneratorConfig::default(), &patient_document());
    let find_unique = files
        .iter()
        .find(|f| f.path == "resolvers/crud/Patient/FindUniquePatientResolver.ts")
        .unwrap();
    assert!(find_unique.content.contains("async patient("));
    let find_many = files
        .iter()
        .find(|f| f.path == "resolvers/crud/Patient/FindManyPatientResolver.ts")
        .unwrap();
    assert!(find_many.content.contains("async patients("));
}

#[test]
fn emit_dmmf_produces_diagnostic_documents() {
    let config = GeneratorConfig {
        emit_dmmf: true,
        ..GeneratorConfig::default()
    };
    let doc = patient_document();
    let dir = tempfile::tempdir().unwrap();
    let alternate = serde_json::json!({ "models": ["Patient"] });
    let files = CodeGenerator::new(config)
        .generate(&doc, Some(&alternate), &dir.path().join("generated"))
        .unwrap();

    let dmmf = files.iter().find(|f| f.path == "dmmf.json").unwrap();
    assert!(dmmf.content.contains("\"Patient\""));
    let alt = files
        .iter()
        .find(|f| f.path == "prisma-client-dmmf.json")
        .unwrap();
    assert!(alt.content.contains("models"));
}

#[test]
fn enums_are_planned_and_rendered() {
    let doc = document(
        vec![model(
            "User",
            vec![scalar("id", "Int"), {
                let mut f = scalar("role", "Role");
                f.kind = DmmfFieldKind::Enum;
                f
            }],
        )],
        vec![DmmfEnum {
            name: "Role".to_string(),
            values: vec!["USER".to_string(), "ADMIN".to_string()],
        }],
    );
    let (_dir, files) = generate_to_temp(GeneratorConfig::default(), &doc);

    let role = files.iter().find(|f| f.path == "enums/Role.ts").unwrap();
    assert!(role.content.contains("export enum Role {"));
    assert!(role.content.contains("ADMIN = \"ADMIN\""));

    // Model fields reference the enum artifact, with a relative import.
    let user = files.iter().find(|f| f.path == "models/User.ts").unwrap();
    assert!(user.content.contains("import { Role } from \"../enums/Role\";"));

    // CRUD resolvers exist for the enum-bearing entity too.
    let resolver_count = set_of_resolvers(&files, "User");
    assert_eq!(resolver_count, 11);
}

fn set_of_resolvers(files: &[typegql_codegen::FileDescriptor], entity: &str) -> usize {
    files
        .iter()
        .filter(|f| {
            f.path.starts_with(&format!("resolvers/crud/{entity}/")) && !f.path.contains("/args/")
        })
        .count()
}

#[test]
fn check_reports_summary_without_writing() {
    let summary = CodeGenerator::new(GeneratorConfig::default())
        .check(&creator_problem_document())
        .unwrap();
    assert_eq!(summary.resolvers, 24); // 11 per entity + 2 relations resolvers
    assert_eq!(summary.relation_args, 4);
}
