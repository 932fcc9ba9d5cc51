//! Artifact planner.
//!
//! Walks the model graph and computes every artifact the run must emit:
//! model output types, enums, input types, CRUD argument types and
//! resolvers, relation resolvers and their argument types, aggregate
//! outputs, and the index registration. Artifacts carry symbolic references
//! only; the linker turns those into concrete artifact ids.

use std::collections::HashMap;

use typegql_core::model::Cardinality;
use typegql_core::{Entity, GeneratorConfig, GeneratorError, ModelGraph, ScalarKind, ScalarTable};

use crate::naming::{is_valid_identifier, to_camel_case, NamingStrategy};

/// One CRUD capability. Every entity gets all eleven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    FindUnique,
    FindMany,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Upsert,
    Delete,
    DeleteMany,
    Aggregate,
    GroupBy,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 11] = [
        CrudOperation::FindUnique,
        CrudOperation::FindMany,
        CrudOperation::Create,
        CrudOperation::CreateMany,
        CrudOperation::Update,
        CrudOperation::UpdateMany,
        CrudOperation::Upsert,
        CrudOperation::Delete,
        CrudOperation::DeleteMany,
        CrudOperation::Aggregate,
        CrudOperation::GroupBy,
    ];

    /// PascalCase prefix used in type and file names.
    pub fn type_prefix(self) -> &'static str {
        match self {
            Self::FindUnique => "FindUnique",
            Self::FindMany => "FindMany",
            Self::Create => "Create",
            Self::CreateMany => "CreateMany",
            Self::Update => "Update",
            Self::UpdateMany => "UpdateMany",
            Self::Upsert => "Upsert",
            Self::Delete => "Delete",
            Self::DeleteMany => "DeleteMany",
            Self::Aggregate => "Aggregate",
            Self::GroupBy => "GroupBy",
        }
    }

    /// camelCase action name, as the data-access layer spells it.
    pub fn action_name(self) -> &'static str {
        match self {
            Self::FindUnique => "findUnique",
            Self::FindMany => "findMany",
            Self::Create => "create",
            Self::CreateMany => "createMany",
            Self::Update => "update",
            Self::UpdateMany => "updateMany",
            Self::Upsert => "upsert",
            Self::Delete => "delete",
            Self::DeleteMany => "deleteMany",
            Self::Aggregate => "aggregate",
            Self::GroupBy => "groupBy",
        }
    }

    pub fn is_mutation(self) -> bool {
        !matches!(
            self,
            Self::FindUnique | Self::FindMany | Self::Aggregate | Self::GroupBy
        )
    }

    /// Whether the operation may legitimately resolve to no record.
    pub fn nullable_result(self) -> bool {
        matches!(self, Self::FindUnique | Self::Delete | Self::Update)
    }

    pub fn list_result(self) -> bool {
        matches!(self, Self::FindMany | Self::GroupBy)
    }

    pub fn returns_affected_rows(self) -> bool {
        matches!(self, Self::CreateMany | Self::UpdateMany | Self::DeleteMany)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    EnumType,
    ScalarFieldEnum,
    WhereInput,
    WhereUniqueInput,
    OrderByInput,
    CreateInput,
    UpdateInput,
    UncheckedCreateInput,
    UncheckedUpdateInput,
    CrudArgs(CrudOperation),
    CrudResolver(CrudOperation),
    RelationArgs,
    RelationsResolver,
    AggregateOutput,
    AffectedRowsOutput,
    Index,
}

impl ArtifactKind {
    pub fn is_resolver(&self) -> bool {
        matches!(self, Self::CrudResolver(_) | Self::RelationsResolver)
    }
}

/// Symbolic reference to another artifact or to a scalar binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Artifact(String),
    Scalar(String),
}

/// Abstract exposure tags; the rendering layer turns these into whatever
/// framework decorators the target needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityTag {
    ExposedAsQuery,
    ExposedAsMutation,
    NullableResult,
    ListResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedType {
    Scalar(ScalarKind),
    /// Another artifact, by symbol.
    Ref(String),
    /// Built-in primitive of the target language.
    Primitive(&'static str),
}

#[derive(Debug, Clone)]
pub struct PlannedField {
    pub name: String,
    pub ty: PlannedType,
    pub nullable: bool,
    pub list: bool,
}

/// A data-access capability reference: "this resolver needs operation Y on
/// entity X". The concrete binding is supplied by the host at runtime.
#[derive(Debug, Clone)]
pub struct DataAccess {
    pub entity: String,
    pub operation: String,
}

#[derive(Debug, Clone)]
pub struct PlannedMethod {
    pub name: String,
    pub returns: PlannedType,
    pub nullable: bool,
    pub list: bool,
    pub args_symbol: Option<String>,
    pub mutation: bool,
    pub data_access: DataAccess,
    /// Id field used to re-select the root record in relation resolvers.
    pub root_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub entity: Option<String>,
    pub relation: Option<String>,
    pub path: String,
    pub symbol: String,
    pub refs: Vec<Reference>,
    pub capabilities: Vec<CapabilityTag>,
    pub fields: Vec<PlannedField>,
    pub methods: Vec<PlannedMethod>,
    pub enum_values: Vec<String>,
}

impl Artifact {
    fn new(kind: ArtifactKind, entity: Option<&str>, relation: Option<&str>) -> Self {
        Self {
            kind,
            entity: entity.map(String::from),
            relation: relation.map(String::from),
            path: String::new(),
            symbol: String::new(),
            refs: Vec::new(),
            capabilities: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn stub(kind: ArtifactKind, symbol: &str) -> Self {
        let mut artifact = Self::new(kind, None, None);
        artifact.symbol = symbol.to_string();
        artifact.path = format!("{symbol}.ts");
        artifact
    }

    /// Record a reference, keeping the list duplicate-free and ordered.
    fn add_ref(&mut self, reference: Reference) {
        if !self.refs.contains(&reference) {
            self.refs.push(reference);
        }
    }

    fn add_field(&mut self, field: PlannedField) {
        match &field.ty {
            PlannedType::Ref(symbol) => self.add_ref(Reference::Artifact(symbol.clone())),
            PlannedType::Scalar(kind) => {
                if let Some(name) = ScalarTable::lookup_name(kind) {
                    self.add_ref(Reference::Scalar(name.to_string()));
                }
            }
            PlannedType::Primitive(_) => {}
        }
        self.fields.push(field);
    }
}

#[derive(Debug, Default)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.symbol == symbol)
    }

    pub fn of_kind(&self, pred: impl Fn(&ArtifactKind) -> bool) -> Vec<&Artifact> {
        self.artifacts.iter().filter(|a| pred(&a.kind)).collect()
    }

    fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    #[cfg(test)]
    pub(crate) fn push_for_tests(&mut self, artifact: Artifact) {
        self.push(artifact);
    }
}

pub struct Planner<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn plan(
        &self,
        graph: &ModelGraph,
        scalars: &ScalarTable,
        naming: &mut NamingStrategy,
    ) -> Result<ArtifactSet, GeneratorError> {
        let _ = scalars; // bindings resolve at link time; the table's names drive refs
        let mut set = ArtifactSet::default();

        for entity in graph.entities() {
            if !is_valid_identifier(&entity.name) {
                return Err(GeneratorError::malformed(format!(
                    "entity name `{}` is not a valid identifier",
                    entity.name
                )));
            }
        }

        self.plan_shared(&mut set, naming)?;
        for enum_def in graph.enums() {
            self.plan_enum(&mut set, naming, &enum_def.name, &enum_def.values)?;
        }
        for entity in graph.entities() {
            self.plan_entity(&mut set, naming, entity)?;
        }
        if !self.config.simple_resolvers {
            for entity in graph.entities() {
                self.plan_relations(&mut set, naming, graph, entity)?;
            }
        }
        self.plan_index(&mut set, naming)?;

        tracing::debug!(artifacts = set.artifacts.len(), "artifact planning complete");
        Ok(set)
    }

    fn finish(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        mut artifact: Artifact,
    ) -> Result<(), GeneratorError> {
        let name = naming.name_for(
            &artifact.kind,
            artifact.entity.as_deref(),
            artifact.relation.as_deref(),
        );
        let owner = format!(
            "{}/{:?}/{}",
            artifact.entity.as_deref().unwrap_or("-"),
            artifact.kind,
            artifact.relation.as_deref().unwrap_or("-")
        );
        naming.reserve(&name, &owner)?;
        artifact.symbol = name.symbol;
        artifact.path = name.path;
        set.push(artifact);
        Ok(())
    }

    fn plan_shared(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
    ) -> Result<(), GeneratorError> {
        let mut affected = Artifact::new(ArtifactKind::AffectedRowsOutput, None, None);
        affected.add_field(PlannedField {
            name: "count".to_string(),
            ty: PlannedType::Primitive("Int"),
            nullable: false,
            list: false,
        });
        self.finish(set, naming, affected)?;

        // Sort direction enum shared by every OrderByInput.
        self.plan_enum(set, naming, "SortOrder", &["asc".to_string(), "desc".to_string()])
    }

    fn plan_enum(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        name: &str,
        values: &[String],
    ) -> Result<(), GeneratorError> {
        let mut artifact = Artifact::new(ArtifactKind::EnumType, Some(name), None);
        artifact.enum_values = values.to_vec();
        self.finish(set, naming, artifact)
    }

    fn enum_symbol(&self, naming: &NamingStrategy, name: &str) -> String {
        naming.name_for(&ArtifactKind::EnumType, Some(name), None).symbol
    }

    fn model_symbol(&self, naming: &NamingStrategy, entity: &str) -> String {
        naming.name_for(&ArtifactKind::Model, Some(entity), None).symbol
    }

    fn input_symbol(&self, naming: &NamingStrategy, entity: &str, kind: ArtifactKind) -> String {
        naming.name_for(&kind, Some(entity), None).symbol
    }

    /// Planned type for a value field, routing enum kinds to their artifact.
    fn value_type(&self, naming: &NamingStrategy, kind: &ScalarKind) -> PlannedType {
        match kind {
            ScalarKind::Enum(name) => PlannedType::Ref(self.enum_symbol(naming, name)),
            other => PlannedType::Scalar(other.clone()),
        }
    }

    fn plan_entity(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
    ) -> Result<(), GeneratorError> {
        let name = entity.name.as_str();
        self.plan_model(set, naming, entity)?;

        // Distinct-selection enum over the entity's own scalar fields, in
        // declaration order.
        let scalar_names: Vec<String> =
            entity.fields.iter().map(|f| f.name.clone()).collect();
        let mut sfe = Artifact::new(ArtifactKind::ScalarFieldEnum, Some(name), None);
        sfe.enum_values = scalar_names;
        self.finish(set, naming, sfe)?;

        self.plan_inputs(set, naming, entity)?;

        let mut aggregate = Artifact::new(ArtifactKind::AggregateOutput, Some(name), None);
        aggregate.add_field(PlannedField {
            name: "_count".to_string(),
            ty: PlannedType::Primitive("Int"),
            nullable: false,
            list: false,
        });
        self.finish(set, naming, aggregate)?;

        for op in CrudOperation::ALL {
            self.plan_crud_args(set, naming, entity, op)?;
            self.plan_crud_resolver(set, naming, entity, op)?;
        }
        Ok(())
    }

    fn plan_model(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
    ) -> Result<(), GeneratorError> {
        let mut model = Artifact::new(ArtifactKind::Model, Some(&entity.name), None);
        for field in &entity.fields {
            model.add_field(PlannedField {
                name: field.name.clone(),
                ty: self.value_type(naming, &field.kind),
                nullable: field.nullable,
                list: field.is_list,
            });
        }
        for relation in &entity.relations {
            model.add_field(PlannedField {
                name: relation.name.clone(),
                ty: PlannedType::Ref(self.model_symbol(naming, &relation.target)),
                nullable: relation.nullable,
                list: relation.cardinality == Cardinality::Many,
            });
        }
        self.finish(set, naming, model)
    }

    fn plan_inputs(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
    ) -> Result<(), GeneratorError> {
        let name = entity.name.as_str();
        let sort_order = self.enum_symbol(naming, "SortOrder");

        // WhereInput: every scalar field, optional.
        let mut where_input = Artifact::new(ArtifactKind::WhereInput, Some(name), None);
        for field in &entity.fields {
            where_input.add_field(PlannedField {
                name: field.name.clone(),
                ty: self.value_type(naming, &field.kind),
                nullable: true,
                list: field.is_list,
            });
        }
        self.finish(set, naming, where_input)?;

        // WhereUniqueInput: id and unique fields only.
        let mut where_unique = Artifact::new(ArtifactKind::WhereUniqueInput, Some(name), None);
        for field in entity.fields.iter().filter(|f| f.is_id || f.is_unique) {
            where_unique.add_field(PlannedField {
                name: field.name.clone(),
                ty: self.value_type(naming, &field.kind),
                nullable: true,
                list: false,
            });
        }
        self.finish(set, naming, where_unique)?;

        // OrderByInput: every scalar field, optional sort direction.
        let mut order_by = Artifact::new(ArtifactKind::OrderByInput, Some(name), None);
        for field in &entity.fields {
            order_by.add_field(PlannedField {
                name: field.name.clone(),
                ty: PlannedType::Ref(sort_order.clone()),
                nullable: true,
                list: false,
            });
        }
        self.finish(set, naming, order_by)?;

        self.plan_write_input(set, naming, entity, ArtifactKind::CreateInput)?;
        self.plan_write_input(set, naming, entity, ArtifactKind::UpdateInput)?;

        let unchecked = self.config.use_unchecked_scalar_inputs
            && !self.config.simple_resolvers
            && entity.has_unchecked_fields();
        if unchecked {
            self.plan_write_input(set, naming, entity, ArtifactKind::UncheckedCreateInput)?;
            self.plan_write_input(set, naming, entity, ArtifactKind::UncheckedUpdateInput)?;
        }
        Ok(())
    }

    /// Create/Update inputs in both checked and unchecked shapes.
    ///
    /// The checked shape hides foreign-key scalars behind connect-style
    /// relation fields; the unchecked shape substitutes the raw scalars for
    /// those relation fields. Inverse relations appear in neither, so the
    /// two stay structurally consistent.
    fn plan_write_input(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
        kind: ArtifactKind,
    ) -> Result<(), GeneratorError> {
        let unchecked = matches!(
            kind,
            ArtifactKind::UncheckedCreateInput | ArtifactKind::UncheckedUpdateInput
        );
        let update = matches!(
            kind,
            ArtifactKind::UpdateInput | ArtifactKind::UncheckedUpdateInput
        );

        let mut input = Artifact::new(kind, Some(&entity.name), None);
        for field in &entity.fields {
            if field.is_id {
                continue;
            }
            if !unchecked && field.unchecked_eligible {
                continue;
            }
            input.add_field(PlannedField {
                name: field.name.clone(),
                ty: self.value_type(naming, &field.kind),
                nullable: update || field.nullable,
                list: field.is_list,
            });
        }
        if !unchecked {
            for relation in entity.relations.iter().filter(|r| !r.is_inverse) {
                input.add_field(PlannedField {
                    name: relation.name.clone(),
                    ty: PlannedType::Ref(self.input_symbol(
                        naming,
                        &relation.target,
                        ArtifactKind::WhereUniqueInput,
                    )),
                    nullable: update || relation.nullable,
                    list: false,
                });
            }
        }
        self.finish(set, naming, input)
    }

    fn plan_crud_args(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
        op: CrudOperation,
    ) -> Result<(), GeneratorError> {
        let name = entity.name.as_str();
        let where_input = self.input_symbol(naming, name, ArtifactKind::WhereInput);
        let where_unique = self.input_symbol(naming, name, ArtifactKind::WhereUniqueInput);
        let order_by = self.input_symbol(naming, name, ArtifactKind::OrderByInput);
        let create_input = self.input_symbol(naming, name, ArtifactKind::CreateInput);
        let update_input = self.input_symbol(naming, name, ArtifactKind::UpdateInput);
        let scalar_field_enum = naming
            .name_for(&ArtifactKind::ScalarFieldEnum, Some(name), None)
            .symbol;

        let mut args = Artifact::new(ArtifactKind::CrudArgs(op), Some(name), None);

        let required_ref = |args: &mut Artifact, field: &str, symbol: &str| {
            args.add_field(PlannedField {
                name: field.to_string(),
                ty: PlannedType::Ref(symbol.to_string()),
                nullable: false,
                list: false,
            });
        };
        let browse_fields = |args: &mut Artifact| {
            args.add_field(PlannedField {
                name: "where".to_string(),
                ty: PlannedType::Ref(where_input.clone()),
                nullable: true,
                list: false,
            });
            args.add_field(PlannedField {
                name: "orderBy".to_string(),
                ty: PlannedType::Ref(order_by.clone()),
                nullable: true,
                list: true,
            });
            args.add_field(PlannedField {
                name: "cursor".to_string(),
                ty: PlannedType::Ref(where_unique.clone()),
                nullable: true,
                list: false,
            });
            args.add_field(PlannedField {
                name: "take".to_string(),
                ty: PlannedType::Primitive("Int"),
                nullable: true,
                list: false,
            });
            args.add_field(PlannedField {
                name: "skip".to_string(),
                ty: PlannedType::Primitive("Int"),
                nullable: true,
                list: false,
            });
        };

        match op {
            CrudOperation::FindUnique | CrudOperation::Delete => {
                required_ref(&mut args, "where", &where_unique);
            }
            CrudOperation::FindMany => {
                browse_fields(&mut args);
                args.add_field(PlannedField {
                    name: "distinct".to_string(),
                    ty: PlannedType::Ref(scalar_field_enum.clone()),
                    nullable: true,
                    list: true,
                });
            }
            CrudOperation::Create => {
                required_ref(&mut args, "data", &create_input);
                if self.wants_unchecked(entity) {
                    args.add_ref(Reference::Artifact(self.input_symbol(
                        naming,
                        name,
                        ArtifactKind::UncheckedCreateInput,
                    )));
                }
            }
            CrudOperation::CreateMany => {
                args.add_field(PlannedField {
                    name: "data".to_string(),
                    ty: PlannedType::Ref(create_input.clone()),
                    nullable: false,
                    list: true,
                });
                args.add_field(PlannedField {
                    name: "skipDuplicates".to_string(),
                    ty: PlannedType::Primitive("Boolean"),
                    nullable: true,
                    list: false,
                });
            }
            CrudOperation::Update => {
                required_ref(&mut args, "data", &update_input);
                required_ref(&mut args, "where", &where_unique);
                if self.wants_unchecked(entity) {
                    args.add_ref(Reference::Artifact(self.input_symbol(
                        naming,
                        name,
                        ArtifactKind::UncheckedUpdateInput,
                    )));
                }
            }
            CrudOperation::UpdateMany => {
                required_ref(&mut args, "data", &update_input);
                args.add_field(PlannedField {
                    name: "where".to_string(),
                    ty: PlannedType::Ref(where_input.clone()),
                    nullable: true,
                    list: false,
                });
            }
            CrudOperation::Upsert => {
                required_ref(&mut args, "where", &where_unique);
                required_ref(&mut args, "create", &create_input);
                required_ref(&mut args, "update", &update_input);
            }
            CrudOperation::DeleteMany => {
                args.add_field(PlannedField {
                    name: "where".to_string(),
                    ty: PlannedType::Ref(where_input.clone()),
                    nullable: true,
                    list: false,
                });
            }
            CrudOperation::Aggregate => {
                browse_fields(&mut args);
            }
            CrudOperation::GroupBy => {
                browse_fields(&mut args);
                args.add_field(PlannedField {
                    name: "by".to_string(),
                    ty: PlannedType::Ref(scalar_field_enum.clone()),
                    nullable: false,
                    list: true,
                });
            }
        }

        self.finish(set, naming, args)
    }

    fn wants_unchecked(&self, entity: &Entity) -> bool {
        self.config.use_unchecked_scalar_inputs
            && !self.config.simple_resolvers
            && entity.has_unchecked_fields()
    }

    fn plan_crud_resolver(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        entity: &Entity,
        op: CrudOperation,
    ) -> Result<(), GeneratorError> {
        let name = entity.name.as_str();
        let model = self.model_symbol(naming, name);
        let args_symbol = naming
            .name_for(&ArtifactKind::CrudArgs(op), Some(name), None)
            .symbol;

        let returns = if op.returns_affected_rows() {
            PlannedType::Ref("AffectedRowsOutput".to_string())
        } else if op == CrudOperation::Aggregate {
            PlannedType::Ref(
                naming
                    .name_for(&ArtifactKind::AggregateOutput, Some(name), None)
                    .symbol,
            )
        } else {
            PlannedType::Ref(model.clone())
        };

        let mut resolver = Artifact::new(ArtifactKind::CrudResolver(op), Some(name), None);
        resolver.add_ref(Reference::Artifact(model.clone()));
        resolver.add_ref(Reference::Artifact(args_symbol.clone()));
        if let PlannedType::Ref(symbol) = &returns {
            resolver.add_ref(Reference::Artifact(symbol.clone()));
        }

        resolver.capabilities.push(if op.is_mutation() {
            CapabilityTag::ExposedAsMutation
        } else {
            CapabilityTag::ExposedAsQuery
        });
        if op.nullable_result() {
            resolver.capabilities.push(CapabilityTag::NullableResult);
        }
        if op.list_result() {
            resolver.capabilities.push(CapabilityTag::ListResult);
        }

        resolver.methods.push(PlannedMethod {
            name: naming.operation_name(op, name),
            returns,
            nullable: op.nullable_result(),
            list: op.list_result(),
            args_symbol: Some(args_symbol),
            mutation: op.is_mutation(),
            data_access: DataAccess {
                entity: to_camel_case(name),
                operation: op.action_name().to_string(),
            },
            root_key: None,
        });

        self.finish(set, naming, resolver)
    }

    /// One relations resolver per entity owning relations, plus one args
    /// artifact per relation. Many-relations get the full browse argument
    /// set scoped to the target entity; to-one relations take a bare filter.
    fn plan_relations(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
        graph: &ModelGraph,
        entity: &Entity,
    ) -> Result<(), GeneratorError> {
        if entity.relations.is_empty() {
            return Ok(());
        }

        let name = entity.name.as_str();
        let root_key = entity
            .fields
            .iter()
            .find(|f| f.is_id)
            .map(|f| f.name.clone());

        let mut resolver = Artifact::new(ArtifactKind::RelationsResolver, Some(name), None);
        resolver.add_ref(Reference::Artifact(self.model_symbol(naming, name)));

        for relation in &entity.relations {
            let target = graph.entity(&relation.target).ok_or_else(|| {
                GeneratorError::UnresolvedRelation {
                    entity: name.to_string(),
                    relation: relation.name.clone(),
                    target: relation.target.clone(),
                }
            })?;

            let args_name =
                naming.name_for(&ArtifactKind::RelationArgs, Some(name), Some(&relation.name));
            let mut args =
                Artifact::new(ArtifactKind::RelationArgs, Some(name), Some(&relation.name));

            let target_where =
                self.input_symbol(naming, &target.name, ArtifactKind::WhereInput);
            args.add_field(PlannedField {
                name: "where".to_string(),
                ty: PlannedType::Ref(target_where),
                nullable: true,
                list: false,
            });
            if relation.cardinality == Cardinality::Many {
                args.add_field(PlannedField {
                    name: "orderBy".to_string(),
                    ty: PlannedType::Ref(self.input_symbol(
                        naming,
                        &target.name,
                        ArtifactKind::OrderByInput,
                    )),
                    nullable: true,
                    list: true,
                });
                args.add_field(PlannedField {
                    name: "cursor".to_string(),
                    ty: PlannedType::Ref(self.input_symbol(
                        naming,
                        &target.name,
                        ArtifactKind::WhereUniqueInput,
                    )),
                    nullable: true,
                    list: false,
                });
                args.add_field(PlannedField {
                    name: "take".to_string(),
                    ty: PlannedType::Primitive("Int"),
                    nullable: true,
                    list: false,
                });
                args.add_field(PlannedField {
                    name: "skip".to_string(),
                    ty: PlannedType::Primitive("Int"),
                    nullable: true,
                    list: false,
                });
                // Distinct selection is restricted to the target entity's
                // own scalar fields.
                args.add_field(PlannedField {
                    name: "distinct".to_string(),
                    ty: PlannedType::Ref(
                        naming
                            .name_for(&ArtifactKind::ScalarFieldEnum, Some(&target.name), None)
                            .symbol,
                    ),
                    nullable: true,
                    list: true,
                });
            }
            self.finish(set, naming, args)?;

            let many = relation.cardinality == Cardinality::Many;
            resolver.add_ref(Reference::Artifact(
                self.model_symbol(naming, &target.name),
            ));
            resolver.add_ref(Reference::Artifact(args_name.symbol.clone()));
            resolver.methods.push(PlannedMethod {
                name: relation.name.clone(),
                returns: PlannedType::Ref(self.model_symbol(naming, &target.name)),
                nullable: relation.nullable,
                list: many,
                args_symbol: Some(args_name.symbol),
                mutation: false,
                data_access: DataAccess {
                    entity: to_camel_case(name),
                    operation: relation.name.clone(),
                },
                root_key: root_key.clone(),
            });
        }

        self.finish(set, naming, resolver)
    }

    fn plan_index(
        &self,
        set: &mut ArtifactSet,
        naming: &mut NamingStrategy,
    ) -> Result<(), GeneratorError> {
        let mut index = Artifact::new(ArtifactKind::Index, None, None);
        let resolvers: Vec<String> = set
            .artifacts
            .iter()
            .filter(|a| a.kind.is_resolver())
            .map(|a| a.symbol.clone())
            .collect();
        for symbol in resolvers {
            index.add_ref(Reference::Artifact(symbol));
        }
        self.finish(set, naming, index)
    }
}

/// Per-entity plan summary used by `check` runs and logging.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub artifacts: usize,
    pub resolvers: usize,
    pub relation_args: usize,
}

impl PlanSummary {
    pub fn of(set: &ArtifactSet) -> Self {
        Self {
            artifacts: set.artifacts().len(),
            resolvers: set
                .artifacts()
                .iter()
                .filter(|a| a.kind.is_resolver())
                .count(),
            relation_args: set
                .artifacts()
                .iter()
                .filter(|a| a.kind == ArtifactKind::RelationArgs)
                .count(),
        }
    }
}
