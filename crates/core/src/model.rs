//! The in-memory model graph.
//!
//! [`ModelGraph::load`] normalizes the raw DMMF document into an immutable
//! object graph: entities with value fields and paired relations, plus a
//! deduplicated enum list. Everything downstream (planning, linking,
//! emission) reads this graph and never the raw document.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dmmf::{DmmfDocument, DmmfField, DmmfFieldKind, DmmfModel};
use crate::error::GeneratorError;

/// Closed set of value classifications a field can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    Bytes,
    Json,
    Decimal,
    BigInt,
    /// Reference to a model-level enum by name.
    Enum(String),
}

impl ScalarKind {
    fn parse(field: &DmmfField) -> Result<Self, GeneratorError> {
        if field.kind == DmmfFieldKind::Enum {
            return Ok(Self::Enum(field.type_name.clone()));
        }
        match field.type_name.as_str() {
            "String" => Ok(Self::String),
            "Int" => Ok(Self::Int),
            "Float" => Ok(Self::Float),
            "Boolean" => Ok(Self::Boolean),
            "DateTime" => Ok(Self::DateTime),
            "Bytes" => Ok(Self::Bytes),
            "Json" => Ok(Self::Json),
            "Decimal" => Ok(Self::Decimal),
            "BigInt" => Ok(Self::BigInt),
            other => Err(GeneratorError::malformed(format!(
                "field `{}` has unknown scalar type `{other}`",
                field.name
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub kind: ScalarKind,
    pub nullable: bool,
    pub is_list: bool,
    pub is_id: bool,
    pub is_unique: bool,
    /// Whether this scalar stores a relation's foreign key and may therefore
    /// appear in unchecked input variants.
    pub unchecked_eligible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone)]
pub struct Relation {
    /// Field name on the source entity, e.g. `likedBy`.
    pub name: String,
    /// Token shared with the reciprocal relation on the target entity.
    pub pair_name: Option<String>,
    pub source: String,
    pub target: String,
    pub cardinality: Cardinality,
    /// Only meaningful for one-cardinality relations.
    pub nullable: bool,
    /// The side that does not hold the foreign key.
    pub is_inverse: bool,
    /// Scalar fields on the source entity storing the foreign key.
    pub fk_fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
    pub relations: Vec<Relation>,
    pub unique_groups: Vec<Vec<String>>,
}

impl Entity {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Scalar (and enum) fields in declaration order.
    pub fn scalar_field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn has_unchecked_fields(&self) -> bool {
        self.fields.iter().any(|f| f.unchecked_eligible)
    }
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModelGraph {
    entities: Vec<Entity>,
    enums: Vec<EnumDef>,
}

impl ModelGraph {
    /// Normalize the raw document into the model graph.
    ///
    /// Fails with [`GeneratorError::MalformedModel`] when a relation names an
    /// unknown target entity, a relation is missing its reciprocal
    /// declaration, or an enum is declared twice with divergent values.
    pub fn load(doc: &DmmfDocument) -> Result<Self, GeneratorError> {
        let model_names: HashSet<&str> = doc
            .datamodel
            .models
            .iter()
            .map(|m| m.name.as_str())
            .collect();

        if model_names.len() != doc.datamodel.models.len() {
            return Err(GeneratorError::malformed(
                "duplicate entity name in model".to_string(),
            ));
        }

        let enums = Self::load_enums(doc)?;
        let enum_names: HashSet<&str> = enums.iter().map(|e| e.name.as_str()).collect();

        let mut entities = Vec::with_capacity(doc.datamodel.models.len());
        for model in &doc.datamodel.models {
            entities.push(Self::load_entity(model, &model_names, &enum_names)?);
        }

        let graph = Self { entities, enums };
        graph.check_reciprocals()?;

        tracing::debug!(
            entities = graph.entities.len(),
            enums = graph.enums.len(),
            "model graph loaded"
        );

        Ok(graph)
    }

    fn load_enums(doc: &DmmfDocument) -> Result<Vec<EnumDef>, GeneratorError> {
        let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut order = Vec::new();
        for e in &doc.datamodel.enums {
            // Repeated values inside one declaration collapse to the first.
            let mut values = Vec::new();
            for v in &e.values {
                if !values.contains(v) {
                    values.push(v.clone());
                }
            }
            match seen.get(&e.name) {
                None => {
                    order.push(e.name.clone());
                    seen.insert(e.name.clone(), values);
                }
                Some(existing) if *existing == values => {}
                Some(_) => {
                    return Err(GeneratorError::malformed(format!(
                        "enum `{}` declared twice with divergent value sets",
                        e.name
                    )));
                }
            }
        }
        Ok(order
            .into_iter()
            .map(|name| {
                let values = seen.remove(&name).unwrap_or_default();
                EnumDef { name, values }
            })
            .collect())
    }

    fn load_entity(
        model: &DmmfModel,
        model_names: &HashSet<&str>,
        enum_names: &HashSet<&str>,
    ) -> Result<Entity, GeneratorError> {
        // Every scalar named by some relation's foreign-key list is eligible
        // for unchecked input variants.
        let fk_fields: HashSet<&str> = model
            .fields
            .iter()
            .filter(|f| f.kind == DmmfFieldKind::Object)
            .flat_map(|f| f.relation_from_fields.iter().map(String::as_str))
            .collect();

        let mut fields = Vec::new();
        let mut relations = Vec::new();

        for field in &model.fields {
            match field.kind {
                DmmfFieldKind::Scalar | DmmfFieldKind::Enum => {
                    let kind = ScalarKind::parse(field)?;
                    if let ScalarKind::Enum(ref enum_name) = kind {
                        if !enum_names.contains(enum_name.as_str()) {
                            return Err(GeneratorError::malformed(format!(
                                "field `{}.{}` references unknown enum `{enum_name}`",
                                model.name, field.name
                            )));
                        }
                    }
                    fields.push(Field {
                        name: field.name.clone(),
                        kind,
                        nullable: !field.is_required,
                        is_list: field.is_list,
                        is_id: field.is_id,
                        is_unique: field.is_unique,
                        unchecked_eligible: fk_fields.contains(field.name.as_str()),
                    });
                }
                DmmfFieldKind::Object => {
                    if !model_names.contains(field.type_name.as_str()) {
                        return Err(GeneratorError::malformed(format!(
                            "relation `{}.{}` has no resolvable target entity `{}`",
                            model.name, field.name, field.type_name
                        )));
                    }
                    relations.push(Relation {
                        name: field.name.clone(),
                        pair_name: field.relation_name.clone(),
                        source: model.name.clone(),
                        target: field.type_name.clone(),
                        cardinality: if field.is_list {
                            Cardinality::Many
                        } else {
                            Cardinality::One
                        },
                        nullable: !field.is_list && !field.is_required,
                        is_inverse: field.relation_from_fields.is_empty(),
                        fk_fields: field.relation_from_fields.clone(),
                    });
                }
            }
        }

        Ok(Entity {
            name: model.name.clone(),
            fields,
            relations,
            unique_groups: model.unique_fields.clone(),
        })
    }

    /// Every relation must pair with exactly one reciprocal relation on the
    /// target entity: same pair token (or, when unnamed, a relation of any
    /// name pointing back at the source).
    fn check_reciprocals(&self) -> Result<(), GeneratorError> {
        let by_name: HashMap<&str, &Entity> =
            self.entities.iter().map(|e| (e.name.as_str(), e)).collect();

        for entity in &self.entities {
            for rel in &entity.relations {
                let target = by_name.get(rel.target.as_str()).ok_or_else(|| {
                    GeneratorError::malformed(format!(
                        "relation `{}.{}` has no resolvable target entity `{}`",
                        entity.name, rel.name, rel.target
                    ))
                })?;

                let reciprocal = target.relations.iter().any(|back| {
                    back.target == entity.name
                        && match (&rel.pair_name, &back.pair_name) {
                            (Some(a), Some(b)) => a == b,
                            (None, None) => true,
                            _ => false,
                        }
                        && !(entity.name == target.name && back.name == rel.name)
                });
                // A self-relation pairs with a second relation field on the
                // same entity, never with itself.
                if !reciprocal {
                    return Err(GeneratorError::malformed(format!(
                        "relation `{}.{}` (pair `{}`) has no reciprocal declaration on `{}`",
                        entity.name,
                        rel.name,
                        rel.pair_name.as_deref().unwrap_or("<unnamed>"),
                        rel.target
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }
}
