//! Scalar resolution table.
//!
//! Maps every scalar kind the model can use onto the representation it gets
//! in generated code: an import from a scalar library, or a built-in
//! primitive of the target language when nothing is configured. The built-in
//! default list is process-wide immutable data, merged with user overrides
//! at table build time.

use std::collections::{BTreeMap, HashMap};

use crate::config::CustomScalarOptions;
use crate::model::ScalarKind;

pub const GRAPHQL_SCALARS_MODULE: &str = "graphql-scalars";

/// Well-known scalar names bound to `graphql-scalars` by default.
pub const DEFAULT_SCALAR_NAMES: &[&str] = &[
    "Date",
    "Time",
    "DateTime",
    "Duration",
    "UtcOffset",
    "LocalDate",
    "LocalTime",
    "LocalEndTime",
    "EmailAddress",
    "NegativeFloat",
    "NegativeInt",
    "NonEmptyString",
    "NonNegativeFloat",
    "NonNegativeInt",
    "NonPositiveFloat",
    "NonPositiveInt",
    "PhoneNumber",
    "PositiveFloat",
    "PositiveInt",
    "PostalCode",
    "UnsignedFloat",
    "UnsignedInt",
    "URL",
    "ObjectID",
    "BigInt",
    "Long",
    "SafeInt",
    "UUID",
    "GUID",
    "HexColorCode",
    "HSL",
    "HSLA",
    "IPv4",
    "IPv6",
    "ISBN",
    "MAC",
    "Port",
    "RGB",
    "RGBA",
    "USCurrency",
    "Currency",
    "JSON",
    "JSONObject",
    "Byte",
    "Void",
];

/// A concrete representation: import `import_name` from `module`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarBinding {
    pub import_name: String,
    pub module: String,
}

/// A fully validated table entry: how the scalar is exposed, and optionally
/// a distinct descriptor for how the property is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarEntry {
    pub graphql: ScalarBinding,
    pub field: Option<ScalarBinding>,
}

/// The resolved representation of one scalar kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedScalar {
    /// Imported from a scalar library.
    Custom(ScalarEntry),
    /// Built-in primitive of the target language; no import required.
    Primitive(&'static str),
}

impl ResolvedScalar {
    /// The expression naming the exposed type in generated code.
    pub fn graphql_name(&self) -> &str {
        match self {
            Self::Custom(entry) => &entry.graphql.import_name,
            Self::Primitive(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScalarTable {
    bindings: BTreeMap<String, ScalarEntry>,
}

impl ScalarTable {
    /// Merge the built-in defaults (when `use_defaults`) with user overrides.
    ///
    /// An override is accepted only when its `graphql` descriptor names both
    /// an import name and a module; anything less is dropped silently —
    /// "not configured", not an error. Valid overrides shadow defaults for
    /// the same scalar name.
    pub fn build(
        overrides: &HashMap<String, CustomScalarOptions>,
        use_defaults: bool,
    ) -> Self {
        let mut bindings = BTreeMap::new();

        if use_defaults {
            for name in DEFAULT_SCALAR_NAMES {
                bindings.insert(
                    (*name).to_string(),
                    ScalarEntry {
                        graphql: ScalarBinding {
                            import_name: (*name).to_string(),
                            module: GRAPHQL_SCALARS_MODULE.to_string(),
                        },
                        field: None,
                    },
                );
            }
        }

        for (name, options) in overrides {
            let Some(entry) = validate_override(options) else {
                tracing::warn!(scalar = %name, "dropping incomplete custom scalar override");
                continue;
            };
            bindings.insert(name.clone(), entry);
        }

        Self { bindings }
    }

    /// Look up a configured binding by scalar name.
    pub fn get(&self, name: &str) -> Option<&ScalarEntry> {
        self.bindings.get(name)
    }

    /// The scalar name under which a model scalar kind is looked up.
    pub fn lookup_name(kind: &ScalarKind) -> Option<&'static str> {
        match kind {
            ScalarKind::DateTime => Some("DateTime"),
            ScalarKind::Json => Some("JSON"),
            ScalarKind::Bytes => Some("Byte"),
            ScalarKind::BigInt => Some("BigInt"),
            ScalarKind::Decimal => Some("Decimal"),
            _ => None,
        }
    }

    /// Resolve a model scalar kind. Never fails: kinds with no configured
    /// binding fall back to the narrowest built-in primitive.
    pub fn resolve(&self, kind: &ScalarKind) -> ResolvedScalar {
        if let Some(name) = Self::lookup_name(kind) {
            if let Some(entry) = self.bindings.get(name) {
                return ResolvedScalar::Custom(entry.clone());
            }
        }
        ResolvedScalar::Primitive(primitive_fallback(kind))
    }
}

fn validate_override(options: &CustomScalarOptions) -> Option<ScalarEntry> {
    let graphql = options.graphql.as_ref()?;
    let entry = ScalarBinding {
        import_name: graphql.import_name.clone()?,
        module: graphql.module.clone()?,
    };
    let field = options.field.as_ref().and_then(|f| {
        Some(ScalarBinding {
            import_name: f.import_name.clone()?,
            module: f.module.clone()?,
        })
    });
    Some(ScalarEntry {
        graphql: entry,
        field,
    })
}

/// Narrowest applicable built-in primitive for an unbound scalar kind.
fn primitive_fallback(kind: &ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String | ScalarKind::Bytes | ScalarKind::Json => "String",
        ScalarKind::Int => "Int",
        ScalarKind::Float | ScalarKind::Decimal | ScalarKind::BigInt => "Float",
        ScalarKind::Boolean => "Boolean",
        ScalarKind::DateTime => "Date",
        // Enum kinds resolve through enum artifacts, not the scalar table;
        // exposing the raw value as text is the conservative answer.
        ScalarKind::Enum(_) => "String",
    }
}
