//! Generator configuration.
//!
//! The config can arrive two ways: a YAML document (the normal CLI path) or
//! the flat string map some hosts hand over, where nested keys are flattened
//! with `_` (`customScalar_DateTime_graphql_importName=...`) and booleans
//! are the strings `"true"` / `"false"`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Emit the raw model documents as diagnostic JSON files.
    #[serde(rename = "emitDMMF")]
    pub emit_dmmf: bool,
    /// Tag emitted descriptors for host-side transpilation alongside the
    /// source form.
    pub emit_transpiled_code: bool,
    /// Restrict the emitted capability set: no relation resolvers, no
    /// relation args, no unchecked input variants.
    pub simple_resolvers: bool,
    /// Mirror the source model's own operation names instead of the
    /// normalized readable ones.
    pub use_original_mapping: bool,
    /// Emit unchecked input variants exposing raw foreign-key scalars.
    pub use_unchecked_scalar_inputs: bool,
    /// Seed the scalar table with the built-in binding list.
    pub use_default_custom_scalars: bool,
    /// Per-scalar representation overrides, keyed by scalar name.
    pub custom_scalar: HashMap<String, CustomScalarOptions>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            emit_dmmf: false,
            emit_transpiled_code: false,
            simple_resolvers: false,
            use_original_mapping: false,
            use_unchecked_scalar_inputs: false,
            use_default_custom_scalars: true,
            custom_scalar: HashMap::new(),
        }
    }
}

/// One scalar override as configured. Validation (both `import_name` and
/// `module` present) happens when the scalar table is built, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomScalarOptions {
    /// How the scalar is exposed in the generated schema.
    pub graphql: Option<BindingOptions>,
    /// Optionally, how the property itself is declared.
    pub field: Option<BindingOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindingOptions {
    pub import_name: Option<String>,
    pub module: Option<String>,
}

impl GeneratorConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, GeneratorError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build a config from a flat host-supplied string map.
    ///
    /// Unrecognized keys are ignored; malformed `customScalar_` keys (fewer
    /// than four segments) are ignored as well, consistent with the lenient
    /// handling of incomplete overrides.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_string_boolean(raw.get("emitDMMF")) {
            config.emit_dmmf = v;
        }
        if let Some(v) = parse_string_boolean(raw.get("emitTranspiledCode")) {
            config.emit_transpiled_code = v;
        }
        if let Some(v) = parse_string_boolean(raw.get("simpleResolvers")) {
            config.simple_resolvers = v;
        }
        if let Some(v) = parse_string_boolean(raw.get("useOriginalMapping")) {
            config.use_original_mapping = v;
        }
        if let Some(v) = parse_string_boolean(raw.get("useUncheckedScalarInputs")) {
            config.use_unchecked_scalar_inputs = v;
        }
        if let Some(v) = parse_string_boolean(raw.get("useDefaultCustomScalars")) {
            config.use_default_custom_scalars = v;
        }

        for (key, value) in raw {
            let Some(rest) = key.strip_prefix("customScalar_") else {
                continue;
            };
            // customScalar_<Name>_<section>_<field>
            let parts: Vec<&str> = rest.splitn(3, '_').collect();
            let [name, section, field] = parts.as_slice() else {
                continue;
            };
            let entry = config.custom_scalar.entry(name.to_string()).or_default();
            let binding = match *section {
                "graphql" => entry.graphql.get_or_insert_with(Default::default),
                "field" => entry.field.get_or_insert_with(Default::default),
                _ => continue,
            };
            match *field {
                "importName" => binding.import_name = Some(value.clone()),
                "module" => binding.module = Some(value.clone()),
                _ => {}
            }
        }

        config
    }
}

fn parse_string_boolean(value: Option<&String>) -> Option<bool> {
    value.map(|v| v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_built_in_scalars() {
        let config = GeneratorConfig::default();
        assert!(config.use_default_custom_scalars);
        assert!(!config.simple_resolvers);
    }

    #[test]
    fn from_raw_parses_string_booleans() {
        let mut raw = HashMap::new();
        raw.insert("emitDMMF".to_string(), "true".to_string());
        raw.insert("useDefaultCustomScalars".to_string(), "false".to_string());
        raw.insert("simpleResolvers".to_string(), "yes".to_string());

        let config = GeneratorConfig::from_raw(&raw);
        assert!(config.emit_dmmf);
        assert!(!config.use_default_custom_scalars);
        // Anything but the literal "true" reads as false.
        assert!(!config.simple_resolvers);
    }

    #[test]
    fn from_raw_unflattens_custom_scalar_keys() {
        let mut raw = HashMap::new();
        raw.insert(
            "customScalar_DateTime_graphql_importName".to_string(),
            "GraphQLISODateTime".to_string(),
        );
        raw.insert(
            "customScalar_DateTime_graphql_module".to_string(),
            "graphql-scalars".to_string(),
        );
        raw.insert("customScalar_bogus".to_string(), "x".to_string());

        let config = GeneratorConfig::from_raw(&raw);
        let dt = config.custom_scalar.get("DateTime").unwrap();
        let graphql = dt.graphql.as_ref().unwrap();
        assert_eq!(graphql.import_name.as_deref(), Some("GraphQLISODateTime"));
        assert_eq!(graphql.module.as_deref(), Some("graphql-scalars"));
        assert!(!config.custom_scalar.contains_key("bogus"));
    }

    #[test]
    fn yaml_round_trip() {
        let yaml = r#"
emitDMMF: true
customScalar:
  DateTime:
    graphql:
      importName: GraphQLISODateTime
      module: graphql-scalars
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert!(config.emit_dmmf);
        assert!(config.custom_scalar.contains_key("DateTime"));
    }
}
