use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typegql_codegen::CodeGenerator;
use typegql_core::{DmmfDocument, GeneratorConfig};

#[derive(Parser)]
#[command(name = "typegql")]
#[command(about = "Generate a typed GraphQL CRUD layer from a declarative data model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full resolver/type tree into an output directory
    Generate {
        /// Path to the model document (DMMF JSON)
        #[arg(long)]
        schema: PathBuf,

        /// Output directory; cleared and recreated on every run
        #[arg(long)]
        out: PathBuf,

        /// Generator configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Optional alternate model document used for diagnostics
        #[arg(long)]
        alternate_schema: Option<PathBuf>,

        /// Emit the raw model documents as diagnostic JSON
        #[arg(long)]
        emit_dmmf: bool,

        /// Restrict the emitted capability set (no relation resolvers)
        #[arg(long)]
        simple_resolvers: bool,

        /// Mirror the source model's operation names exactly
        #[arg(long)]
        use_original_mapping: bool,

        /// Emit unchecked input variants exposing raw foreign keys
        #[arg(long)]
        use_unchecked_scalar_inputs: bool,
    },

    /// Validate the model and report the plan without writing anything
    Check {
        /// Path to the model document (DMMF JSON)
        #[arg(long)]
        schema: PathBuf,

        /// Generator configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            schema,
            out,
            config,
            alternate_schema,
            emit_dmmf,
            simple_resolvers,
            use_original_mapping,
            use_unchecked_scalar_inputs,
        } => {
            let mut config = load_config(config.as_deref())?;
            // Flags layer on top of the config file.
            config.emit_dmmf |= emit_dmmf;
            config.simple_resolvers |= simple_resolvers;
            config.use_original_mapping |= use_original_mapping;
            config.use_unchecked_scalar_inputs |= use_unchecked_scalar_inputs;

            let document = load_document(&schema)?;
            let alternate = alternate_schema
                .map(|path| -> anyhow::Result<serde_json::Value> {
                    let raw = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    Ok(serde_json::from_str(&raw)?)
                })
                .transpose()?;

            let files = CodeGenerator::new(config)
                .generate(&document, alternate.as_ref(), &out)
                .context("generation failed")?;
            println!("Generated {} files into {}", files.len(), out.display());
        }
        Commands::Check { schema, config } => {
            let config = load_config(config.as_deref())?;
            let document = load_document(&schema)?;
            let summary = CodeGenerator::new(config)
                .check(&document)
                .context("model check failed")?;
            println!(
                "Model OK: {} artifacts planned ({} resolvers, {} relation argument types)",
                summary.artifacts, summary.resolvers, summary.relation_args
            );
        }
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<GeneratorConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Ok(GeneratorConfig::from_yaml(&raw)?)
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn load_document(path: &std::path::Path) -> anyhow::Result<DmmfDocument> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading schema {}", path.display()))?;
    DmmfDocument::from_json(&raw).with_context(|| format!("parsing schema {}", path.display()))
}
