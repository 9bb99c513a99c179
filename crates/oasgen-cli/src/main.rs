use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oasgen_core::analyze::reachable;
use oasgen_core::config::{self, CONFIG_FILE_NAME, OasgenConfig};
use oasgen_core::document::Document;
use oasgen_core::load::load;
use oasgen_core::ir::{IrModel, IrSpec, IrType};
use oasgen_core::source::ArchiveSource;
use oasgen_core::transform::{TransformOptions, build_ir};
use oasgen_sdk::{BatchRequest, Oasgen, run_batch};

#[derive(Parser)]
#[command(
    name = "oasgen",
    about = "OpenAPI 3.x to Java/Jersey service skeleton generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where fragments are read from. Unset flags fall back to `.oasgen.yaml`.
#[derive(Args, Default)]
struct SourceArgs {
    /// Directory searched for fragments not found next to their referrer (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,

    /// Read every fragment from this .zip, .tar or .tar.gz archive
    #[arg(long, value_name = "FILE")]
    archive: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models and executor stubs from an OpenAPI spec
    Generate {
        /// Spec path (an entry path when --archive is given)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Java package for generated sources
        #[arg(short, long)]
        package: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        framework: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Generate every listed spec entry of an archive
    Batch {
        /// Archive holding the specs
        #[arg(long)]
        archive: PathBuf,

        /// Base output directory; each spec gets a subdirectory
        #[arg(short, long, required_unless_present = "list")]
        output: Option<PathBuf>,

        /// Package prefix; each spec gets `<prefix>.<spec name>`
        #[arg(long, default_value = "com.example.generated")]
        package_prefix: String,

        #[arg(long, default_value = "java")]
        language: String,

        #[arg(long, default_value = "jersey")]
        framework: String,

        /// Directory searched for fragments not found next to their referrer (repeatable)
        #[arg(long = "search-path", value_name = "DIR")]
        search_paths: Vec<PathBuf>,

        /// List the spec files in the archive instead of generating
        #[arg(long)]
        list: bool,

        /// Entry paths inside the archive (comma separated lists are accepted)
        #[arg(required_unless_present = "list")]
        entries: Vec<String>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Spec path
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Inspect the models, operations, and executor groups of a spec
    Inspect {
        /// Spec path
        #[arg(short, long)]
        input: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Initialize a new oasgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            package,
            language,
            framework,
            source,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if let Some(input) = input {
                cfg.input = input;
            }
            if let Some(output) = output {
                cfg.output = output.to_string_lossy().into_owned();
            }
            if let Some(package) = package {
                cfg.package = package;
            }
            if let Some(language) = language {
                cfg.target.language = language;
            }
            if let Some(framework) = framework {
                cfg.target.framework = framework;
            }
            apply_source_args(&mut cfg, source);
            cmd_generate(&cfg)
        }

        Commands::Batch {
            archive,
            output,
            package_prefix,
            language,
            framework,
            search_paths,
            list,
            entries,
        } => {
            if list {
                return cmd_list_archive(&archive);
            }
            let output = output.context("--output is required")?;
            let cfg = try_load_config()?.unwrap_or_default();
            let mut request = BatchRequest::new(archive, output);
            request.grouping = cfg.executor_grouping;
            request.package_prefix = package_prefix;
            request.language = language;
            request.framework = framework;
            request.search_paths = search_paths;
            request.entries = entries;
            cmd_batch(&request)
        }

        Commands::Validate { input, source } => cmd_validate(&input, source),

        Commands::Inspect {
            input,
            format,
            source,
        } => cmd_inspect(&input, format, source),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oasgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OasgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let loaded = config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))?;
    if loaded.is_some() {
        log::debug!("using {}", config_path.display());
    }
    Ok(loaded)
}

fn apply_source_args(cfg: &mut OasgenConfig, source: SourceArgs) {
    if !source.search_paths.is_empty() {
        cfg.search_paths = source.search_paths;
    }
    if source.archive.is_some() {
        cfg.spec_archive = source.archive;
    }
}

/// Load a spec for validate/inspect: config defaults, overridden by flags.
fn load_document(input: &str, source: SourceArgs) -> Result<(OasgenConfig, Document)> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    apply_source_args(&mut cfg, source);
    let document = load(input, &cfg.loader_options())
        .with_context(|| format!("failed to load {input}"))?;
    Ok((cfg, document))
}

fn build(cfg: &OasgenConfig, document: &Document) -> Result<IrSpec> {
    let options = TransformOptions {
        grouping: cfg.executor_grouping,
    };
    Ok(build_ir(document, &reachable(document), &options)?)
}

fn cmd_generate(cfg: &OasgenConfig) -> Result<()> {
    let mut sdk = Oasgen::from_config(cfg);
    sdk.load_spec(&cfg.input)
        .with_context(|| format!("failed to load {}", cfg.input))?;

    eprintln!(
        "Generating {}/{} → {}",
        cfg.target.language, cfg.target.framework, cfg.output
    );
    let report = sdk.generate_application(
        &cfg.target.language,
        &cfg.target.framework,
        &cfg.package,
        Path::new(&cfg.output),
    )?;

    eprintln!(
        "Generated {} files ({} models, {} executors) in {}",
        report.files_written,
        report.models,
        report.executors,
        report.output_dir.display()
    );
    Ok(())
}

fn cmd_batch(request: &BatchRequest) -> Result<()> {
    let report = run_batch(request);
    for entry in &report.entries {
        match &entry.result {
            Ok(generated) => eprintln!(
                "Generated: {} -> {}",
                entry.entry,
                generated.output_dir.display()
            ),
            Err(err) => eprintln!("Failed for {}: {err}", entry.entry),
        }
    }
    if report.entries.is_empty() {
        anyhow::bail!("no entry paths provided");
    }
    if report.failed() > 0 {
        anyhow::bail!(
            "{} of {} spec(s) failed",
            report.failed(),
            report.entries.len()
        );
    }
    Ok(())
}

fn cmd_list_archive(archive: &Path) -> Result<()> {
    let source = ArchiveSource::open(archive)
        .with_context(|| format!("failed to open {}", archive.display()))?;
    for name in source.entry_names().filter(|name| is_spec_file(name)) {
        println!("{name}");
    }
    Ok(())
}

fn is_spec_file(name: &str) -> bool {
    [".yaml", ".yml", ".json"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

fn cmd_validate(input: &str, source: SourceArgs) -> Result<()> {
    let (cfg, document) = load_document(input, source)?;

    eprintln!("Valid OpenAPI spec: {}", document.info.title);
    eprintln!("  Version: {}", document.info.version);
    eprintln!("  Fragments: {}", document.fragments.len());
    eprintln!("  Paths: {}", document.paths.len());
    eprintln!("  Schemas: {}", document.components.schemas.len());

    let ir = build(&cfg, &document)?;
    eprintln!("  Operations: {}", ir.operations.len());
    eprintln!("  Models: {}", ir.models.len());
    eprintln!("  Executors: {}", ir.groups.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &str, format: InspectFormat, source: SourceArgs) -> Result<()> {
    let (cfg, document) = load_document(input, source)?;
    let ir = build(&cfg, &document)?;

    let summary = build_inspect_summary(&document.fragments, &ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Compact, language-neutral rendering of a field type.
fn type_label(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "string".to_string(),
        IrType::Integer => "integer".to_string(),
        IrType::Long => "long".to_string(),
        IrType::Float => "float".to_string(),
        IrType::Double => "double".to_string(),
        IrType::Decimal => "decimal".to_string(),
        IrType::Boolean => "boolean".to_string(),
        IrType::Date => "date".to_string(),
        IrType::DateTime => "date-time".to_string(),
        IrType::Binary => "binary".to_string(),
        IrType::Any => "any".to_string(),
        IrType::Enum { base, values } => format!("{}({})", type_label(base), values.join("|")),
        IrType::Ref(name) => name.clone(),
        IrType::List(inner) => format!("list<{}>", type_label(inner)),
        IrType::Map(values) => format!("map<{}>", type_label(values)),
    }
}

fn build_inspect_summary(fragments: &[String], ir: &IrSpec) -> serde_json::Value {
    let models: Vec<serde_json::Value> = ir
        .models
        .iter()
        .map(|model| match model {
            IrModel::Object(object) => serde_json::json!({
                "name": object.name.pascal_case,
                "kind": "object",
                "description": model.description(),
                "fields": object
                    .fields
                    .iter()
                    .map(|f| serde_json::json!({
                        "name": f.original_name,
                        "type": type_label(&f.field_type),
                        "required": f.required,
                    }))
                    .collect::<Vec<_>>(),
            }),
            IrModel::Container(container) => serde_json::json!({
                "name": container.name.pascal_case,
                "kind": "container",
                "description": model.description(),
                "item": container.item.pascal_case,
            }),
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name.camel_case,
                "method": op.method.as_str(),
                "path": op.path,
                "returns": op.response.as_ref().map(|r| type_label(&r.response_type)),
                "tags": op.tags,
            })
        })
        .collect();

    let executors: Vec<serde_json::Value> = ir
        .groups
        .iter()
        .map(|group| {
            serde_json::json!({
                "name": format!("{}BOExecutor", group.name.pascal_case),
                "operations": group
                    .operation_indices
                    .iter()
                    .filter_map(|&i| ir.operations.get(i))
                    .map(|op| op.name.camel_case.clone())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "fragments": fragments,
        "models": models,
        "operations": operations,
        "executors": executors,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "oasgen",
            "generate",
            "-i",
            "published/core/v4/api.yaml",
            "--search-path",
            "../common",
            "--search-path",
            "/opt/specs",
            "--archive",
            "bundle.tar.gz",
        ])
        .unwrap();
        let Commands::Generate { input, source, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(input.as_deref(), Some("published/core/v4/api.yaml"));
        assert_eq!(source.search_paths.len(), 2);
        assert_eq!(source.archive, Some(PathBuf::from("bundle.tar.gz")));
    }

    #[test]
    fn test_batch_requires_entries_unless_listing() {
        assert!(Cli::try_parse_from(["oasgen", "batch", "--archive", "a.tar", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from(["oasgen", "batch", "--archive", "a.tar", "--list"]).is_ok());
        assert!(Cli::try_parse_from(["oasgen", "batch", "--archive", "a.tar", "-o", "out", "api.yaml"]).is_ok());
    }

    #[test]
    fn test_inspect_summary_lists_models() {
        use oasgen_core::ir::{IrContainerModel, IrField, IrInfo, IrObjectModel};
        use oasgen_core::transform::name_normalizer::normalize_name;

        let ir = IrSpec {
            info: IrInfo {
                title: "Articles".into(),
                description: None,
                version: "4.0".into(),
            },
            models: vec![
                IrModel::Object(IrObjectModel {
                    name: normalize_name("ArticleTypeInfo"),
                    description: Some("One article type.".into()),
                    fields: vec![IrField {
                        name: normalize_name("id"),
                        original_name: "id".into(),
                        field_type: IrType::Long,
                        required: true,
                        description: None,
                    }],
                }),
                IrModel::Container(IrContainerModel {
                    name: normalize_name("ArticleTypes"),
                    description: None,
                    item: normalize_name("ArticleTypeInfo"),
                    min_items: None,
                    max_items: Some(250),
                }),
            ],
            operations: Vec::new(),
            groups: Vec::new(),
        };

        let summary = build_inspect_summary(&["/specs/api.yaml".to_string()], &ir);
        assert_eq!(summary["info"]["version"], "4.0");
        assert_eq!(summary["fragments"][0], "/specs/api.yaml");
        assert_eq!(summary["models"][0]["description"], "One article type.");
        assert_eq!(summary["models"][0]["fields"][0]["type"], "long");
        assert_eq!(summary["models"][1]["kind"], "container");
        assert_eq!(summary["models"][1]["item"], "ArticleTypeInfo");
        assert!(summary["models"][1]["description"].is_null());
    }

    #[test]
    fn test_type_label() {
        let ty = IrType::Map(Box::new(IrType::List(Box::new(IrType::Ref("Item".into())))));
        assert_eq!(type_label(&ty), "map<list<Item>>");
        let status = IrType::Enum {
            base: Box::new(IrType::String),
            values: vec!["draft".into(), "published".into()],
        };
        assert_eq!(type_label(&status), "string(draft|published)");
    }

    #[test]
    fn test_source_args_override_config() {
        let mut cfg = OasgenConfig::default();
        cfg.search_paths = vec![PathBuf::from("from-config")];
        apply_source_args(&mut cfg, SourceArgs::default());
        assert_eq!(cfg.search_paths, vec![PathBuf::from("from-config")]);

        apply_source_args(
            &mut cfg,
            SourceArgs {
                search_paths: vec![PathBuf::from("from-flag")],
                archive: Some(PathBuf::from("specs.tar")),
            },
        );
        assert_eq!(cfg.search_paths, vec![PathBuf::from("from-flag")]);
        assert_eq!(cfg.spec_archive, Some(PathBuf::from("specs.tar")));
    }
}
