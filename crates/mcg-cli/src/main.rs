use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use mcg_core::config::{self, CONFIG_FILE_NAME, GeneratorKind, McgConfig};
use mcg_core::fetch::{FetchOptions, HttpFetcher};
use mcg_core::ir::ApiModel;
use mcg_core::sink::{ArtifactSink, FileSink};
use mcg_core::{CodeGenerator, DecorationHooks, normalize};
use mcg_html::HtmlGenerator;
use mcg_jaxrs::JaxrsGenerator;

#[derive(Parser)]
#[command(name = "mcg", about = "Swagger 1.2 / 2.0 code and documentation generator", version)]
struct Cli {
    /// Config file to read instead of ./.mcg.yaml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a Swagger document and render it
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(short, long)]
        dest: Option<String>,

        /// Renderer to run
        #[arg(short, long)]
        generator: Option<GeneratorArg>,

        /// Directory with template overrides
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },

    /// Print the normalized model of a Swagger document
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Print the full model instead of a summary
        #[arg(long)]
        full: bool,
    },

    /// Initialize a new mcg configuration
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

#[derive(clap::Args)]
struct SourceArgs {
    /// Entry document: an http(s) URL or a local file
    #[arg(short, long)]
    input: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum GeneratorArg {
    Html,
    Jaxrs,
}

impl From<GeneratorArg> for GeneratorKind {
    fn from(arg: GeneratorArg) -> Self {
        match arg {
            GeneratorArg::Html => GeneratorKind::Html,
            GeneratorArg::Jaxrs => GeneratorKind::Jaxrs,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    match cli.command {
        Commands::Generate {
            source,
            dest,
            generator,
            templates,
        } => {
            let mut cfg = load_config(&config_path)?;
            source.apply(&mut cfg);
            if let Some(dest) = dest {
                cfg.dest = dest;
            }
            if let Some(generator) = generator {
                cfg.generator = generator.into();
            }
            if templates.is_some() {
                cfg.templates = templates;
            }
            cmd_generate(&cfg)
        }

        Commands::Inspect {
            source,
            format,
            full,
        } => {
            let mut cfg = load_config(&config_path)?;
            source.apply(&mut cfg);
            cmd_inspect(&cfg, format, full)
        }

        Commands::Init { force } => cmd_init(&config_path, force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "mcg", &mut std::io::stdout());
            Ok(())
        }
    }
}

impl SourceArgs {
    fn apply(self, cfg: &mut McgConfig) {
        if self.input.is_some() {
            cfg.swagger_url = self.input;
        }
        if self.insecure {
            cfg.insecure = true;
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = timeout;
        }
    }
}

fn load_config(path: &Path) -> Result<McgConfig> {
    let cfg = config::load_config(path).map_err(|e| anyhow::anyhow!(e))?;
    Ok(cfg.unwrap_or_default())
}

/// URLs pass through; anything else is a local path turned into a `file://` URL.
fn entry_url(input: &str) -> Result<String> {
    if input.starts_with("http://") || input.starts_with("https://") || input.starts_with("file:") {
        return Ok(input.to_string());
    }

    let path = fs::canonicalize(input).with_context(|| format!("failed to read {input}"))?;
    let url = url::Url::from_file_path(&path)
        .map_err(|()| anyhow::anyhow!("cannot turn {} into a file URL", path.display()))?;
    Ok(url.to_string())
}

fn build_generator(cfg: &McgConfig) -> Box<dyn CodeGenerator> {
    match cfg.generator {
        GeneratorKind::Html => {
            let generator = HtmlGenerator::new(cfg.html.clone());
            match &cfg.templates {
                Some(dir) => Box::new(generator.with_template_dir(dir)),
                None => Box::new(generator),
            }
        }
        GeneratorKind::Jaxrs => {
            let generator = JaxrsGenerator::new(cfg.java.clone());
            match &cfg.templates {
                Some(dir) => Box::new(generator.with_template_dir(dir)),
                None => Box::new(generator),
            }
        }
    }
}

/// Fetch, convert, and build the model on a single-threaded runtime.
fn load_model(cfg: &McgConfig, hooks: &DecorationHooks) -> Result<ApiModel> {
    let input = cfg.swagger_url.as_deref().context(
        "no input document: pass --input or set swagger_url in the config file",
    )?;
    let url = entry_url(input)?;

    let options = FetchOptions {
        insecure: cfg.insecure,
        timeout: Duration::from_secs(cfg.timeout_secs),
    };
    let fetcher = HttpFetcher::new(&options).context("failed to build HTTP client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let model = runtime
        .block_on(normalize(&fetcher, &url, hooks))
        .with_context(|| format!("failed to load {url}"))?;
    Ok(model)
}

fn cmd_generate(cfg: &McgConfig) -> Result<()> {
    let generator = build_generator(cfg);
    let model = load_model(cfg, &generator.hooks())?;

    eprintln!("Generating {} → {}", generator.id(), cfg.dest);
    let files = generator
        .generate(&model)
        .with_context(|| format!("{} generator failed", generator.id()))?;

    let sink = FileSink::new(&cfg.dest);
    sink.clean(&generator.preserve())
        .with_context(|| format!("failed to clean {}", cfg.dest))?;

    for file in &files {
        sink.write_file(file)
            .with_context(|| format!("failed to write {}", file.path))?;
    }

    info!("wrote {} file(s) below {}", files.len(), sink.base().display());
    eprintln!("Generated {} files in {}", files.len(), cfg.dest);
    Ok(())
}

fn cmd_inspect(cfg: &McgConfig, format: InspectFormat, full: bool) -> Result<()> {
    let model = load_model(cfg, &DecorationHooks::new())?;

    let output = if full {
        serde_json::to_value(&model)?
    } else {
        build_inspect_summary(&model)
    };

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&output)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(model: &ApiModel) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = model
        .resources
        .values()
        .map(|resource| {
            let groups: Vec<serde_json::Value> = resource
                .groups
                .values()
                .map(|group| {
                    let operations: Vec<String> = resource
                        .group_operations(group)
                        .map(|op| format!("{} {}", op.method, op.path))
                        .collect();
                    serde_json::json!({
                        "name": group.name,
                        "operations": operations,
                    })
                })
                .collect();

            serde_json::json!({
                "name": resource.name,
                "description": resource.description,
                "groups": groups,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": model.info.title,
            "version": model.info.version,
        },
        "host": model.host,
        "basePath": model.base_path,
        "resources": resources,
        "models": model.models.keys().collect::<Vec<_>>(),
        "queryBuilders": model
            .query_builders
            .iter()
            .map(|op| op.label())
            .collect::<Vec<_>>(),
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_url_keeps_remote_urls() {
        assert_eq!(
            entry_url("https://api.test/api-docs").unwrap(),
            "https://api.test/api-docs"
        );
        assert_eq!(
            entry_url("file:///tmp/swagger.json").unwrap(),
            "file:///tmp/swagger.json"
        );
    }

    #[test]
    fn test_entry_url_from_local_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swagger.json");
        fs::write(&path, "{}").unwrap();

        let url = entry_url(path.to_str().unwrap()).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/swagger.json"));
    }

    #[test]
    fn test_entry_url_missing_file() {
        let err = entry_url("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_flags_override_config() {
        let mut cfg = McgConfig {
            swagger_url: Some("http://from-config.test".to_string()),
            ..McgConfig::default()
        };

        SourceArgs {
            input: Some("http://from-flag.test".to_string()),
            insecure: true,
            timeout: None,
        }
        .apply(&mut cfg);

        assert_eq!(cfg.swagger_url.as_deref(), Some("http://from-flag.test"));
        assert!(cfg.insecure);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        cmd_init(&path, false).unwrap();
        assert!(cmd_init(&path, false).is_err());
        cmd_init(&path, true).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.generator, GeneratorKind::Html);
    }

    #[test]
    fn test_generator_selection() {
        let mut cfg = McgConfig::default();
        assert_eq!(build_generator(&cfg).id(), "html");

        cfg.generator = GeneratorKind::Jaxrs;
        assert_eq!(build_generator(&cfg).id(), "jaxrs");
    }
}
