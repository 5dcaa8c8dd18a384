//! bomcheck: dependency conformance checker for Maven projects
//!
//! Checks a project's dependencies for release-marker versions, relocated
//! artifacts and explicit versions already managed by an available BOM.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result};
use bomcheck::{
    checks::{RelocationMatch, RuleKind},
    cli,
    config::{AppConfig, ProxyConfig, CONFIG_FILE_NAMES},
    model::Coordinate,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PROXY_PORT: u16 = 8080;

#[derive(Parser)]
#[command(name = "bomcheck")]
#[command(version)]
#[command(about = "Dependency conformance checker for Maven projects", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  All dependencies conform (or violations without --fail-on-violation)
    1  Violations found with --fail-on-violation
    3  Error occurred

EXAMPLES:
    # Check the project in the current directory
    bomcheck check

    # CI pipeline check against a local catalog, without network access
    bomcheck check app/pom.xml --catalog stacks.yaml --offline --fail-on-violation

    # Skip one dependency and export JSON
    bomcheck check -e org.hibernate:hibernate-core -o json -O report.json

    # Which relocation entries apply to an artifact?
    bomcheck relocations --lookup org.jboss.spec.javax.servlet:jboss-servlet-api_3.0_spec")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `check` subcommand
#[derive(Parser)]
struct CheckArgs {
    /// Project POM to check
    #[arg(default_value = "pom.xml")]
    pom: PathBuf,

    /// BOM catalog: stacks YAML file or http(s) URL
    #[arg(long)]
    catalog: Option<String>,

    /// Skip a dependency entirely (group:artifact). Can be specified multiple times.
    #[arg(short, long = "exclude", value_name = "GROUP:ARTIFACT")]
    excludes: Vec<String>,

    /// Exit with code 1 if any violation is found
    #[arg(long)]
    fail_on_violation: bool,

    /// Relocation table file (bundled table if not specified)
    #[arg(long)]
    relocations: Option<PathBuf>,

    /// How relocation keys are matched against group and artifact ids
    #[arg(long, value_enum)]
    relocation_match: Option<RelocationMatch>,

    /// Regular expression release versions must match
    #[arg(long)]
    release_marker: Option<String>,

    /// Disable a rule. Can be specified multiple times.
    #[arg(long, value_enum, value_name = "RULE")]
    disable: Vec<RuleKind>,

    /// Remote repository URL, replaces the defaults. Can be specified multiple times.
    #[arg(long = "repo", value_name = "URL")]
    repos: Vec<String>,

    /// Local repository root (default: ~/.m2/repository)
    #[arg(long)]
    local_repo: Option<PathBuf>,

    /// Do not contact remote repositories
    #[arg(long)]
    offline: bool,

    /// Remote request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Cache directory for fetched descriptors
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Bypass cached descriptors and fetch fresh copies
    #[arg(long)]
    refresh: bool,

    /// HTTP proxy host
    #[arg(long)]
    proxy_host: Option<String>,

    /// HTTP proxy port (default: 8080)
    #[arg(long, requires = "proxy_host")]
    proxy_port: Option<u16>,

    /// HTTP proxy user name
    #[arg(long, requires = "proxy_host")]
    proxy_user: Option<String>,

    /// HTTP proxy password
    #[arg(
        long,
        env = "BOMCHECK_PROXY_PASSWORD",
        hide_env_values = true,
        requires = "proxy_user"
    )]
    proxy_password: Option<String>,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

impl CheckArgs {
    /// Flags as a config to merge over the file config.
    fn overrides(&self, no_color: bool) -> AppConfig {
        let mut builder = AppConfig::builder()
            .fail_on_violation(self.fail_on_violation)
            .relocations_file(self.relocations.clone())
            .offline(self.offline)
            .output_file(self.output_file.clone())
            .no_color(no_color);
        for exclude in &self.excludes {
            builder = builder.exclude(exclude.clone());
        }
        if let Some(catalog) = &self.catalog {
            builder = builder.catalog_source(catalog.clone());
        }
        if let Some(mode) = self.relocation_match {
            builder = builder.relocation_match(mode);
        }
        if !self.repos.is_empty() {
            builder = builder.remote_repositories(self.repos.clone());
        }
        if let Some(local) = &self.local_repo {
            builder = builder.local_repository(local.clone());
        }
        if let Some(format) = self.output {
            builder = builder.output_format(format);
        }
        if let Some(host) = &self.proxy_host {
            let port = self.proxy_port.unwrap_or(DEFAULT_PROXY_PORT);
            let mut proxy = ProxyConfig::new(host.clone(), port);
            proxy.username.clone_from(&self.proxy_user);
            proxy.password.clone_from(&self.proxy_password);
            builder = builder.proxy(proxy);
        }

        let mut config = builder.build();
        if let Some(marker) = &self.release_marker {
            config.rules.release_marker.clone_from(marker);
        }
        for rule in &self.disable {
            config.rules.disable(*rule);
        }
        if let Some(timeout) = self.timeout {
            config.repositories.timeout_secs = timeout;
        }
        config.repositories.cache_dir.clone_from(&self.cache_dir);
        config.repositories.bypass_cache = self.refresh;
        config
    }
}

/// Arguments for the `relocations` subcommand
#[derive(Parser)]
struct RelocationsArgs {
    /// Relocation table file (bundled table if not specified)
    #[arg(long)]
    relocations: Option<PathBuf>,

    /// Only show entries that apply to this coordinate (group:artifact[:version])
    #[arg(long, value_name = "COORDINATE")]
    lookup: Option<Coordinate>,

    /// How relocation keys are matched during --lookup
    #[arg(long, value_enum)]
    relocation_match: Option<RelocationMatch>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a project's dependencies for conformance
    Check(CheckArgs),

    /// Print the relocation table
    Relocations(RelocationsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .bomcheck.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay clean
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) => {
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => {
            let (config, loaded_from) = AppConfig::from_file_with_overrides(
                cli.config.as_deref(),
                &args.overrides(cli.no_color),
            );
            if let Some(path) = &loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }
            cli::run_check(&config, &args.pom, cli.quiet)
        }

        Commands::Relocations(args) => {
            let (mut config, _) = bomcheck::config::load_or_default(cli.config.as_deref());
            if args.relocations.is_some() {
                config.rules.relocations_file = args.relocations;
            }
            if let Some(mode) = args.relocation_match {
                config.rules.relocation_match = mode;
            }
            cli::run_relocations(&config, args.lookup.as_ref(), args.output_file, cli.quiet)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "bomcheck", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = bomcheck::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    bomcheck::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    ::dirs::config_dir().map(|p| p.join("bomcheck").display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match bomcheck::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".bomcheck.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = bomcheck::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}
