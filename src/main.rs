use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mcp_compliance::config::{find_config_file, load_config, Config};
use mcp_compliance::mcp::format;
use mcp_compliance::mcp::McpServer;
use mcp_compliance::models::{Control, ControlFamily, ProgramInfo};
use mcp_compliance::AppContext;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MCP Compliance - FedRAMP / NIST SP 800-53 control catalogs for AI assistants
#[derive(Parser, Debug)]
#[command(name = "mcp-compliance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query FedRAMP security controls and evidence guidance, or serve them over MCP", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server over stdio, or streamable HTTP with --http
    Serve {
        /// Serve streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode [default: from config, 3000]
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to for HTTP mode [default: from config, 127.0.0.1]
        #[arg(long)]
        host: Option<String>,
    },

    /// List available compliance programs
    #[command(alias = "ls")]
    Programs,

    /// Show a control
    #[command(alias = "c")]
    Control {
        /// Control ID (e.g. AC-2)
        id: String,

        /// Compliance program [default: from config]
        #[arg(long, short)]
        program: Option<String>,
    },

    /// Show a control family and its controls
    #[command(alias = "f")]
    Family {
        /// Family ID (e.g. AC)
        id: String,

        #[arg(long, short)]
        program: Option<String>,
    },

    /// List the control families of a program
    Families {
        #[arg(long, short)]
        program: Option<String>,
    },

    /// Search controls by keyword
    #[command(alias = "s")]
    Search {
        /// Keyword or phrase
        query: String,

        #[arg(long, short)]
        program: Option<String>,
    },

    /// Show evidence collection guidance for a control
    #[command(alias = "g")]
    Guidance {
        /// Control ID (e.g. IA-2)
        id: String,

        #[arg(long, short)]
        program: Option<String>,
    },

    /// Show the company evidence practice for a control
    Practice {
        /// Control ID (e.g. AC-2)
        id: String,
    },

    /// Print the effective configuration, or write a default config file
    Config {
        /// Write a default configuration file to this path
        #[arg(long)]
        init: Option<PathBuf>,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;

    init_tracing(&cli, &config);

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        Some(Commands::Serve { http, port, host }) => {
            let ctx = Arc::new(AppContext::load(config)?);
            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| ctx.config.server.host.clone()),
                port.unwrap_or(ctx.config.server.port)
            );
            let server = McpServer::new(ctx)?;

            if http {
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Some(Commands::Programs) => {
            let ctx = AppContext::load(config)?;
            let infos: Vec<ProgramInfo> = ctx
                .registry
                .names()
                .into_iter()
                .filter_map(|name| ctx.registry.get(name))
                .map(|p| p.info())
                .collect();
            output_programs(&infos, cli.output)?;
        }

        Some(Commands::Control { id, program }) => {
            let ctx = AppContext::load(config)?;
            let control = ctx.program(program.as_deref())?.get_control(&id)?;
            match resolve_format(cli.output) {
                OutputFormat::Json => print_json(control.as_ref())?,
                _ => print!("{}", format::format_control(&control)),
            }
        }

        Some(Commands::Family { id, program }) => {
            let ctx = AppContext::load(config)?;
            let family = ctx.program(program.as_deref())?.get_control_family(&id)?;
            match resolve_format(cli.output) {
                OutputFormat::Json => print_json(&family)?,
                OutputFormat::Table => output_controls(&family.controls, OutputFormat::Table)?,
                _ => print!("{}", format::format_family(&family)),
            }
        }

        Some(Commands::Families { program }) => {
            let ctx = AppContext::load(config)?;
            let program = ctx.program(program.as_deref())?;
            let families = program.get_control_families();
            match resolve_format(cli.output) {
                OutputFormat::Plain => {
                    print!("{}", format::format_family_list(program.name(), &families))
                }
                format => output_families(&families, format)?,
            }
        }

        Some(Commands::Search { query, program }) => {
            let ctx = AppContext::load(config)?;
            let program = ctx.program(program.as_deref())?;
            let results = program.search_controls(&query);

            if results.is_empty() && !cli.quiet {
                eprintln!("No controls found matching '{}' in {}", query, program.name());
            }
            output_controls(&results, cli.output)?;
        }

        Some(Commands::Guidance { id, program }) => {
            let ctx = AppContext::load(config)?;
            let guidance = ctx.program(program.as_deref())?.get_evidence_guidance(&id)?;
            match resolve_format(cli.output) {
                OutputFormat::Json => print_json(&guidance)?,
                _ => print!("{}", format::format_guidance(&guidance)),
            }
        }

        Some(Commands::Practice { id }) => {
            let ctx = AppContext::load(config)?;
            let practice = ctx.practices.get(&id)?;
            match resolve_format(cli.output) {
                OutputFormat::Json => print_json(practice)?,
                _ => print!("{}", format::format_practice(practice)),
            }
        }

        Some(Commands::Config { init, force }) => match init {
            Some(path) => {
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                if !cli.quiet {
                    eprintln!("Wrote default configuration to {}", path.display());
                }
            }
            None => print!("{}", config.to_toml()?),
        },

        None => {
            // No command: show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

/// Initialize tracing. Logs always go to stderr so stdio transport stays clean.
fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mcp_compliance={}", level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn new_table(header: Vec<&str>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header);
    table
}

fn output_programs(programs: &[ProgramInfo], format: OutputFormat) -> Result<()> {
    match resolve_format(format) {
        OutputFormat::Json => print_json(programs)?,
        OutputFormat::Plain => print!("{}", format::format_program_list(programs)),
        _ => {
            use comfy_table::{Attribute, Cell};
            let mut table = new_table(vec!["Program", "Version", "Description"]);
            for program in programs {
                table.add_row(vec![
                    Cell::new(&program.name).add_attribute(Attribute::Bold),
                    Cell::new(&program.version),
                    Cell::new(&program.description),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn output_families(families: &[ControlFamily], format: OutputFormat) -> Result<()> {
    match resolve_format(format) {
        OutputFormat::Json => print_json(families)?,
        OutputFormat::Plain => {
            for family in families {
                println!("{}: {} ({} controls)", family.id, family.name, family.controls.len());
            }
        }
        _ => {
            use comfy_table::{Attribute, Cell};
            let mut table = new_table(vec!["Family", "Name", "Controls"]);
            for family in families {
                table.add_row(vec![
                    Cell::new(&family.id).add_attribute(Attribute::Bold),
                    Cell::new(&family.name),
                    Cell::new(family.controls.len()),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn output_controls(controls: &[Arc<Control>], format: OutputFormat) -> Result<()> {
    match resolve_format(format) {
        OutputFormat::Json => print_json(controls)?,
        OutputFormat::Plain => {
            for control in controls {
                println!("{} - {}", control.id, control.title);
                if !control.description.is_empty() {
                    println!("  {}", truncate(&control.description, 100));
                }
                println!();
            }
        }
        _ => {
            use comfy_table::{Attribute, Cell};
            let mut table = new_table(vec!["ID", "Title", "Family", "Impact", "Enhancements"]);
            for control in controls {
                table.add_row(vec![
                    Cell::new(&control.id).add_attribute(Attribute::Bold),
                    Cell::new(truncate(&control.title, 50)),
                    Cell::new(&control.family),
                    Cell::new(control.impact),
                    Cell::new(control.enhancements.len()),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
