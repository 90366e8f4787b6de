use ai_news_mcp::config::{
    find_config_file, load_config, user_config_path, Config, ConfigFile, LOCAL_CONFIG_FILE,
};
use ai_news_mcp::mcp::{report_to_json, McpServer};
use ai_news_mcp::models::{
    CategoryFilter, DailyRequest, DailySection, NewsRequest, PaperCategory, PaperRequest, Report,
    TimeWindow, WeeklyRequest,
};
use ai_news_mcp::NewsService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// AI News MCP - Aggregate AI news feeds and arXiv listings into Markdown reports
#[derive(Parser, Debug)]
#[command(name = "ai-news-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate AI news feeds and arXiv listings into Markdown reports", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Output format for reports
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Markdown)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Also write the report to this file
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for reports
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Rendered Markdown document
    Markdown,
    /// Structured report plus its Markdown rendering
    Json,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recent items from the configured feeds
    #[command(alias = "n")]
    News {
        /// Lookback window: daily, weekly or monthly
        #[arg(long, short, default_value = "daily")]
        time_range: TimeWindow,

        /// Category: all, research, news or gaming
        #[arg(long, short, default_value = "all")]
        category: CategoryFilter,

        /// Maximum number of items
        #[arg(long, short, default_value_t = NewsRequest::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Latest arXiv papers in AI subjects
    #[command(alias = "p")]
    Papers {
        /// Subject: all, cs.AI, cs.CL, cs.CV, cs.LG or cs.MA
        #[arg(long, short, default_value = "all")]
        category: PaperCategory,

        /// Maximum number of papers
        #[arg(long, short, default_value_t = PaperRequest::DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },

    /// Daily report with one section per category
    Daily {
        /// Sections to include, comma separated (research, news, gaming, papers)
        #[arg(long, short, value_delimiter = ',')]
        include: Vec<DailySection>,
    },

    /// Weekly report with a roundup and focus-area sections
    Weekly {
        /// Focus areas, comma separated
        #[arg(long, short, value_delimiter = ',')]
        focus: Vec<String>,
    },

    /// List the configured feed sources
    #[command(alias = "ls")]
    Sources,

    /// Write a configuration file with the default settings
    InitConfig {
        /// Destination (defaults to the per-user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Run the MCP server
    #[command(alias = "mcp")]
    Serve {
        /// Serve streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Host for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn init_tracing(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ai_news_mcp={}", level)),
    );

    // stdout carries reports and the stdio transport, so logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_settings(cli: &Cli) -> Result<Config> {
    let path = find_config_file(cli.config.as_deref());
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
        config.papers.timeout_secs = timeout;
        config.validate()?;
    }
    Ok(config)
}

fn emit(report: &Report, format: OutputFormat, save: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Json => serde_json::to_string_pretty(&report_to_json(report))?,
    };
    println!("{}", rendered);

    if let Some(path) = save {
        std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        tracing::info!("Report saved to {}", path.display());
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(user_config_path)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    ConfigFile::new(Config::default()).save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Some(Commands::InitConfig { path, force }) = &cli.command {
        return init_config(path.clone(), *force);
    }

    let config = load_settings(&cli)?;
    let service = NewsService::from_config(&config)?;
    let save = cli.save.as_deref();

    match cli.command {
        Some(Commands::News {
            time_range,
            category,
            limit,
        }) => {
            let request = NewsRequest::new()
                .time_range(time_range)
                .category(category)
                .limit(limit);
            let report = service.fetch_news(request).await;
            emit(&report, cli.output, save)?;
        }

        Some(Commands::Papers {
            category,
            max_results,
        }) => {
            let request = PaperRequest::new()
                .category(category)
                .max_results(max_results);
            let report = service.fetch_papers(request).await?;
            emit(&report, cli.output, save)?;
        }

        Some(Commands::Daily { include }) => {
            let report = service.build_daily_report(&DailyRequest::new(include)).await;
            emit(&report, cli.output, save)?;
        }

        Some(Commands::Weekly { focus }) => {
            let report = service.build_weekly_report(&WeeklyRequest::new(focus)).await;
            emit(&report, cli.output, save)?;
        }

        Some(Commands::Sources) => {
            let registry = service.registry();
            match cli.output {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(registry.all())?);
                }
                OutputFormat::Markdown => {
                    for category in registry.categories() {
                        println!("## {} ({})
", category.name(), category.id());
                        for source in registry.matching(category.into()) {
                            println!("- {} - {}", source.name, source.endpoint);
                        }
                        println!();
                    }
                    println!("## Papers

- arXiv - {}", config.papers.endpoint);
                }
            }
        }

        Some(Commands::Serve { http, port, host }) => {
            let server = McpServer::new(Arc::new(service))?;
            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        // Handled before the configuration is loaded
        Some(Commands::InitConfig { .. }) => {}

        // MCP clients launch the binary without arguments
        None => {
            McpServer::new(Arc::new(service))?.run().await?;
        }
    }

    Ok(())
}
