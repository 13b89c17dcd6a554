//! EcoInsight CLI
//!
//! Command-line interface for EcoInsight:
//! - Run the dev host (UI bundle + `/api` forwarding)
//! - Submit a prediction form
//! - Check and train models
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ecoinsight::client::HttpTransport;
use ecoinsight::config::{generate_default_config, Config};
use ecoinsight::dispatch::Dispatcher;
use ecoinsight::forms::{default_fields, validate_fields, FormId, ModelKind, RawField};
use ecoinsight::server::{self, AppState};
use ecoinsight::{logging, render, status};

#[derive(Parser)]
#[command(name = "ecoinsight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sustainability analytics: packaging, carbon footprint, product and ESG predictions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Prediction API URL (overrides [backend] url)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the UI bundle and forward /api to the prediction backend
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory holding the built UI
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Submit a prediction form
    Predict {
        /// Form: packaging, carbon, product, esg (or the form id, e.g. carbonForm)
        form: String,
        /// Field values in name=value format; unset fields use the form defaults
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,
        /// Send values without checking them against the form schema
        #[arg(long)]
        no_validate: bool,
    },

    /// Show model training status
    Status,

    /// Start training a model (default: all models)
    Train {
        /// packaging, carbon_footprint, product_recommendation or esg_score
        model: Option<String>,
    },

    /// Show the fields of a form
    Fields {
        form: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.backend.url = url.clone();
    }

    if !matches!(cli.command, Commands::Serve { .. }) {
        // Keep command output readable unless asked otherwise
        config.logging.set_default_level("warn");
    }
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Logging already initialised: {}", e);
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = static_dir {
                config.server.static_dir = dir.to_string_lossy().to_string();
            }

            tracing::info!("Starting EcoInsight v{}", env!("CARGO_PKG_VERSION"));
            let state = AppState::new(&config.server, &config.backend)?;
            if !state.static_dir.join("index.html").is_file() {
                tracing::warn!(
                    "No index.html in {:?}; build the UI with `trunk build` in ecoinsight-ui",
                    state.static_dir
                );
            }
            server::serve(state, &config.server).await?;
        }

        Commands::Predict {
            form,
            fields,
            no_validate,
        } => {
            let form = parse_form(&form)?;
            let fields = collect_fields(form, &fields)?;

            if !no_validate {
                validate_fields(form, &fields)?;
            }

            let transport = HttpTransport::from_config(&config.backend)?;
            let dispatcher = Dispatcher::new(transport);
            let submission = dispatcher.submit(form.element_id(), &fields).await;

            match (&submission.outcome, cli.format) {
                (_, OutputFormat::Html) => println!("{}", submission.markup),
                (Ok(result), OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(result)?)
                }
                (Ok(result), OutputFormat::Text) => println!("{}", render::text_summary(result)),
                (Err(e), _) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
            if submission.outcome.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let transport = HttpTransport::from_config(&config.backend)?;
            let snapshot = status::fetch_status(&transport)
                .await
                .with_context(|| format!("Cannot fetch model status from {}", transport.base_url()))?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                _ => {
                    println!("{:<24} {}", "Model", "Status");
                    println!("{}", "-".repeat(40));
                    for (model, state) in snapshot.iter() {
                        let name = ModelKind::parse(model)
                            .map(|m| m.display_name())
                            .unwrap_or(model);
                        println!("{:<24} {}", name, state.label());
                    }
                    println!();
                    println!(
                        "{} of {} trained (as of {})",
                        snapshot.trained_count(),
                        snapshot.models.len(),
                        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
            }
        }

        Commands::Train { model } => {
            let model = match model.as_deref() {
                None | Some("all") => None,
                Some(name) => match ModelKind::parse(name) {
                    Some(kind) => Some(kind),
                    None => bail!(
                        "Unknown model '{}'. Use one of: all, {}",
                        name,
                        ModelKind::ALL.map(|m| m.as_str()).join(", ")
                    ),
                },
            };

            let transport = HttpTransport::from_config(&config.backend)?;
            let ack = status::request_training(&transport, model).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ack)?),
                _ => println!("{} ({})", ack.message, ack.status.label()),
            }
        }

        Commands::Fields { form } => {
            let form = parse_form(&form)?;
            println!("{} ({} → {})", form.title(), form.element_id(), form.endpoint());
            println!();
            for spec in form.fields() {
                println!("  {:<24} {:<36} default: {}", spec.name, spec.label, spec.default);
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

/// Accept `carbon` as well as `carbonForm`
fn parse_form(name: &str) -> anyhow::Result<FormId> {
    FormId::from_slug(name)
        .or_else(|| FormId::from_element_id(name).ok())
        .with_context(|| {
            format!(
                "Unknown form '{}'. Use one of: packaging, carbon, product, esg",
                name
            )
        })
}

/// Form defaults with `name=value` overrides applied
fn collect_fields(form: FormId, overrides: &[String]) -> anyhow::Result<Vec<RawField>> {
    let mut fields = default_fields(form);

    for pair in overrides {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Invalid field '{}', expected name=value", pair);
        };
        let field = RawField::from_schema(form, name.trim(), value.trim());
        match fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }

    Ok(fields)
}
