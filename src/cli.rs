//! CLI interface for learning-atlas

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

use crate::analysis::{self, LocationSummary};
use crate::config::{self, Config};
use crate::engine::LearningEngine;
use crate::experience::{Experience, PrivacyLevel, KNOWN_TYPES};
use crate::export::{self, ExportFormat, ExportOptions};

#[derive(Parser)]
#[command(name = "learning-atlas")]
#[command(about = "Capture learning experiences and map where, what and how you learn", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding experiences and reports (overrides config)
    #[arg(long, global = true, env = "LEARNING_ATLAS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new learning experience
    Capture {
        /// Learner pseudonym (defaults to capture.default_learner)
        #[arg(short, long)]
        learner: Option<String>,
        /// Where it happened
        #[arg(short = 'L', long)]
        location: String,
        /// Kind of place (library, park, kitchen, ...)
        #[arg(long)]
        location_type: Option<String>,
        /// Experience type
        #[arg(short = 't', long = "type", default_value = "observation")]
        kind: String,
        /// What happened
        #[arg(short, long)]
        description: String,
        /// Knowledge domain (repeatable)
        #[arg(short = 'D', long = "domain")]
        domains: Vec<String>,
        /// Connection you made (repeatable)
        #[arg(short, long = "connection")]
        connections: Vec<String>,
        /// Question it left you with (repeatable)
        #[arg(short, long = "question")]
        questions: Vec<String>,
        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude in decimal degrees
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// public, anonymized or private
        #[arg(short, long)]
        privacy: Option<PrivacyLevel>,
    },
    /// Import experiences from a JSON file (one object or an array)
    Import {
        file: PathBuf,
    },
    /// List captured experiences
    List {
        #[arg(long)]
        learner: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        domain: Option<String>,
    },
    /// Show one experience as JSON
    Show {
        id: String,
    },
    /// Experiences spanning more than one domain
    Connections {
        /// Maximum entries to show
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Per-location summary
    Locations {
        #[arg(long)]
        json: bool,
    },
    /// Locations with the most diverse learning
    Hotspots {
        /// Minimum distinct domains (defaults to analysis.hotspot_min_diversity)
        #[arg(short, long)]
        min: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Domain co-occurrence network
    Network {
        /// Only show domains that co-occur with this one
        #[arg(short, long)]
        domain: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// One learner's experiences over time
    Journey {
        learner: String,
        #[arg(long)]
        json: bool,
    },
    /// Full analysis report
    Report {
        /// Store a snapshot under the reports directory
        #[arg(long)]
        save: bool,
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
    },
    /// Export experiences or derived views
    Export {
        /// json, csv, geojson, dot or markdown
        #[arg(short, long)]
        format: ExportFormat,
        /// Anonymize every record, not only those marked anonymized
        #[arg(long)]
        anonymize: bool,
        /// Write to a file instead of stdout; the format's extension is added when missing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Configuration file location and settings
    Config {
        /// Print the effective settings
        #[arg(long)]
        show: bool,
        /// Print the default configuration file
        #[arg(long, conflicts_with = "show")]
        defaults: bool,
    },
}

/// Output format of the `report` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    #[value(alias = "md")]
    Markdown,
}

/// Run the CLI
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    if let Commands::Config { show, defaults } = cli.command {
        if defaults {
            print!("{}", config::default_config_toml());
        } else if show {
            config::show_config(&config)?;
        } else {
            println!("{}", config::config_path()?.display());
        }
        return Ok(());
    }

    let mut engine = LearningEngine::open(&config).await?;

    match cli.command {
        Commands::Capture {
            learner,
            location,
            location_type,
            kind,
            description,
            domains,
            connections,
            questions,
            lat,
            lon,
            privacy,
        } => {
            let learner = learner
                .or_else(|| config.capture.default_learner.clone())
                .context("No learner given; pass --learner or set capture.default_learner")?;
            if !KNOWN_TYPES.contains(&kind.as_str()) {
                tracing::info!("Using custom experience type '{}'", kind);
            }

            let mut loc = Map::new();
            loc.insert("name".into(), json!(location));
            if let Some(t) = location_type {
                loc.insert("type".into(), json!(t));
            }
            if let (Some(lat), Some(lon)) = (lat, lon) {
                loc.insert("coordinates".into(), json!({"latitude": lat, "longitude": lon}));
            }
            let privacy = privacy.unwrap_or(config.capture.default_privacy);
            let raw = json!({
                "learner": {"id": learner},
                "context": {"location": Value::Object(loc)},
                "experience": {
                    "type": kind,
                    "description": description,
                    "domains": domains,
                    "outcome": {"connections_made": connections, "next_questions": questions},
                },
                "privacy": {"level": privacy, "shareable": privacy == PrivacyLevel::Public},
            });

            let id = engine.capture(&raw).await?;
            println!("Captured {}", id);
        }

        Commands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let raw: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let summary = engine.import(&raw).await?;
            println!(
                "Imported {} experiences ({} unchanged, {} failed)",
                summary.imported.len(),
                summary.unchanged,
                summary.failures.len()
            );
            for (position, error) in &summary.failures {
                eprintln!("  record {}: {}", position, error);
            }
        }

        Commands::List { learner, location, domain } => {
            let index = engine.index();
            let matches: Vec<&Experience> = index
                .records()
                .iter()
                .filter(|r| learner.as_deref().map_or(true, |l| r.learner_id() == l))
                .filter(|r| location.as_deref().map_or(true, |l| r.location_name() == l))
                .filter(|r| {
                    domain
                        .as_deref()
                        .map_or(true, |d| r.experience.domains.iter().any(|x| x == d))
                })
                .collect();
            if matches.is_empty() {
                println!("No experiences found.");
            }
            for r in matches {
                println!(
                    "{}  {}  {} @ {} [{}] {}",
                    r.id,
                    r.timestamp.format("%Y-%m-%d %H:%M"),
                    r.learner_id(),
                    r.location_name(),
                    r.experience.kind,
                    truncate(&r.experience.description, 60)
                );
            }
        }

        Commands::Show { id } => match engine.index().get(&id) {
            Some(record) => print_json(record)?,
            None => anyhow::bail!("Experience not found: {}", id),
        },

        Commands::Connections { limit, json } => {
            let mut found = analysis::find_interdisciplinary_connections(engine.index());
            if let Some(limit) = limit {
                found.truncate(limit);
            }
            if json {
                print_json(&found)?;
            } else if found.is_empty() {
                println!("No interdisciplinary experiences yet.");
            } else {
                for c in &found {
                    println!("{} @ {}: {}", c.domains.join(" + "), c.location, c.description);
                    for u in &c.unexpected {
                        println!("    -> {}", u);
                    }
                }
            }
        }

        Commands::Locations { json } => {
            let map = analysis::map_by_location(engine.index());
            if json {
                print_json(&map)?;
            } else {
                print_locations(map.iter());
            }
        }

        Commands::Hotspots { min, json } => {
            let min = min.unwrap_or(engine.options().hotspot_min_diversity);
            let hotspots = analysis::find_hotspots(engine.index(), min);
            if json {
                print_json(&hotspots)?;
            } else if hotspots.is_empty() {
                println!("No locations with at least {} domains.", min);
            } else {
                print_locations(hotspots.iter());
            }
        }

        Commands::Network { domain: Some(domain), json } => {
            let network = analysis::generate_domain_network(engine.index());
            if network.node(&domain).is_none() {
                anyhow::bail!("Unknown domain: {}", domain);
            }
            let neighbors = network.neighbors(&domain);
            if json {
                let entries: Vec<Value> = neighbors
                    .iter()
                    .map(|(d, w)| json!({"domain": d, "weight": w}))
                    .collect();
                print_json(&entries)?;
            } else if neighbors.is_empty() {
                println!("{} has not co-occurred with any other domain.", domain);
            } else {
                for (other, weight) in neighbors {
                    println!("  {} -- {}: {}", domain, other, weight);
                }
            }
        }

        Commands::Network { domain: None, json } => {
            let network = analysis::generate_domain_network(engine.index());
            if json {
                print_json(&network)?;
            } else {
                println!("Domains:");
                for node in &network.nodes {
                    println!("  {} ({})", node.id, node.size);
                }
                println!("Co-occurrences:");
                for edge in &network.edges {
                    println!("  {} -- {}: {}", edge.source, edge.target, edge.weight);
                }
            }
        }

        Commands::Journey { learner, json } => match engine.journey(&learner) {
            Some(journey) if json => print_json(&journey)?,
            Some(journey) => print!("{}", export::markdown::render_journey(&journey)),
            None => println!("No experiences recorded for '{}'", learner),
        },

        Commands::Report { save, format } => {
            let report = if save {
                let (report, path) = engine.save_report().await?;
                eprintln!("Report saved to {}", path.display());
                report
            } else {
                engine.report()
            };
            match format {
                ReportFormat::Json => print_json(&report)?,
                ReportFormat::Markdown => print!("{}", export::markdown::render_report(&report)),
            }
        }

        Commands::Export { format, anonymize, output } => {
            let options = ExportOptions {
                anonymize,
                report: *engine.options(),
            };
            let rendered = export::export(engine.index(), format, &options)?;
            match output {
                Some(path) => {
                    let path = with_default_extension(path, format);
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} to {}", format, path.display());
                }
                None => print!("{}", rendered),
            }
        }

        // Answered before the engine is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn with_default_extension(path: PathBuf, format: ExportFormat) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(format.extension())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_locations<'a>(locations: impl Iterator<Item = &'a LocationSummary>) {
    for loc in locations {
        println!(
            "{}: {} experiences, {} learners, diversity {} ({})",
            loc.name,
            loc.count,
            loc.learners,
            loc.diversity,
            loc.domains.join(", ")
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
