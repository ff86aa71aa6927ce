//! Tacklesmith - AI-assisted carp fishing invention lab
//!
//! CLI front end: run a generation end to end, browse the saved gallery,
//! and move snapshots in and out of it.

use anyhow::{bail, Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tacklesmith::config::TacklesmithConfig;
use tacklesmith::gallery::{snapshot, DegradationNotice, FileBackend, GalleryStore};
use tacklesmith::generate::{GeminiClient, GenerationOrchestrator, Phase};
use tacklesmith::invention::{Invention, InventionRequest, ResourceMode, WeatherSnapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tacklesmith")]
#[command(version)]
#[command(about = "AI-assisted carp fishing invention lab")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TACKLESMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new invention
    Invent {
        /// The problem to solve
        challenge: String,

        /// Fishing environment description
        #[arg(short, long, default_value = "lake")]
        environment: String,

        /// Resource mode: diy, pro, 3dprint, bait, normal
        #[arg(short, long, default_value = "pro")]
        mode: ResourceMode,

        /// Ingredients or materials already at hand
        #[arg(long)]
        supplies: Option<String>,

        /// Air temperature in degrees Celsius; enables the weather context
        #[arg(long)]
        temperature: Option<f64>,

        /// Wind speed in km/h
        #[arg(long)]
        wind: Option<f64>,

        /// Barometric pressure in hPa
        #[arg(long)]
        pressure: Option<f64>,

        /// Sky condition label
        #[arg(long)]
        sky: Option<String>,

        /// Save the finished invention to the gallery
        #[arg(long)]
        save: bool,

        /// Write the generated image to this file
        #[arg(long)]
        image_out: Option<PathBuf>,
    },

    /// List saved inventions
    Gallery,

    /// Print one saved invention in full
    Show {
        /// Invention id
        id: String,
    },

    /// Export the gallery to a snapshot file
    Export {
        /// Output path (defaults to a dated filename in the current dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a snapshot file into the gallery
    Import {
        /// Snapshot file to read
        file: PathBuf,
    },

    /// Delete a saved invention
    Delete {
        /// Invention id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tacklesmith={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match cli.config {
        Some(path) => TacklesmithConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TacklesmithConfig::default(),
    };

    let backend = Arc::new(
        FileBackend::new(&config.storage.path).with_max_bytes(config.storage.max_bytes),
    );
    let store = GalleryStore::open(backend);

    match cli.command {
        Commands::Invent {
            challenge,
            environment,
            mode,
            supplies,
            temperature,
            wind,
            pressure,
            sky,
            save,
            image_out,
        } => {
            let weather = temperature.map(|t| WeatherSnapshot {
                temperature: t,
                wind_speed: wind.unwrap_or_default(),
                pressure: pressure.unwrap_or_default(),
                condition: sky.unwrap_or_default(),
            });
            let request = InventionRequest {
                challenge,
                environment,
                resource_mode: mode,
                available_supplies: supplies,
                weather,
            };
            run_invent(&store, config, request, save, image_out).await?;
        }
        Commands::Gallery => {
            let collection = store.load().await;
            if collection.is_empty() {
                println!("Gallery is empty.");
            }
            for inv in &collection {
                println!(
                    "{}  {:<28} feasibility {:>3}  {}",
                    inv.id,
                    inv.concept.name,
                    inv.concept.feasibility_score,
                    if inv.has_visual() { "[image]" } else { "[text only]" }
                );
            }
        }
        Commands::Show { id } => {
            let collection = store.load().await;
            match collection.iter().find(|inv| inv.id == id) {
                Some(inv) => print_invention(inv),
                None => bail!("no invention with id {}", id),
            }
        }
        Commands::Export { out } => {
            let collection = store.load().await;
            let data = snapshot::export(&collection)?;
            let path = out.unwrap_or_else(|| PathBuf::from(snapshot::default_snapshot_name()));
            std::fs::write(&path, data)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            println!("Exported {} inventions to {}", collection.len(), path.display());
        }
        Commands::Import { file } => {
            let data = std::fs::read_to_string(&file)
                .with_context(|| format!("reading snapshot {}", file.display()))?;
            let result = snapshot::import(&store, &data).await?;
            report_notice(result.outcome.notice);
            println!(
                "Import successful: added {} inventions ({} total).",
                result.added,
                result.outcome.collection.len()
            );
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete invention {}? This cannot be undone.", id))? {
                println!("Aborted.");
                return Ok(());
            }
            let remaining = store.remove(&id).await?;
            println!("Deleted. {} inventions remain.", remaining.len());
        }
    }

    Ok(())
}

async fn run_invent(
    store: &GalleryStore,
    config: TacklesmithConfig,
    request: InventionRequest,
    save: bool,
    image_out: Option<PathBuf>,
) -> Result<()> {
    let model = Arc::new(GeminiClient::from_config(config.model)?);
    let orchestrator = GenerationOrchestrator::new(model);

    println!("Brainstorming...");
    let mut handle = orchestrator.start(request)?;

    let mut shown = false;
    loop {
        let phase = handle.phase().await;
        if phase == Phase::Visualizing && !shown {
            if let Some(inv) = handle.invention().await {
                print_invention(&inv);
                println!("\nVisualizing...");
                shown = true;
            }
        }
        match phase {
            Phase::Complete | Phase::Error => break,
            _ => {
                if handle.changed().await.is_none() {
                    break;
                }
            }
        }
    }

    if handle.phase().await == Phase::Error {
        bail!(
            "invention generation failed: {}",
            handle.error().await.unwrap_or_default()
        );
    }

    let invention = handle
        .invention()
        .await
        .context("run completed without an invention")?;

    match &invention.visual {
        Some(_) => println!("Image ready."),
        None => println!("No image was generated; the invention is text-only."),
    }

    if let (Some(path), Some(visual)) = (image_out, &invention.visual) {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&visual.data)
            .context("decoding generated image data")?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing image to {}", path.display()))?;
        println!("Image written to {}", path.display());
    }

    if save {
        let outcome = store.commit(invention).await?;
        report_notice(outcome.notice);
        println!("Saved to gallery ({} inventions).", outcome.collection.len());
    }

    Ok(())
}

fn print_invention(inv: &Invention) {
    let c = &inv.concept;
    println!("\n=== {} ===", c.name);
    println!("{}\n", c.tagline);
    println!("{}\n", c.description);
    println!("Mechanism: {}", c.mechanism);
    if !c.materials.is_empty() {
        println!("Materials:");
        for m in &c.materials {
            println!("  - {}", m);
        }
    }
    println!("Feasibility: {}/100", c.feasibility_score);
    if let Some(analysis) = &c.feasibility_analysis {
        println!("  {}", analysis);
    }
    if let Some(steps) = &c.instructions {
        println!("Instructions:");
        for (i, step) in steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    if !c.pros.is_empty() {
        println!("Pros: {}", c.pros.join("; "));
    }
    if !c.cons.is_empty() {
        println!("Cons: {}", c.cons.join("; "));
    }
}

fn report_notice(notice: Option<DegradationNotice>) {
    match notice {
        Some(DegradationNotice::NewestVisualStripped) => println!(
            "Storage limit reached: the newest invention was saved as text only. \
             Tip: export a backup to keep full data externally."
        ),
        Some(DegradationNotice::AllVisualsStripped) => println!(
            "Storage critical: all images were removed from the gallery to preserve \
             your invention data. Please export a backup."
        ),
        None => {}
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
