use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::warn;

use geoscribe::draw::Entity;
use geoscribe::input::names;
use geoscribe::{Config, ToolRegistry, geodesy, interchange};

#[derive(Parser, Debug)]
#[command(name = "geoscribe")]
#[command(version, about = "Geographic annotation editing engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the annotations in a GeoJSON document
    Inspect {
        /// GeoJSON FeatureCollection to read
        file: PathBuf,
    },
    /// Re-export a GeoJSON document with the canonical property layout
    Normalize {
        /// GeoJSON FeatureCollection to read
        input: PathBuf,
        /// Where to write the result (stdout if omitted)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|err| {
        warn!("Failed to load config: {err:#}; using defaults");
        Config::default()
    });

    match cli.command {
        Command::Inspect { file } => inspect(&config, &file),
        Command::Normalize { input, output } => normalize(&config, &input, output.as_deref()),
    }
}

fn load(config: &Config, path: &Path) -> anyhow::Result<(ToolRegistry, interchange::ImportReport)> {
    let mut registry = ToolRegistry::from_config(config);
    let report = interchange::import_file(&mut registry, path)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    Ok((registry, report))
}

fn inspect(config: &Config, path: &Path) -> anyhow::Result<()> {
    let (registry, report) = load(config, path)?;
    let stats = registry.stats();

    for (name, count) in &stats.per_tool {
        println!("{name}: {count}");
    }
    println!("total: {}", stats.total);
    if report.skipped > 0 {
        println!("skipped: {}", report.skipped);
    }

    let store = registry.store();
    let line_length: f64 = store
        .entities_of(names::POLYLINE)
        .filter_map(|(_, entity)| match entity {
            Entity::Line(line) => Some(line.length()),
            _ => None,
        })
        .fold(0.0, |total, length| total + length);
    let polygon_area: f64 = store
        .entities_of(names::POLYGON)
        .filter_map(|(_, entity)| match entity {
            Entity::Polygon(polygon) => Some(polygon.area()),
            _ => None,
        })
        .fold(0.0, |total, area| total + area);
    println!("line length: {}", geodesy::format_distance(line_length));
    println!("polygon area: {}", geodesy::format_area(polygon_area));
    Ok(())
}

fn normalize(config: &Config, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let (registry, report) = load(config, input)?;
    if report.skipped > 0 {
        warn!(
            "Dropped {} feature(s) that could not be normalized",
            report.skipped
        );
    }

    match output {
        Some(path) => interchange::export_file(&registry, path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", interchange::export_document(&registry)?),
    }
    Ok(())
}
