//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::domain::BoundingBox;

/// Fetch OpenStreetMap features for a bounding box and store them as JSON
#[derive(Parser, Debug)]
#[command(name = "osmfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Area label recorded in output metadata [default: vennesla]
    #[arg(long)]
    pub area: Option<String>,

    /// Output file [default: data/vennesla_osm.json]
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Group elements into buildings, roads, water, forests and poi
    #[arg(long)]
    pub categorize: bool,

    /// Bounding box as south,west,north,east (overrides config)
    #[arg(long, value_name = "S,W,N,E", allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Overpass interpreter URL (overrides config)
    #[arg(long, value_hint = ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Additional config file, layered over the global one
    #[arg(short, long, env = "OSMFETCH_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What a single run should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub area: String,
    pub output: PathBuf,
    pub categorize: bool,
}
