//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use redcap_cube::CubeInputs;

/// redcap-cube: compile REDCap data dictionaries into RDF Data Cubes
#[derive(Parser)]
#[command(name = "redcap-cube")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the inputs and write the cube as Turtle
    Create {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output path for the Turtle file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile the inputs and run the integrity constraints
    Check {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile the inputs and evaluate a SPARQL query against the cube
    Query {
        #[command(flatten)]
        inputs: InputArgs,

        /// Path to a file holding the SPARQL query
        #[arg(long, value_name = "FILE")]
        sparql: PathBuf,
    },
}

/// Input files shared by every command. Missing files are skipped.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// REDCap data dictionary (CSV)
    #[arg(long, value_name = "FILE")]
    pub datadict: Option<PathBuf>,

    /// Field mapping: dimensions, concepts, units, ranges (CSV)
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Dataset metadata (CSV)
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Comma-separated dimension fields; the first is observation-level
    #[arg(long, default_value = "")]
    pub dimensions: String,

    /// Slice labels and comments (CSV)
    #[arg(long, value_name = "FILE")]
    pub slices: Option<PathBuf>,

    /// Observation rows (CSV)
    #[arg(long, value_name = "FILE")]
    pub observations: Option<PathBuf>,
}

impl From<InputArgs> for CubeInputs {
    fn from(args: InputArgs) -> Self {
        CubeInputs {
            datadict: args.datadict,
            mapping: args.mapping,
            metadata: args.metadata,
            dimensions: args.dimensions,
            slices: args.slices,
            observations: args.observations,
        }
    }
}
