//! Create command - compile the inputs and write Turtle.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use redcap_cube::{CubeConfig, CubeInputs, DataCube};

pub fn run(inputs: CubeInputs, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cube = DataCube::compile(&inputs, CubeConfig::default())?;
    let turtle = cube.to_turtle()?;

    match output {
        Some(path) => {
            fs::write(&path, turtle)?;
            eprintln!(
                "{} {} triples to {}",
                "Wrote".green().bold(),
                cube.graph().len()?,
                path.display().to_string().white()
            );
        }
        None => print!("{turtle}"),
    }

    Ok(())
}
