//! Query command - evaluate SPARQL against a compiled cube.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use redcap_cube::{CubeConfig, CubeInputs, DataCube};
use redcap_cube::graph::QueryResults;

pub fn run(inputs: CubeInputs, sparql: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let query = fs::read_to_string(&sparql)
        .map_err(|e| format!("Cannot read query {}: {}", sparql.display(), e))?;
    let cube = DataCube::compile(&inputs, CubeConfig::default())?;

    match cube.query(&query)? {
        QueryResults::Boolean(answer) => {
            let answer = if answer { "true".green() } else { "false".red() };
            println!("{answer}");
        }
        QueryResults::Solutions(solutions) => {
            let variables: Vec<_> = solutions.variables().to_vec();
            let header: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
            println!("{}", header.join("\t").cyan().bold());

            let mut rows = 0;
            for solution in solutions {
                let solution = solution?;
                let values: Vec<String> = variables
                    .iter()
                    .map(|v| solution.get(v).map(|t| t.to_string()).unwrap_or_default())
                    .collect();
                println!("{}", values.join("\t"));
                rows += 1;
            }
            eprintln!("{} {}", rows.to_string().white().bold(), "results".dimmed());
        }
        QueryResults::Graph(triples) => {
            for triple in triples {
                println!("{} .", triple?);
            }
        }
    }

    Ok(())
}
