//! Check command - run the integrity constraints against a compiled cube.

use colored::Colorize;
use redcap_cube::{Constraint, CubeConfig, CubeInputs, DataCube};

pub fn run(inputs: CubeInputs, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cube = DataCube::compile(&inputs, CubeConfig::default())?;
    let report = cube.check_integrity()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Integrity constraints:".cyan().bold());
        for constraint in Constraint::ALL {
            let status = if report.violates(constraint) {
                "FAIL".red().bold()
            } else {
                "ok".green()
            };
            println!(
                "  {:<4} {:<32} {}",
                status,
                constraint.to_string(),
                constraint.description().dimmed()
            );
        }
        println!();

        let passed = report.checked - report.violations.len();
        println!(
            "{} {}/{} passed",
            "Summary:".yellow().bold(),
            passed.to_string().white().bold(),
            report.checked
        );
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(format!("{} integrity constraint(s) violated", report.violations.len()).into())
    }
}
