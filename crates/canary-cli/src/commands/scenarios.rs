use crate::OutputFormat;
use anyhow::Result;
use canary_core::Scenario;
use console::style;

pub fn execute(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let scenarios: Vec<_> = Scenario::ALL
                .iter()
                .map(|s| serde_json::json!({ "name": s.name(), "description": s.description() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&scenarios)?);
        }
        OutputFormat::Table => {
            println!("Scenario,Description");
            for scenario in Scenario::ALL {
                println!("{},\"{}\"", scenario.name(), scenario.description());
            }
        }
        OutputFormat::Pretty => {
            println!("{}", style("Scenarios:").bold());
            for scenario in Scenario::ALL {
                println!("  {:<15} {}", style(scenario.name()).cyan(), scenario.description());
            }
        }
    }

    Ok(())
}
