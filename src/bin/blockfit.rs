//! blockfit command line
//!
//! Runs one allocation locally and prints the process table and block diagram.

use anyhow::Context;
use blockfit::{parse_size_list, AllocationEngine, AllocationResult, Strategy};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "blockfit")]
#[command(about = "Place processes into fixed-size memory blocks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one allocation
    Run {
        /// Block capacities, separated by commas or spaces (e.g. "100,500,200")
        #[arg(short = 'b', long)]
        blocks: String,

        /// Process sizes, separated by commas or spaces
        #[arg(short = 'p', long)]
        processes: String,

        /// first-fit, best-fit, worst-fit, next-fit or last-fit
        #[arg(short = 's', long, default_value = "first-fit")]
        strategy: String,

        /// Print the JSON response instead of tables
        #[arg(long)]
        json: bool,

        /// With --json, include stats and per-block usage
        #[arg(long)]
        detail: bool,
    },

    /// List the available strategies
    Strategies,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            blocks,
            processes,
            strategy,
            json,
            detail,
        } => {
            let blocks = parse_size_list(&blocks).context("invalid --blocks")?;
            let processes = parse_size_list(&processes).context("invalid --processes")?;
            let strategy: Strategy = strategy.parse()?;
            debug!(
                "Running {} over {} blocks, {} processes",
                strategy,
                blocks.len(),
                processes.len()
            );

            let result = AllocationEngine::new(strategy).run(&blocks, &processes)?;

            if json {
                let text = if detail {
                    serde_json::to_string_pretty(&result.to_detailed_response())?
                } else {
                    serde_json::to_string_pretty(&result.to_response())?
                };
                println!("{}", text);
            } else {
                print!("{}", render_process_table(&result));
                println!();
                print!("{}", render_block_diagram(&result));
            }
        }
        Command::Strategies => {
            for strategy in Strategy::ALL {
                println!("{:<10} {}", strategy.as_str(), strategy.description());
            }
        }
    }

    Ok(())
}

/// Process table: one row per process with the free space after that step
fn render_process_table(result: &AllocationResult) -> String {
    let mut out = format!("Strategy: {}\n\n", result.strategy);
    out.push_str(&format!(
        "{:<8} {:>10}  {:<15} {}\n",
        "Process", "Size", "Block", "Remaining after step"
    ));

    for (index, ((size, outcome), snapshot)) in result
        .process_sizes
        .iter()
        .zip(&result.outcomes)
        .zip(&result.fragmentations)
        .enumerate()
    {
        let block = match outcome.block() {
            Some(b) => format!("Block {}", b + 1),
            None => "Not allocated".to_string(),
        };
        let remaining = snapshot
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{:<8} {:>10}  {:<15} [{}]\n",
            format!("P{}", index + 1),
            size,
            block,
            remaining
        ));
    }

    out
}

/// Block diagram: each block with its residents and leftover space
fn render_block_diagram(result: &AllocationResult) -> String {
    let mut out = String::new();
    for usage in result.block_usage() {
        let label = usage.label();
        out.push_str(&format!(
            "Block {:<4} [{:<20}] {} / {} free\n",
            usage.index + 1,
            if label.is_empty() { "-" } else { label.as_str() },
            usage.remaining,
            usage.capacity
        ));
    }

    let stats = result.stats();
    out.push_str(&format!(
        "\nAssigned {}, rejected {}, utilization {:.1}%\n",
        stats.assigned,
        stats.rejected,
        stats.utilization * 100.0
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfit::allocate;

    #[test]
    fn test_process_table_rows() {
        let result = allocate(&[100, 500], &[212, 600], Strategy::FirstFit).unwrap();
        let table = render_process_table(&result);
        assert!(table.contains("first-fit"));
        assert!(table.contains("Block 2"));
        assert!(table.contains("Not allocated"));
        assert!(table.contains("[100, 288]"));
    }

    #[test]
    fn test_block_diagram() {
        let result = allocate(&[100, 500], &[50, 40], Strategy::FirstFit).unwrap();
        let diagram = render_block_diagram(&result);
        assert!(diagram.contains("P1, P2"));
        assert!(diagram.contains("-"));
        assert!(diagram.contains("Assigned 2, rejected 0"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "blockfit", "run", "-b", "100,200", "-p", "50", "-s", "best-fit", "--json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Run { json: true, .. }));
    }

    #[test]
    fn test_cli_run_defaults_and_detail() {
        let cli = Cli::try_parse_from([
            "blockfit", "run", "--blocks", "100 500", "--processes", "50", "--json", "--detail",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                strategy,
                json,
                detail,
                ..
            } => {
                assert_eq!(strategy, "first-fit");
                assert!(json);
                assert!(detail);
            }
            Command::Strategies => panic!("expected run"),
        }

        // Sizes without the subcommand are not a valid invocation
        assert!(Cli::try_parse_from(["blockfit", "--blocks", "100", "--processes", "50"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["blockfit", "strategies"]).unwrap().command,
            Command::Strategies
        ));
    }

    #[test]
    fn test_block_diagram_near_u64_max() {
        let result = allocate(&[u64::MAX, u64::MAX], &[u64::MAX, 1], Strategy::FirstFit).unwrap();
        let diagram = render_block_diagram(&result);
        assert!(diagram.contains("Assigned 2, rejected 0"));
    }
}
