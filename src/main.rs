use std::path::{Path, PathBuf};

use bl_composite::{export, locate_front, refine_front, BlResult, Scenario, Segment};
use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Parser)]
#[command(name = "bl-composite")]
#[command(about = "Buckley-Leverett reference profiles for a two-segment rock", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute saturation and pressure profiles and write them as CSV files
    Run {
        /// Path to the scenario YAML file
        scenario: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
    /// Print the Welge front of each segment and the interface arrival time
    Front {
        /// Path to the scenario YAML file
        scenario: PathBuf,
    },
    /// Write relative permeability and fractional flow curves of both segments
    Curves {
        /// Path to the scenario YAML file
        scenario: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

fn main() -> BlResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { scenario, output } => cmd_run(&scenario, &output),
        Commands::Front { scenario } => cmd_front(&scenario),
        Commands::Curves { scenario, output } => cmd_curves(&scenario, &output),
    }
}

fn cmd_run(path: &Path, output: &Path) -> BlResult<()> {
    let scenario = Scenario::from_path(path)?;
    let solution = scenario.run()?;
    let written = export::write_solution(output, &scenario.fluids.wetting.name, &solution)?;
    println!(
        "Front reaches the interface after {} days",
        export::day_label(solution.interface_time())
    );
    match &solution.cross {
        None => println!("Flow didn't reach segment 2"),
        Some(cross) => {
            if let Some(time) = cross.breakthrough_time {
                println!(
                    "Front reaches the producer by {} days, later times skipped",
                    export::day_label(time)
                );
            }
        }
    }
    println!(
        "Wrote {} files for {} snapshots to {}",
        written.len(),
        solution.snapshots.len(),
        output.display()
    );
    Ok(())
}

fn print_front(segment: &Segment, flow_total: f64, gravity: f64) -> BlResult<()> {
    let tables = segment.tables(flow_total, gravity)?;
    let front = locate_front(&tables)?;
    println!(
        "Segment {}: Swf = {:.4} (index {}), dfw/dS = {:.4}, intercept = {:.4}",
        segment.rock.id, front.saturation, front.index, front.derivative, front.intercept
    );
    match refine_front(&tables, &front, segment, flow_total, gravity) {
        Ok(refined) => println!("  tangent point Swf = {:.6}", refined.saturation),
        Err(err) => warn!(segment = segment.rock.id, %err, "tangent refinement failed"),
    }
    let crossing = segment.crossing_time(tables.dfw[front.index], flow_total);
    println!(
        "  front crosses the segment in {} days",
        export::day_label(crossing)
    );
    Ok(())
}

fn cmd_front(path: &Path) -> BlResult<()> {
    let scenario = Scenario::from_path(path)?;
    let composite = scenario.composite()?;
    let settings = &scenario.settings;
    print_front(&composite.first, settings.injection_rate, settings.gravity)?;
    if let Err(err) = print_front(&composite.second, settings.injection_rate, settings.gravity) {
        warn!(%err, "segment 2 has no front of its own");
    }
    Ok(())
}

fn cmd_curves(path: &Path, output: &Path) -> BlResult<()> {
    let scenario = Scenario::from_path(path)?;
    let composite = scenario.composite()?;
    let settings = &scenario.settings;
    for segment in [&composite.first, &composite.second].iter() {
        let tables = segment.tables(settings.injection_rate, settings.gravity)?;
        let written = export::write_curves(output, segment, &tables)?;
        println!("✓ Wrote curves of segment {} to {}", segment.rock.id, written.display());
    }
    Ok(())
}
