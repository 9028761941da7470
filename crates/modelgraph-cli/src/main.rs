//! Modelgraph CLI - Turn domain models into property graphs, diagrams and SQL

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is initialized inside run() once flags and environment are known
    let cli_args = cli::Cli::parse();
    let color = cli_args.color.enabled();

    let mut app = cli::ModelgraphApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!(
            "{}",
            colorizer::diagnostic(colorizer::Severity::Error, &format!("{:#}", e), color)
        );
        std::process::exit(1);
    }
}
