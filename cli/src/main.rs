mod commands;
mod terminal;

use commands::{CommandLine, Commands, pivot, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Scan(args) => {
            let cfg = args.into_config();
            print::banner(cfg.quiet);
            print::header("getting ready to scan", cfg.quiet);
            scan::scan(cfg).await
        }
        Commands::Pivot { summary, output } => {
            print::header("readiness pivot", 0);
            pivot::pivot(&summary, output).await
        }
    }
}
