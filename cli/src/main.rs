mod commands;
mod terminal;

use commands::{CommandLine, Commands, auto, check, info};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let quiet = commands.quiet;

    logging::init_logging(commands.verbose, quiet)?;
    print::banner(quiet);

    let result = match commands.command {
        Commands::Info { sources } => {
            print::header("about the tool", quiet);
            info::info(&sources)
        }
        Commands::Auto {
            category,
            tuning,
            sources,
        } => {
            print::header(&format!("starting {category} scan"), quiet);
            auto::auto(tuning.config(category), &sources).await
        }
        Commands::Check {
            category,
            items,
            tuning,
        } => {
            print::header("checking candidates", quiet);
            check::check(tuning.config(category), items).await
        }
    };

    print::end_of_program();
    result
}
