mod commands;
mod terminal;

use commands::{CommandLine, Commands, interfaces, scan, services};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    match commands.command {
        Commands::Scan(args) => {
            print::banner();
            let result: anyhow::Result<()> = scan::scan(args, &commands.services).await;
            print::end_of_program();
            result
        }
        Commands::Services { action } => services::run(action, &commands.services),
        Commands::Interfaces => {
            print::banner();
            print::header("local interfaces");
            interfaces::interfaces();
            print::end_of_program();
            Ok(())
        }
    }
}
