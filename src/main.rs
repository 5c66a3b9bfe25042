use clap::Parser;
use daybook::cli::commands::Cli;
use daybook::cli::handlers;
use daybook::util::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
