use crate::demo::{run_demo, run_rates, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use influence_market::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Influence Market",
    about = "Run the campaign-creation service or walk the wizard from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk a campaign wizard end to end and print the composed request
    Demo(DemoArgs),
    /// Print the pricing rate table
    Rates,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Rates => {
            run_rates();
            Ok(())
        }
    }
}
