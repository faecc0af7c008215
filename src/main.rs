use clap::Parser;
use lifelink::cli::{
    board, driver, handle_completions, handle_config_init, patient, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Patient(args) => patient::run_patient(args).await,
        Commands::Driver(args) => driver::run_driver(args).await,
        Commands::Board(cmd) => match board::handle_board(&cmd) {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
