use clap::Parser;
use azdeploy::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    azdeploy::logging::init_tracing();

    match cli.command {
        Commands::Init(args) => commands::execute_init(args)?,
        Commands::Deploy(args) => commands::execute_deploy(args)?,
        Commands::Group(args) => commands::execute_group(args)?,
        Commands::Destroy(args) => commands::execute_destroy(args)?,
        Commands::Status(args) => commands::execute_status(args)?,
    }

    Ok(())
}
