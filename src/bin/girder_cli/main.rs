//! girder-cli: command-line client for the Girder CMS API.
//! Fetches content records, renders rich bodies to HTML, and submits
//! leads and job applications.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod ctx;
mod handlers;
mod io;
mod print;
#[cfg(test)]
mod tests;

use clap::Parser;

use args::{Cli, Commands};
use ctx::{CliError, build_ctx_from_cli};
use handlers::{applications, auth, leads, posts, projects, render, services, site};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = girder::config::load(cli.config_file.as_deref())?;
    // A second subscriber in tests is fine to lose; the CLI itself only
    // installs one.
    let _ = girder::infra::telemetry::init(&settings.logging);

    let ctx = build_ctx_from_cli(&cli, &settings)?;

    match cli.command {
        Commands::Login(cmd) => auth::handle(&ctx, cmd).await?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Services(cmd) => services::handle(&ctx, cmd.action).await?,
        Commands::Projects(cmd) => projects::handle(&ctx, cmd.action).await?,
        Commands::Site(cmd) => site::handle(&ctx, cmd.action).await?,
        Commands::Leads(cmd) => leads::handle(&ctx, cmd.action).await?,
        Commands::Apply(cmd) => applications::handle(&ctx, cmd).await?,
        Commands::Render(cmd) => render::handle(&ctx, cmd)?,
    }

    Ok(())
}
