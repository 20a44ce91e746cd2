#![deny(clippy::all, clippy::pedantic)]

use girder_api_types::{Paginated, SiteConfig};

use crate::args::SiteCmd;
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: SiteCmd) -> Result<(), CliError> {
    match cmd {
        SiteCmd::Config => config(ctx).await,
    }
}

/// The backend models site configuration as a singleton but serves it
/// through a list endpoint; print the one record.
async fn config(ctx: &Ctx) -> Result<(), CliError> {
    let page: Paginated<SiteConfig> = ctx.api.get_json("/api/site-config/", &[]).await?;
    match page.results.into_iter().next() {
        Some(config) => print_json(&config),
        None => Err(CliError::InvalidInput(
            "site configuration has not been created yet".into(),
        )),
    }
}
