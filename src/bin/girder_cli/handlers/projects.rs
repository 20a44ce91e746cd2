#![deny(clippy::all, clippy::pedantic)]

use girder_api_types::{Paginated, Project};

use crate::args::ProjectsCmd;
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: ProjectsCmd) -> Result<(), CliError> {
    match cmd {
        ProjectsCmd::List { completed } => list(ctx, completed).await,
        ProjectsCmd::Get { slug } => get(ctx, &slug).await,
    }
}

async fn list(ctx: &Ctx, completed: bool) -> Result<(), CliError> {
    let path = if completed {
        "/api/projects/completed/"
    } else {
        "/api/projects/"
    };
    let projects: Paginated<Project> = ctx.api.get_json(path, &[]).await?;
    print_json(&projects)
}

async fn get(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let project: Project = ctx
        .api
        .get_json(&format!("/api/projects/slug/{slug}/"), &[])
        .await?;
    print_json(&project)
}
