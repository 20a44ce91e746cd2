#![deny(clippy::all, clippy::pedantic)]

use girder_api_types::{Paginated, Service};

use crate::args::ServicesCmd;
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: ServicesCmd) -> Result<(), CliError> {
    match cmd {
        ServicesCmd::List { status, featured } => list(ctx, status, featured).await,
        ServicesCmd::Get { id } => get(ctx, id).await,
    }
}

async fn list(ctx: &Ctx, status: Option<String>, featured: bool) -> Result<(), CliError> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(status) = status {
        query.push(("status", status));
    }
    if featured {
        query.push(("is_featured", "true".to_string()));
    }

    let services: Paginated<Service> = ctx.api.get_json("/api/services/", &query).await?;
    print_json(&services)
}

async fn get(ctx: &Ctx, id: i64) -> Result<(), CliError> {
    let service: Service = ctx.api.get_json(&format!("/api/services/{id}/"), &[]).await?;
    print_json(&service)
}
