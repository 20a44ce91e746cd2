#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use girder::infra::http::{CSRF_PATH, MultipartField};
use girder_api_types::{CsrfResponse, LeadCreate};

use crate::args::LeadsCmd;
use crate::ctx::{CliError, Ctx};
use crate::io::{file_name, guess_mime, read_bytes, read_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: LeadsCmd) -> Result<(), CliError> {
    match cmd {
        LeadsCmd::Submit {
            name,
            email,
            phone,
            message,
            message_file,
            source,
            file,
        } => {
            let lead = LeadCreate {
                name,
                email,
                phone,
                message: read_value(message, message_file)?,
                source,
            };
            submit(ctx, lead, file).await
        }
    }
}

async fn submit(ctx: &Ctx, lead: LeadCreate, file: Option<PathBuf>) -> Result<(), CliError> {
    let csrf: CsrfResponse = ctx.api.get_json(CSRF_PATH, &[]).await?;
    ctx.csrf.set(csrf.csrftoken);

    let body = match file {
        // An attachment switches the submission to multipart.
        Some(path) => {
            let fields = vec![
                MultipartField::text("name", lead.name),
                MultipartField::text("email", lead.email),
                MultipartField::text("phone", lead.phone),
                MultipartField::text("message", lead.message),
                MultipartField::text("source", lead.source),
                MultipartField::file(
                    "attached_file",
                    file_name(&path),
                    guess_mime(&path),
                    read_bytes(&path)?,
                ),
            ];
            ctx.api.post_multipart("/api/leads/", fields).await?
        }
        None => {
            let payload = serde_json::to_value(&lead)
                .map_err(|e| CliError::InvalidInput(e.to_string()))?;
            ctx.api.post("/api/leads/", payload).await?
        }
    };

    match body {
        girder::infra::http::ResponseBody::Json(value) => print_json(&value),
        _ => Ok(()),
    }
}
