#![deny(clippy::all, clippy::pedantic)]

use girder::infra::http::{CSRF_PATH, MultipartField, ResponseBody};
use girder_api_types::CsrfResponse;

use crate::args::ApplyArgs;
use crate::ctx::{CliError, Ctx};
use crate::io::{file_name, guess_mime, read_bytes, read_value};
use crate::print::print_json;

/// Submit a job application. The resume upload makes this the one
/// endpoint that is always multipart.
pub async fn handle(ctx: &Ctx, args: ApplyArgs) -> Result<(), CliError> {
    let cover_letter = read_value(args.cover_letter, args.cover_letter_file)?;

    let csrf: CsrfResponse = ctx.api.get_json(CSRF_PATH, &[]).await?;
    ctx.csrf.set(csrf.csrftoken);

    let fields = vec![
        MultipartField::text("career", args.career.to_string()),
        MultipartField::text("full_name", args.full_name),
        MultipartField::text("email", args.email),
        MultipartField::text("phone", args.phone),
        MultipartField::text("cover_letter", cover_letter),
        MultipartField::file(
            "resume",
            file_name(&args.resume),
            guess_mime(&args.resume),
            read_bytes(&args.resume)?,
        ),
    ];

    let body = ctx.api.post_multipart("/api/job-applications/", fields).await?;
    match body {
        ResponseBody::Json(value) => print_json(&value),
        _ => Ok(()),
    }
}
