#![deny(clippy::all, clippy::pedantic)]

use girder::infra::http::{CSRF_PATH, TOKEN_OBTAIN_PATH, TokenStore};
use girder_api_types::{CsrfResponse, TokenObtainRequest, TokenPair};

use crate::args::LoginArgs;
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, args: LoginArgs) -> Result<(), CliError> {
    let password = args
        .password
        .ok_or_else(|| CliError::InvalidInput("password required (set GIRDER_PASSWORD)".into()))?;

    // The token endpoint is a state-changing request, so make sure the
    // anti-forgery token is populated first.
    let csrf: CsrfResponse = ctx.api.get_json(CSRF_PATH, &[]).await?;
    ctx.csrf.set(csrf.csrftoken);

    let request = TokenObtainRequest {
        username: args.username,
        password,
    };
    let pair: TokenPair = ctx
        .api
        .post_json(
            TOKEN_OBTAIN_PATH,
            serde_json::to_value(&request)
                .map_err(|e| CliError::InvalidInput(e.to_string()))?,
        )
        .await?;

    ctx.tokens
        .store_tokens(pair.access.clone(), Some(pair.refresh.clone()));
    print_json(&pair)
}
