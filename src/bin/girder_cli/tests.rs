#![deny(clippy::all, clippy::pedantic)]

use httpmock::MockServer;
use tempfile::NamedTempFile;

use girder::config::Settings;
use girder::infra::http::TokenStore;

use crate::args::{Cli, Commands, LeadsCmd, LoginArgs, PostsCmd, SiteArgs, SiteCmd};
use crate::ctx::{CliError, Ctx, build_ctx_from_cli};
use crate::handlers::{auth, leads, posts, site};

fn ctx(server: &MockServer) -> Ctx {
    Ctx::new(
        &server.base_url(),
        &Settings::default(),
        girder::infra::http::MemoryTokenStore::new(),
    )
    .expect("ctx")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

fn cli_with(site: Option<String>, token_file: Option<std::path::PathBuf>) -> Cli {
    Cli {
        site,
        token_file,
        access_token_env: None,
        refresh_token_env: None,
        config_file: None,
        command: Commands::Site(SiteArgs {
            action: SiteCmd::Config,
        }),
    }
}

#[test]
fn build_ctx_reads_token_from_file() -> Result<(), CliError> {
    let file = tmp_file("file-token\n");
    let cli = cli_with(
        Some("https://cms.example.com".to_string()),
        Some(file.path().to_path_buf()),
    );

    let ctx = build_ctx_from_cli(&cli, &Settings::default())?;
    assert_eq!(ctx.tokens.access_token().as_deref(), Some("file-token"));
    Ok(())
}

#[test]
fn build_ctx_errors_without_site() {
    let cli = cli_with(None, None);
    let err = build_ctx_from_cli(&cli, &Settings::default()).expect_err("missing site");
    assert!(matches!(err, CliError::MissingSite));
}

#[tokio::test]
async fn posts_list_hits_published_endpoint() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/blog-posts/published/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"count":0,"next":null,"previous":null,"results":[]}"#);
    });

    let ctx = ctx(&server);
    posts::handle(
        &ctx,
        PostsCmd::List {
            search: None,
            page: None,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn site_config_unwraps_the_singleton() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/site-config/");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"count":1,"next":null,"previous":null,"results":[{
                    "id":1,"company_name":"Acme Build","about_excerpt":"","address":"1 Yard",
                    "phone":"555","email":"hq@acme.test","website":"","business_hours":"",
                    "logo":null,"logo_alt_text":"Site Logo","facebook_url":"","instagram_url":"",
                    "youtube_url":"","x_url":"","linkedin_url":""
                }]}"#,
            );
    });

    site::handle(&ctx(&server), SiteCmd::Config).await
}

#[tokio::test]
async fn login_fetches_csrf_and_stores_both_tokens() -> Result<(), CliError> {
    let server = MockServer::start();
    let csrf_mock = server.mock(|when, then| {
        when.method("GET").path("/api/csrf/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"csrftoken":"csrf-abc"}"#);
    });
    let token_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/token/")
            .header("x-csrftoken", "csrf-abc");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access":"acc-1","refresh":"ref-1"}"#);
    });

    let ctx = ctx(&server);
    auth::handle(
        &ctx,
        LoginArgs {
            username: "editor".to_string(),
            password: Some("hunter2".to_string()),
        },
    )
    .await?;

    assert_eq!(ctx.tokens.access_token().as_deref(), Some("acc-1"));
    assert_eq!(ctx.tokens.refresh_token().as_deref(), Some("ref-1"));
    csrf_mock.assert();
    token_mock.assert();
    Ok(())
}

#[tokio::test]
async fn lead_with_attachment_goes_multipart() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/csrf/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"csrftoken":"c"}"#);
    });
    let lead_mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/leads/")
            .header_matches("content-type", "multipart/form-data.*");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":9}"#);
    });

    let attachment = tmp_file("site plan");
    let ctx = ctx(&server);
    leads::handle(
        &ctx,
        LeadsCmd::Submit {
            name: "A. Mason".to_string(),
            email: "a@example.test".to_string(),
            phone: String::new(),
            message: Some("Quote please".to_string()),
            message_file: None,
            source: "cli".to_string(),
            file: Some(attachment.path().to_path_buf()),
        },
    )
    .await?;
    lead_mock.assert();
    Ok(())
}
