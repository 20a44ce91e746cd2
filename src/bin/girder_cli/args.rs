//! Command-line surface for `girder-cli`.
//! Kept in a shared file so tests can reuse the same definitions as the
//! binary itself.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "girder-cli", version, about = "Girder CMS API CLI", long_about = None)]
pub struct Cli {
    /// CMS base URL, e.g. <https://cms.example.com>
    #[arg(long, env = "GIRDER_SITE_URL")]
    pub site: Option<String>,

    /// Path to file containing an access token (takes precedence over env)
    #[arg(long, env = "GIRDER_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Access token from env (CLI flag intentionally disabled to avoid
    /// shell history leaks)
    #[arg(hide = true, env = "GIRDER_ACCESS_TOKEN")]
    pub access_token_env: Option<String>,

    #[arg(hide = true, env = "GIRDER_REFRESH_TOKEN")]
    pub refresh_token_env: Option<String>,

    /// Optional path to a configuration file
    #[arg(long = "config-file", env = "GIRDER_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain a token pair with username/password
    Login(LoginArgs),
    /// Blog post access and rendering
    Posts(PostsArgs),
    /// Service pages
    Services(ServicesArgs),
    /// Project portfolio
    Projects(ProjectsArgs),
    /// Site-wide configuration record
    Site(SiteArgs),
    /// Contact/lead submission
    Leads(LeadsArgs),
    /// Job application submission (multipart resume upload)
    Apply(ApplyArgs),
    /// Render a local content field to HTML
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    /// Password from env only, for the same reason as the token
    #[arg(hide = true, env = "GIRDER_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List published posts
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Get a post by slug
    Get { slug: String },
    /// Fetch a post by slug and render its body to HTML on stdout
    Render { slug: String },
}

#[derive(Parser, Debug)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub action: ServicesCmd,
}

#[derive(Subcommand, Debug)]
pub enum ServicesCmd {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        featured: bool,
    },
    /// Get a service by numeric id
    Get { id: i64 },
}

#[derive(Parser, Debug)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub action: ProjectsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCmd {
    List {
        /// Only completed projects (`/api/projects/completed/`)
        #[arg(long)]
        completed: bool,
    },
    /// Get a project by slug
    Get { slug: String },
}

#[derive(Parser, Debug)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub action: SiteCmd,
}

#[derive(Subcommand, Debug)]
pub enum SiteCmd {
    /// Print the singleton site configuration
    Config,
}

#[derive(Parser, Debug)]
pub struct LeadsArgs {
    #[command(subcommand)]
    pub action: LeadsCmd,
}

#[derive(Subcommand, Debug)]
pub enum LeadsCmd {
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        message_file: Option<PathBuf>,
        #[arg(long, default_value = "cli")]
        source: String,
        /// Optional attachment; switches the submission to multipart
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Career id the application targets
    #[arg(long)]
    pub career: i64,
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub cover_letter: Option<String>,
    #[arg(long)]
    pub cover_letter_file: Option<PathBuf>,
    /// Resume file (PDF, DOC, DOCX)
    #[arg(long)]
    pub resume: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// File holding the content field (HTML or JSON op-log)
    #[arg(long)]
    pub file: PathBuf,

    /// Treat the input as newline-delimited plain text and format it as
    /// blocks instead of running the rich-content pipeline
    #[arg(long)]
    pub blocks: Option<BlockStyleArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BlockStyleArg {
    Checklist,
    Cards,
}
