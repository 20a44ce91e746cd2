#![deny(clippy::all, clippy::pedantic)]

use girder_api_types::{BlogPost, Paginated};

use crate::args::PostsCmd;
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { search, page } => list(ctx, search, page).await,
        PostsCmd::Get { slug } => get(ctx, &slug).await,
        PostsCmd::Render { slug } => render(ctx, &slug).await,
    }
}

async fn list(ctx: &Ctx, search: Option<String>, page: Option<u32>) -> Result<(), CliError> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(search) = search {
        query.push(("search", search));
    }
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }

    let posts: Paginated<BlogPost> = ctx
        .api
        .get_json("/api/blog-posts/published/", &query)
        .await?;
    print_json(&posts)
}

async fn get(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let post: BlogPost = ctx
        .api
        .get_json(&format!("/api/blog-posts/slug/{slug}/"), &[])
        .await?;
    print_json(&post)
}

async fn render(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let post: BlogPost = ctx
        .api
        .get_json(&format!("/api/blog-posts/slug/{slug}/"), &[])
        .await?;
    let rendered = ctx.renderer.render(&post.content);
    println!("{}", rendered.html);
    Ok(())
}
