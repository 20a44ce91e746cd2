#![deny(clippy::all, clippy::pedantic)]

use girder::application::render::{BlockStyle, ListPredicate, format_blocks};

use crate::args::{BlockStyleArg, RenderArgs};
use crate::ctx::{CliError, Ctx};
use crate::io::read_value;

/// Render a local content field to HTML without touching the network.
pub fn handle(ctx: &Ctx, args: RenderArgs) -> Result<(), CliError> {
    let content = read_value(None, Some(args.file))?;

    let html = match args.blocks {
        Some(style) => format_blocks(&content, block_style(style), &ListPredicate::default()),
        None => ctx.renderer.render(&content).html,
    };

    println!("{html}");
    Ok(())
}

fn block_style(arg: BlockStyleArg) -> BlockStyle {
    match arg {
        BlockStyleArg::Checklist => BlockStyle::Checklist,
        BlockStyleArg::Cards => BlockStyle::Cards,
    }
}
