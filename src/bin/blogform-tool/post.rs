use std::path::PathBuf;

use anyhow::{anyhow, Result};

use blogform::app::BlogApp;
use blogform::config::{locate_config, read_config, Storage};
use blogform::model::{DraftField, Post, PostId};
use blogform::storage::FileStorage;
use blogform::util::os_helper::get_name;

use crate::{PostArgs, StoreArgs, SubmitArgs};

fn open_app(args: &StoreArgs) -> Result<BlogApp<FileStorage>> {
    let config_path = args.config_path.as_ref().map(PathBuf::from)
        .or_else(locate_config)
        .ok_or_else(|| anyhow!("Could not find blogform configuration"))?;
    let config = read_config(&config_path)?;
    let storage = FileStorage::open(&config.paths.data_dir)?;

    // The command line never touches the draft being edited in the browser
    let storage_cfg = Storage {
        persist_draft: false,
        ..config.storage
    };
    Ok(BlogApp::load(storage, &storage_cfg))
}

fn render_line(position: usize, post: &Post) -> String {
    format!("{:>3}. [{}] {} - {} <{}> ({} views)",
            position,
            post.id,
            post.content.title,
            post.metadata.author.name,
            post.metadata.author.email,
            post.views)
}

pub fn submit_cmd(args: SubmitArgs) -> Result<()> {
    let mut app = open_app(&args.store)?;
    let name = args.name.unwrap_or_else(get_name);

    app.edit_field(DraftField::AuthorName, &name)?;
    app.edit_field(DraftField::AuthorEmail, args.email.as_deref().unwrap_or_default())?;
    app.edit_field(DraftField::Title, &args.title)?;
    app.edit_field(DraftField::Description, args.description.as_deref().unwrap_or_default())?;

    let post = app.submit()?;
    println!("Created post {}", post.id);
    Ok(())
}

pub fn list_cmd(args: StoreArgs) -> Result<()> {
    let app = open_app(&args)?;
    if app.posts().is_empty() {
        println!("No posts");
    }
    for (position, post) in app.posts().iter().enumerate() {
        println!("{}", render_line(position, post));
    }
    Ok(())
}

pub fn view_cmd(args: PostArgs) -> Result<()> {
    let mut app = open_app(&args.store)?;
    let post = app.view(&PostId(args.id))?;
    println!("{}", post);
    Ok(())
}

pub fn delete_cmd(args: PostArgs) -> Result<()> {
    let mut app = open_app(&args.store)?;
    let post = app.delete(&PostId(args.id))?;
    println!("Deleted post {}: {}", post.id, post.content.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use blogform::model::Draft;

    use super::*;

    #[test]
    fn test_render_line() {
        let mut draft = Draft::default();
        draft.metadata.author.name = "Thiago".to_string();
        draft.metadata.author.email = "t@example.com".to_string();
        draft.content.title = "This is a title".to_string();
        let mut post = draft.to_post();
        post.id = PostId("bcfc427f".to_string());
        post.views = 2;

        assert_eq!(render_line(1, &post), "  1. [bcfc427f] This is a title - Thiago <t@example.com> (2 views)");
    }
}
