use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::modal::Modal;
use crate::model::{Draft, Post};
use crate::text_utils::format_date_time;

#[derive(ramhorns::Content)]
struct Page<'a> {
    draft: DraftForm<'a>,
    post_list: Vec<PostItem<'a>>,
    has_posts: bool,
    modal: Option<PostItem<'a>>,
}

#[derive(ramhorns::Content)]
struct DraftForm<'a> {
    author_name: &'a str,
    author_email: &'a str,
    title: &'a str,
    description: &'a str,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    id: &'a str,
    date: String,
    time: String,
    author_name: &'a str,
    author_email: &'a str,
    title: &'a str,
    description: &'a str,
    views: u64,
}

impl<'a> PostItem<'a> {
    fn new(post: &'a Post) -> Self {
        let (date, time) = format_date_time(&post.metadata.date);
        PostItem {
            id: post.id.0.as_str(),
            date,
            time,
            author_name: post.metadata.author.name.as_str(),
            author_email: post.metadata.author.email.as_str(),
            title: post.content.title.as_str(),
            description: post.content.description.as_str(),
            views: post.views,
        }
    }
}

/// Renders the single page: draft form, post list and, when open, the modal.
pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(page_tpl_src: &str) -> io::Result<PageRenderer> {
        let template = match Template::new(page_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing page template: {}", e)));
            }
        };

        Ok(PageRenderer {
            template,
        })
    }

    pub fn render(&self, draft: &Draft, posts: &[Post], modal: &Modal) -> String {
        let post_list: Vec<PostItem> = posts.iter()
            .map(PostItem::new)
            .collect();

        self.template.render(&Page {
            draft: DraftForm {
                author_name: draft.metadata.author.name.as_str(),
                author_email: draft.metadata.author.email.as_str(),
                title: draft.content.title.as_str(),
                description: draft.content.description.as_str(),
            },
            has_posts: !post_list.is_empty(),
            post_list,
            modal: modal.snapshot().map(PostItem::new),
        })
    }
}
