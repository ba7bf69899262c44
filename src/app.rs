use std::io;

use spdlog::info;

use crate::config::Storage;
use crate::form_controller::FormController;
use crate::form_data::FormUpdate;
use crate::modal::Modal;
use crate::model::{Draft, DraftField, Post, PostId};
use crate::post_store::PostStore;
use crate::storage::KeyValueStorage;

/// The whole page state: draft form, post list and detail modal, all over
/// one storage backend.
pub struct BlogApp<S> {
    form: FormController<S>,
    posts: PostStore<S>,
    modal: Modal,
}

impl<S: KeyValueStorage + Clone> BlogApp<S> {
    pub fn load(storage: S, cfg: &Storage) -> BlogApp<S> {
        let posts = PostStore::load(storage.clone(), &cfg.posts_key);
        let form = FormController::load(storage, cfg.draft_policy());

        BlogApp {
            form,
            posts,
            modal: Modal::default(),
        }
    }

    pub fn draft(&self) -> &Draft {
        self.form.draft()
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.posts()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn edit_field(&mut self, field: DraftField, value: &str) -> io::Result<()> {
        self.form.edit_field(field, value)
    }

    pub fn apply_form(&mut self, update: &FormUpdate) -> io::Result<()> {
        self.form.apply_form(update)
    }

    pub fn submit(&mut self) -> io::Result<Post> {
        self.form.submit(&mut self.posts)
    }

    /// Counts a view and opens the modal on a copy of the updated post.
    pub fn view(&mut self, id: &PostId) -> io::Result<Post> {
        let post = self.posts.view(id)?;
        self.open_modal(post)
    }

    pub fn view_at(&mut self, index: usize) -> io::Result<Post> {
        let post = self.posts.increment_view(index)?;
        self.open_modal(post)
    }

    pub fn delete(&mut self, id: &PostId) -> io::Result<Post> {
        let post = self.posts.delete(id)?;
        info!("Post {} deleted", post.id);
        Ok(post)
    }

    pub fn delete_at(&mut self, index: usize) -> io::Result<Post> {
        let post = self.posts.delete_at(index)?;
        info!("Post {} deleted", post.id);
        Ok(post)
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    fn open_modal(&mut self, post: Post) -> io::Result<Post> {
        info!("Post {} viewed, {} views", post.id, post.views);
        self.modal.open(post.clone());
        Ok(post)
    }
}
