use std::io;
use std::io::ErrorKind;

use spdlog::{debug, warn};

use crate::model::{Post, PostId};
use crate::storage::{read_json, write_json, KeyValueStorage};

/// Ordered post collection mirrored into a single storage slot.
///
/// Positions are insertion order. Every mutation writes the whole collection
/// before the in-memory copy is replaced, so a failed write changes nothing.
pub struct PostStore<S> {
    storage: S,
    key: String,
    posts: Vec<Post>,
}

impl<S: KeyValueStorage> PostStore<S> {
    /// Reads the collection from `key`. Absent or unparsable data gives an empty store.
    pub fn load(storage: S, key: &str) -> PostStore<S> {
        let posts = match read_json::<Vec<Post>, _>(&storage, key) {
            Ok(Some(posts)) => posts,
            Ok(None) => vec![],
            Err(e) => {
                warn!("Discarding stored posts from slot {}: {}", key, e);
                vec![]
            }
        };
        debug!("Loaded {} posts from slot {}", posts.len(), key);

        PostStore {
            storage,
            key: key.to_string(),
            posts,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    pub fn position(&self, id: &PostId) -> Option<usize> {
        self.posts.iter().position(|post| &post.id == id)
    }

    pub fn append(&mut self, post: Post) -> io::Result<()> {
        let mut posts = self.posts.clone();
        posts.push(post);
        self.commit(posts)
    }

    pub fn delete_at(&mut self, index: usize) -> io::Result<Post> {
        self.check_index(index)?;
        let mut posts = self.posts.clone();
        let removed = posts.remove(index);
        self.commit(posts)?;
        Ok(removed)
    }

    /// Adds one view to the post at `index` and returns a copy of the updated post.
    pub fn increment_view(&mut self, index: usize) -> io::Result<Post> {
        self.check_index(index)?;
        let mut posts = self.posts.clone();
        posts[index].views = posts[index].views.saturating_add(1);
        let updated = posts[index].clone();
        self.commit(posts)?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &PostId) -> io::Result<Post> {
        let index = self.find(id)?;
        self.delete_at(index)
    }

    pub fn view(&mut self, id: &PostId) -> io::Result<Post> {
        let index = self.find(id)?;
        self.increment_view(index)
    }

    pub fn persist(&self) -> io::Result<()> {
        write_json(&self.storage, &self.key, &self.posts)
    }

    fn commit(&mut self, posts: Vec<Post>) -> io::Result<()> {
        write_json(&self.storage, &self.key, &posts)?;
        self.posts = posts;
        Ok(())
    }

    fn find(&self, id: &PostId) -> io::Result<usize> {
        self.position(id)
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, format!("Post {} not found", id)))
    }

    fn check_index(&self, index: usize) -> io::Result<()> {
        if index >= self.posts.len() {
            return Err(io::Error::new(ErrorKind::InvalidInput,
                                      format!("Post position {} out of range ({} posts)", index, self.posts.len())));
        }
        Ok(())
    }
}
