use crate::model::Post;

/// Detail overlay. Open while it holds a snapshot of the last viewed post.
#[derive(Default)]
pub struct Modal {
    snapshot: Option<Post>,
}

impl Modal {
    pub fn open(&mut self, post: Post) {
        self.snapshot = Some(post);
    }

    pub fn close(&mut self) {
        self.snapshot = None;
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&Post> {
        self.snapshot.as_ref()
    }
}
