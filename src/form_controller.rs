use std::io;

use spdlog::{debug, info, warn};

use crate::form_data::FormUpdate;
use crate::model::{Draft, DraftField, Post};
use crate::post_store::PostStore;
use crate::storage::{read_json, write_json, KeyValueStorage};

#[derive(Debug, Clone, PartialEq)]
pub enum DraftPolicy {
    /// Draft is written to this slot on every edit and restored at load
    Persisted(String),
    /// Draft lives in memory only
    Transient,
}

pub struct FormController<S> {
    storage: S,
    policy: DraftPolicy,
    draft: Draft,
}

impl<S: KeyValueStorage> FormController<S> {
    pub fn load(storage: S, policy: DraftPolicy) -> FormController<S> {
        let draft = match policy {
            DraftPolicy::Persisted(ref key) => match read_json::<Draft, _>(&storage, key) {
                Ok(draft) => draft.unwrap_or_default(),
                Err(e) => {
                    warn!("Discarding stored draft from slot {}: {}", key, e);
                    Draft::default()
                }
            },
            DraftPolicy::Transient => Draft::default(),
        };

        FormController {
            storage,
            policy,
            draft,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn edit_field(&mut self, field: DraftField, value: &str) -> io::Result<()> {
        let mut draft = self.draft.clone();
        draft.set(field, value);
        self.save_draft(draft)?;
        debug!("Draft field {} updated", field.input_name());
        Ok(())
    }

    pub fn apply_form(&mut self, update: &FormUpdate) -> io::Result<()> {
        let mut draft = self.draft.clone();
        for (field, value) in update.fields() {
            draft.set(field, value);
        }
        self.save_draft(draft)
    }

    /// Appends the draft to `store` as a new post and clears the draft.
    /// The draft is left as is when the store write fails. Once the post is
    /// stored, submit succeeds even if the cleared draft cannot be written.
    pub fn submit(&mut self, store: &mut PostStore<S>) -> io::Result<Post> {
        let post = self.draft.to_post();
        store.append(post.clone())?;
        info!("Post {} submitted: {}", post.id, post.content.title);
        if let Err(e) = self.save_draft(Draft::default()) {
            warn!("Error clearing stored draft after post {}: {}", post.id, e);
            self.draft = Draft::default();
        }
        Ok(post)
    }

    fn save_draft(&mut self, draft: Draft) -> io::Result<()> {
        if let DraftPolicy::Persisted(ref key) = self.policy {
            write_json(&self.storage, key, &draft)?;
        }
        self.draft = draft;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::MemoryStorage;
    use crate::test_data::{FailingStorage, DRAFT_KEY, POSTS_KEY};

    use super::*;

    fn persisted() -> DraftPolicy {
        DraftPolicy::Persisted(DRAFT_KEY.to_string())
    }

    fn fill(form: &mut FormController<impl KeyValueStorage>) -> io::Result<()> {
        form.edit_field(DraftField::AuthorName, "A")?;
        form.edit_field(DraftField::AuthorEmail, "a@x.com")?;
        form.edit_field(DraftField::Title, "T")?;
        form.edit_field(DraftField::Description, "D")
    }

    #[test]
    fn test_load_empty() {
        let form = FormController::load(MemoryStorage::new(), persisted());
        assert_eq!(form.draft(), &Draft::default());
    }

    #[test]
    fn test_edit_field() -> io::Result<()> {
        let mut form = FormController::load(MemoryStorage::new(), DraftPolicy::Transient);
        form.edit_field(DraftField::Title, "T")?;
        form.edit_field(DraftField::AuthorEmail, "a@x.com")?;

        assert_eq!(form.draft().content.title, "T");
        assert_eq!(form.draft().metadata.author.email, "a@x.com");
        assert_eq!(form.draft().metadata.author.name, "");
        assert_eq!(form.draft().content.description, "");
        Ok(())
    }

    #[test]
    fn test_submit() -> io::Result<()> {
        let storage = MemoryStorage::new();
        let mut store = PostStore::load(storage.clone(), POSTS_KEY);
        let mut form = FormController::load(storage, persisted());
        fill(&mut form)?;

        let post = form.submit(&mut store)?;
        assert_eq!(post.views, 0);
        assert_eq!(post.metadata.author.name, "A");
        assert_eq!(post.metadata.author.email, "a@x.com");
        assert_eq!(post.content.title, "T");
        assert_eq!(post.content.description, "D");
        assert_eq!(store.posts(), [post]);
        assert_eq!(form.draft(), &Draft::default());
        Ok(())
    }

    #[test]
    fn test_submit_empty_draft() -> io::Result<()> {
        let storage = MemoryStorage::new();
        let mut store = PostStore::load(storage.clone(), POSTS_KEY);
        let mut form = FormController::load(storage, DraftPolicy::Transient);
        form.submit(&mut store)?;
        form.submit(&mut store)?;
        assert_eq!(store.len(), 2);
        assert_eq!(store.posts()[0].content.title, "");
        Ok(())
    }

    #[test]
    fn test_persisted_draft_restored_and_cleared() -> io::Result<()> {
        let storage = MemoryStorage::new();
        let mut form = FormController::load(storage.clone(), persisted());
        fill(&mut form)?;

        let restored = FormController::load(storage.clone(), persisted());
        assert_eq!(restored.draft(), form.draft());

        let mut store = PostStore::load(storage.clone(), POSTS_KEY);
        form.submit(&mut store)?;
        let restored = FormController::load(storage, persisted());
        assert_eq!(restored.draft(), &Draft::default());
        Ok(())
    }

    #[test]
    fn test_transient_draft_not_stored() -> io::Result<()> {
        let storage = MemoryStorage::new();
        let mut form = FormController::load(storage.clone(), DraftPolicy::Transient);
        fill(&mut form)?;
        assert_eq!(storage.get(DRAFT_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_apply_form() -> io::Result<()> {
        let mut form = FormController::load(MemoryStorage::new(), DraftPolicy::Transient);
        form.edit_field(DraftField::Description, "kept")?;
        form.apply_form(&FormUpdate::from("author_name=Ana&title=Hello+world"))?;

        assert_eq!(form.draft().metadata.author.name, "Ana");
        assert_eq!(form.draft().content.title, "Hello world");
        assert_eq!(form.draft().content.description, "kept");
        Ok(())
    }

    #[test]
    fn test_submit_with_unwritable_draft_slot() -> io::Result<()> {
        let storage = FailingStorage::new();
        let mut store = PostStore::load(storage.clone(), POSTS_KEY);
        let mut form = FormController::load(storage.clone(), persisted());
        form.edit_field(DraftField::Title, "T")?;

        storage.fail_writes_to(DRAFT_KEY);
        let post = form.submit(&mut store)?;
        assert_eq!(post.content.title, "T");
        assert_eq!(store.len(), 1);
        assert_eq!(form.draft(), &Draft::default());

        let reloaded = PostStore::load(storage, POSTS_KEY);
        assert_eq!(reloaded.posts(), [post]);
        Ok(())
    }

    #[test]
    fn test_failed_submit_keeps_draft() -> io::Result<()> {
        let storage = FailingStorage::new();
        let mut store = PostStore::load(storage.clone(), POSTS_KEY);
        let mut form = FormController::load(storage.clone(), DraftPolicy::Transient);
        form.edit_field(DraftField::Title, "T")?;

        storage.fail_writes(true);
        assert!(form.submit(&mut store).is_err());
        assert_eq!(form.draft().content.title, "T");
        assert!(store.is_empty());
        Ok(())
    }
}
