use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn generate() -> Self {
        PostId(Uuid::new_v4().to_string())
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftMetadata {
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub author: Author,
    #[serde(default = "now")]
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default = "PostId::generate")]
    pub id: PostId,
    pub metadata: PostMetadata,
    pub content: Content,
    #[serde(default)]
    pub views: u64,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, date={}, author={} <{}>, views={}\ntitle={}\ndescription:\n{}",
               self.id,
               self.metadata.date,
               self.metadata.author.name,
               self.metadata.author.email,
               self.views,
               self.content.title,
               self.content.description
        )
    }
}

/// The unsubmitted post bound to the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub metadata: DraftMetadata,
    pub content: Content,
}

impl Draft {
    pub fn set(&mut self, field: DraftField, value: &str) {
        let target = match field {
            DraftField::AuthorName => &mut self.metadata.author.name,
            DraftField::AuthorEmail => &mut self.metadata.author.email,
            DraftField::Title => &mut self.content.title,
            DraftField::Description => &mut self.content.description,
        };
        *target = value.to_string();
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::AuthorName => &self.metadata.author.name,
            DraftField::AuthorEmail => &self.metadata.author.email,
            DraftField::Title => &self.content.title,
            DraftField::Description => &self.content.description,
        }
    }

    /// Turns the draft into a brand-new post: fresh id, current date, no views.
    pub fn to_post(&self) -> Post {
        Post {
            id: PostId::generate(),
            metadata: PostMetadata {
                author: self.metadata.author.clone(),
                date: now(),
            },
            content: self.content.clone(),
            views: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DraftField {
    AuthorName,
    AuthorEmail,
    Title,
    Description,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::AuthorName,
        DraftField::AuthorEmail,
        DraftField::Title,
        DraftField::Description,
    ];

    pub fn input_name(&self) -> &'static str {
        match self {
            DraftField::AuthorName => "author_name",
            DraftField::AuthorEmail => "author_email",
            DraftField::Title => "title",
            DraftField::Description => "description",
        }
    }
}

impl FromStr for DraftField {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author.name" | "author_name" => Ok(DraftField::AuthorName),
            "author.email" | "author_email" => Ok(DraftField::AuthorEmail),
            "title" => Ok(DraftField::Title),
            "description" => Ok(DraftField::Description),
            _ => Err(io::Error::new(ErrorKind::InvalidInput, format!("Unknown draft field {}", s))),
        }
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
