use std::collections::HashMap;

use crate::model::DraftField;

/// Draft fields posted by the HTML form (application/x-www-form-urlencoded).
#[derive(PartialEq, Debug, Default)]
pub struct FormUpdate {
    items: HashMap<String, String>,
}

impl FormUpdate {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        FormUpdate {
            items,
        }
    }

    pub fn from_bytes(buf: &[u8]) -> Self {
        match std::str::from_utf8(buf) {
            Ok(s) => Self::from(s),
            Err(_) => Self::default(),
        }
    }

    /// Known fields present in the form. Unknown keys are ignored.
    pub fn fields(&self) -> impl Iterator<Item=(DraftField, &str)> {
        DraftField::ALL.into_iter()
            .filter_map(move |field| self.items.get(field.input_name()).map(|v| (field, v.as_str())))
    }
}
