//! Person Directory
//!
//! An in-memory case-insensitive exact-name index over the people table.
//! This is the synchronous lookup collaborator the text annotator needs:
//! services load the directory once per rendering pass, so the annotator
//! itself never touches the store.

use crate::models::Person;
use crate::text::{PersonLookup, PersonRef};
use std::collections::HashMap;

/// Case-insensitive name index of known persons
///
/// Built fresh from the people table for each call chain; repeated calls
/// may observe directory changes, which is expected (no caching).
#[derive(Debug, Clone, Default)]
pub struct PersonDirectory {
    by_name: HashMap<String, PersonRef>,
}

impl PersonDirectory {
    /// Build a directory from person records.
    ///
    /// Names are keyed trimmed and lowercased. If two people share a name
    /// (case-insensitively), the later record wins - mention resolution
    /// needs zero-or-one result, not a ranking.
    pub fn from_people(people: &[Person]) -> Self {
        let mut by_name = HashMap::new();
        for person in people {
            by_name.insert(
                person.name.trim().to_lowercase(),
                PersonRef::new(&person.id, &person.name),
            );
        }
        Self { by_name }
    }

    /// Number of distinct names in the directory
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when the directory holds no names
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl PersonLookup for PersonDirectory {
    fn person_by_name(&self, name: &str) -> Option<PersonRef> {
        self.by_name.get(&name.trim().to_lowercase()).cloned()
    }
}
