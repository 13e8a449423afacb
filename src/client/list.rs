use serde::Deserialize;

use crate::models::GenericResource;

/// One page of an ARM list operation.
#[derive(Debug, Deserialize)]
pub struct ListResult<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

impl<T> ListResult<T> {
    /// The link to the next page, if there is one.
    pub fn next(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|l| !l.is_empty())
    }
}

/// Filters items returned by a list operation.
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Matches every item.
#[derive(Debug, Clone, Copy, Default)]
pub struct Everything;

impl<T> Predicate<T> for Everything {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Matches generic resources field by field; unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct GenericResourcePredicate {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub type_: Option<String>,
}

impl Predicate<GenericResource> for GenericResourcePredicate {
    fn matches(&self, item: &GenericResource) -> bool {
        fn field_matches(expected: &Option<String>, actual: &Option<String>) -> bool {
            match expected {
                Some(expected) => actual.as_deref() == Some(expected.as_str()),
                None => true,
            }
        }

        field_matches(&self.id, &item.id)
            && field_matches(&self.kind, &item.kind)
            && field_matches(&self.location, &item.location)
            && field_matches(&self.name, &item.name)
            && field_matches(&self.type_, &item.type_)
    }
}
