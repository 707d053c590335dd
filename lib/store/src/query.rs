//! Live query descriptions.

use crate::path::CollectionPath;
use crate::snapshot::Document;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

/// A predicate on a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// The field is an array containing the value.
    ArrayContains { field: String, value: JsonValue },
}

impl Filter {
    /// Returns true if the document data satisfies the predicate.
    #[must_use]
    pub fn matches(&self, data: &JsonValue) -> bool {
        match self {
            Self::ArrayContains { field, value } => data
                .get(field)
                .and_then(JsonValue::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

/// Ordering on a document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort on.
    pub field: String,
    /// The sort direction.
    pub direction: Direction,
}

/// A query over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The collection to scan.
    pub collection: CollectionPath,
    /// Optional filter.
    pub filter: Option<Filter>,
    /// Optional ordering. Unordered results come back in document id order.
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Creates a query returning every document in a collection.
    #[must_use]
    pub fn collection(collection: CollectionPath) -> Self {
        Self {
            collection,
            filter: None,
            order_by: None,
        }
    }

    /// Restricts results to documents whose array field contains the value.
    #[must_use]
    pub fn array_contains(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filter = Some(Filter::ArrayContains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Orders results by a field.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Returns true if the document belongs in this query's result set.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        document.path.parent() == self.collection
            && self
                .filter
                .as_ref()
                .is_none_or(|filter| filter.matches(&document.data))
    }

    /// Compares two documents according to this query's ordering.
    ///
    /// Ties, and unordered queries, fall back to document id order so that
    /// result sets are deterministic.
    #[must_use]
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let by_field = self.order_by.as_ref().map_or(Ordering::Equal, |order| {
            let ordering = compare_values(a.data.get(&order.field), b.data.get(&order.field));
            match order.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        by_field.then_with(|| match self.order_by.as_ref().map(|o| o.direction) {
            Some(Direction::Descending) => b.id().cmp(a.id()),
            _ => a.id().cmp(b.id()),
        })
    }
}

/// A field value as seen by `order_by`.
///
/// Timestamps are stored as RFC 3339 strings whose fractional part varies
/// in width, so strings that parse as one sort as instants, ahead of all
/// other strings.
enum SortKey<'a> {
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(&'a str),
    Array,
    Object,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a JsonValue>) -> Self {
        match value {
            None | Some(JsonValue::Null) => Self::Null,
            Some(JsonValue::Bool(b)) => Self::Bool(*b),
            Some(JsonValue::Number(n)) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Some(JsonValue::String(s)) => match parse_timestamp(s) {
                Some(t) => Self::Timestamp(t),
                None => Self::Text(s),
            },
            Some(JsonValue::Array(_)) => Self::Array,
            Some(JsonValue::Object(_)) => Self::Object,
        }
    }

    /// Rank used when keys of different kinds are compared.
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Text(_) => 4,
            Self::Array => 5,
            Self::Object => 6,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    let (a, b) = (SortKey::of(a), SortKey::of(b));
    match (&a, &b) {
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(y),
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Timestamp(x), SortKey::Timestamp(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::DocumentPath;
    use serde_json::json;

    fn doc(path: &str, data: JsonValue) -> Document {
        Document {
            path: DocumentPath::parse(path).expect("valid path"),
            data,
        }
    }

    #[test]
    fn array_contains_filter() {
        let groups = CollectionPath::root("groups").expect("valid");
        let query = Query::collection(groups).array_contains("members", "a@x.com");

        assert!(query.matches(&doc(
            "groups/g1",
            json!({"members": ["a@x.com", "b@x.com"]})
        )));
        assert!(!query.matches(&doc("groups/g2", json!({"members": ["b@x.com"]}))));
        assert!(!query.matches(&doc("groups/g3", json!({"name": "no members"}))));
    }

    #[test]
    fn matches_only_direct_children() {
        let chats = CollectionPath::parse("chats/c1/messages").expect("valid");
        let query = Query::collection(chats);

        assert!(query.matches(&doc("chats/c1/messages/m1", json!({}))));
        assert!(!query.matches(&doc("chats/c2/messages/m1", json!({}))));
    }

    #[test]
    fn timestamps_compare_as_instants() {
        let messages = CollectionPath::parse("chats/c1/messages").expect("valid");
        let query = Query::collection(messages).order_by("createdAt", Direction::Descending);

        let whole = doc(
            "chats/c1/messages/a",
            json!({"createdAt": "2024-05-01T10:00:00Z"}),
        );
        let fractional = doc(
            "chats/c1/messages/b",
            json!({"createdAt": "2024-05-01T10:00:00.500Z"}),
        );

        // Newer first.
        assert_eq!(query.compare(&fractional, &whole), Ordering::Less);
        assert_eq!(query.compare(&whole, &fractional), Ordering::Greater);
    }

    #[test]
    fn timestamps_sort_ahead_of_other_strings() {
        let messages = CollectionPath::parse("chats/c1/messages").expect("valid");
        let query = Query::collection(messages).order_by("createdAt", Direction::Ascending);

        let fractional = doc(
            "chats/c1/messages/a",
            json!({"createdAt": "2024-05-01T10:00:00.500Z"}),
        );
        let whole = doc(
            "chats/c1/messages/b",
            json!({"createdAt": "2024-05-01T10:00:00Z"}),
        );
        let malformed = doc(
            "chats/c1/messages/c",
            json!({"createdAt": "2024-05-01T10:00:00.7"}),
        );

        assert_eq!(query.compare(&whole, &fractional), Ordering::Less);
        assert_eq!(query.compare(&fractional, &malformed), Ordering::Less);
        assert_eq!(query.compare(&whole, &malformed), Ordering::Less);

        let mut docs = vec![malformed.clone(), fractional.clone(), whole.clone()];
        docs.sort_by(|a, b| query.compare(a, b));
        let ids: Vec<_> = docs.iter().map(Document::id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn ties_fall_back_to_document_id() {
        let users = CollectionPath::root("users").expect("valid");
        let query = Query::collection(users);

        let a = doc("users/a", json!({}));
        let b = doc("users/b", json!({}));
        assert_eq!(query.compare(&a, &b), Ordering::Less);
    }
}
