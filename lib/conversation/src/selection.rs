//! Member selection while composing a new group.
//!
//! Selection is ephemeral view state; nothing is persisted until the group
//! is created.

use pingster_core::Email;

/// A set of selected member emails, kept in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    members: Vec<Email>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the email if absent, removes it if present.
    ///
    /// Returns true if the email is selected afterwards.
    pub fn toggle(&mut self, email: Email) -> bool {
        if let Some(index) = self.members.iter().position(|m| *m == email) {
            self.members.remove(index);
            false
        } else {
            self.members.push(email);
            true
        }
    }

    /// Returns the selection with the email toggled.
    #[must_use]
    pub fn toggled(mut self, email: Email) -> Self {
        self.toggle(email);
        self
    }

    /// Returns true if the email is selected.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        self.members.contains(email)
    }

    /// Returns the number of selected emails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the selected emails in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &Email> {
        self.members.iter()
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

/// Selections compare as sets.
impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }
}

impl Eq for Selection {}

impl FromIterator<Email> for Selection {
    fn from_iter<I: IntoIterator<Item = Email>>(iter: I) -> Self {
        let mut selection = Self::new();
        for email in iter {
            if !selection.contains(&email) {
                selection.members.push(email);
            }
        }
        selection
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Email;
    type IntoIter = std::slice::Iter<'a, Email>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(emails: &[&str]) -> Selection {
        emails.iter().map(|e| Email::new(*e)).collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selected = Selection::new();
        assert!(selected.toggle(Email::new("a@x.com")));
        assert!(selected.contains(&Email::new("a@x.com")));

        assert!(!selected.toggle(Email::new("A@X.com")));
        assert!(selected.is_empty());
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let start = selection(&["a@x.com", "b@x.com", "c@x.com"]);
        for email in ["a@x.com", "b@x.com", "d@x.com"] {
            let round_trip = start
                .clone()
                .toggled(Email::new(email))
                .toggled(Email::new(email));
            assert_eq!(round_trip, start);
        }
        let empty = Selection::new();
        assert_eq!(
            empty.clone().toggled(Email::new("a@x.com")).toggled(Email::new("a@x.com")),
            empty
        );
    }

    #[test]
    fn keeps_selection_order() {
        let selected = selection(&["b@x.com", "a@x.com"]).toggled(Email::new("c@x.com"));
        let order: Vec<_> = selected.iter().map(Email::as_str).collect();
        assert_eq!(order, ["b@x.com", "a@x.com", "c@x.com"]);
    }

    #[test]
    fn collecting_drops_duplicates() {
        let selected = selection(&["a@x.com", "A@x.com", "b@x.com"]);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut selected = selection(&["a@x.com"]);
        selected.clear();
        assert!(selected.is_empty());
    }
}
