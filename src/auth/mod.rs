//! The email allow-list that gates access to the application.

mod endpoints;

pub use endpoints::{
    add_admin_user_endpoint, add_email_endpoint, check_authorization_endpoint,
    get_admin_users_endpoint, get_authorized_emails_endpoint, get_current_user_endpoint,
    remove_admin_user_endpoint, remove_email_endpoint,
};

/// The set of emails allowed to use the application.
///
/// The list is owned by the application state and injected into the router
/// at construction. Mutations last for the lifetime of the process only; a
/// restart reverts to the configured defaults. This gate is deliberately
/// simple and is not treated as security-critical infrastructure.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: Vec<String>,
}

impl AllowList {
    /// Create an allow-list from `emails`, normalising each entry to
    /// lowercase and dropping duplicates.
    pub fn new(emails: impl IntoIterator<Item = String>) -> Self {
        let mut allow_list = Self { emails: Vec::new() };

        for email in emails {
            allow_list.add(&email);
        }

        allow_list
    }

    /// Whether `email` is on the list. The comparison is case-insensitive.
    pub fn is_authorized(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    /// Add `email` to the list. Adding an email that is already present is a
    /// no-op.
    pub fn add(&mut self, email: &str) {
        let email = normalize(email);

        if !email.is_empty() && !self.emails.contains(&email) {
            self.emails.push(email);
        }
    }

    /// Remove `email` from the list, returning whether it was present.
    pub fn remove(&mut self, email: &str) -> bool {
        let email = normalize(email);
        let before = self.emails.len();

        self.emails.retain(|entry| *entry != email);

        self.emails.len() < before
    }

    /// The emails currently on the list, in insertion order.
    pub fn emails(&self) -> &[String] {
        &self.emails
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod allow_list_tests {
    use super::AllowList;

    fn test_list() -> AllowList {
        AllowList::new(["x@y.com".to_string()])
    }

    #[test]
    fn membership_is_case_insensitive() {
        let allow_list = test_list();

        assert!(allow_list.is_authorized("X@Y.com"));
        assert!(allow_list.is_authorized("x@y.com"));
        assert!(!allow_list.is_authorized("z@y.com"));
    }

    #[test]
    fn entries_are_normalised_on_construction() {
        let allow_list = AllowList::new(["  A@B.com ".to_string(), "a@b.com".to_string()]);

        assert_eq!(allow_list.emails(), ["a@b.com"]);
    }

    #[test]
    fn add_ignores_duplicates() {
        let mut allow_list = test_list();

        allow_list.add("X@Y.COM");

        assert_eq!(allow_list.emails().len(), 1);
    }

    #[test]
    fn remove_reports_whether_the_email_was_present() {
        let mut allow_list = test_list();

        assert!(allow_list.remove("X@y.com"));
        assert!(!allow_list.remove("x@y.com"));
        assert!(!allow_list.is_authorized("x@y.com"));
    }
}
