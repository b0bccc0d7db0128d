//! Ambient build context
//!
//! Owner identity, execution token and an optional user directory, handed to
//! constructors that ask for them. The builder forwards the context unchanged;
//! it never reads the owner or work token and never calls the directory.

use std::fmt;
use std::sync::Arc;

use spec_types::{Urn, Work};

/// Directory of known users, forwarded to constructors that need it
pub trait Users: Send + Sync {
    fn contains(&self, urn: &Urn) -> bool;

    fn everybody(&self) -> Vec<Urn>;
}

/// Ambient values for one `instantiate` call
#[derive(Clone)]
pub struct BuildContext {
    owner: Urn,
    work: Work,
    users: Option<Arc<dyn Users>>,
}

impl BuildContext {
    pub fn new(owner: Urn, work: Work) -> Self {
        Self {
            owner,
            work,
            users: None,
        }
    }

    /// Anonymous owner with no active run
    pub fn anonymous() -> Self {
        Self::new(Urn::anonymous(), Work::None)
    }

    pub fn with_users(mut self, users: Arc<dyn Users>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn owner(&self) -> &Urn {
        &self.owner
    }

    pub fn work(&self) -> &Work {
        &self.work
    }

    pub fn users(&self) -> Option<&dyn Users> {
        self.users.as_deref()
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("owner", &self.owner)
            .field("work", &self.work)
            .field("users", &self.users.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Urn>);

    impl Users for Fixed {
        fn contains(&self, urn: &Urn) -> bool {
            self.0.contains(urn)
        }

        fn everybody(&self) -> Vec<Urn> {
            self.0.clone()
        }
    }

    #[test]
    fn test_default_is_anonymous() {
        let ctx = BuildContext::default();
        assert!(ctx.owner().is_anonymous());
        assert!(ctx.work().is_none());
        assert!(ctx.users().is_none());
    }

    #[test]
    fn test_users_are_forwarded() {
        let owner: Urn = "urn:facebook:1".parse().unwrap();
        let ctx = BuildContext::new(owner.clone(), Work::run(owner.clone(), "nightly"))
            .with_users(Arc::new(Fixed(vec![owner.clone()])));
        let users = ctx.users().unwrap();
        assert!(users.contains(&owner));
        assert_eq!(users.everybody().len(), 1);
        assert_eq!(ctx.work().as_run().map(|r| r.rule.as_str()), Some("nightly"));
    }
}
