//! Per-action access policies for ads and comments.
//!
//! Each action maps to a [`Policy`]: a set of [`Predicate`]s combined with
//! OR. Evaluation happens in two phases. [`Policy::check`] runs before any
//! object is loaded; [`Policy::check_object`] runs once the target ad is in
//! hand. `IsOwner` passes the first phase for any authenticated requester
//! and only decides ownership in the second.
//!
//! Policies are plain values built per call; nothing is cached or shared.

use crate::domain::{Error, User, UserId};

/// Message returned when an anonymous requester hits a gated action.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "authentication credentials were not provided";
/// Message returned when an authenticated requester lacks permission.
pub const PERMISSION_DENIED_MESSAGE: &str = "you do not have permission to perform this action";

/// Identity making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    /// No session, or the session user no longer exists.
    Anonymous,
    /// Authenticated user.
    User(User),
}

impl Requester {
    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    /// Whether the requester is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Require an authenticated user, failing with `Forbidden`.
    pub fn require_user(&self) -> Result<&User, Error> {
        self.user()
            .ok_or_else(|| Error::forbidden(NOT_AUTHENTICATED_MESSAGE))
    }
}

/// Single access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Anyone, including anonymous requesters.
    AllowAny,
    /// Any authenticated requester.
    IsAuthenticated,
    /// The author of the target object.
    IsOwner,
    /// Administrators.
    IsAdmin,
}

impl Predicate {
    /// Collection-level decision, made before the target is loaded.
    pub fn has_permission(self, requester: &Requester) -> bool {
        match self {
            Self::AllowAny => true,
            Self::IsAuthenticated | Self::IsOwner => requester.is_authenticated(),
            Self::IsAdmin => requester.user().is_some_and(User::is_admin),
        }
    }

    /// Object-level decision against the target's author.
    pub fn has_object_permission(self, requester: &Requester, owner: &UserId) -> bool {
        match self {
            Self::IsOwner => requester.user().is_some_and(|user| user.id() == owner),
            other => other.has_permission(requester),
        }
    }
}

/// Predicates combined with OR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy(Vec<Predicate>);

impl Policy {
    /// Build a policy from predicates; an empty policy denies everything.
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self(predicates.into_iter().collect())
    }

    /// Predicates in this policy.
    pub fn predicates(&self) -> &[Predicate] {
        &self.0
    }

    /// Collection-level gate.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when no predicate holds.
    pub fn check(&self, requester: &Requester) -> Result<(), Error> {
        if self.0.iter().any(|p| p.has_permission(requester)) {
            Ok(())
        } else {
            Err(denied(requester))
        }
    }

    /// Object-level gate for a target authored by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when no predicate holds for the object.
    pub fn check_object(&self, requester: &Requester, owner: &UserId) -> Result<(), Error> {
        if self
            .0
            .iter()
            .any(|p| p.has_object_permission(requester, owner))
        {
            Ok(())
        } else {
            Err(denied(requester))
        }
    }
}

fn denied(requester: &Requester) -> Error {
    if requester.is_authenticated() {
        Error::forbidden(PERMISSION_DENIED_MESSAGE)
    } else {
        Error::forbidden(NOT_AUTHENTICATED_MESSAGE)
    }
}

/// Operations exposed by the ad resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    Me,
}

impl AdAction {
    /// Access policy for this action.
    ///
    /// # Examples
    /// ```
    /// use skymarket::domain::{AdAction, Predicate, Requester};
    ///
    /// assert!(AdAction::List.policy().check(&Requester::Anonymous).is_ok());
    /// assert!(AdAction::Create.policy().check(&Requester::Anonymous).is_err());
    /// assert_eq!(
    ///     AdAction::Destroy.policy().predicates(),
    ///     &[Predicate::IsOwner, Predicate::IsAdmin]
    /// );
    /// ```
    pub fn policy(self) -> Policy {
        match self {
            Self::List | Self::Retrieve => Policy::any_of([Predicate::AllowAny]),
            Self::Create | Self::Me => Policy::any_of([Predicate::IsAuthenticated]),
            Self::Update | Self::PartialUpdate | Self::Destroy => {
                Policy::any_of([Predicate::IsOwner, Predicate::IsAdmin])
            }
        }
    }
}

/// Operations exposed by the comment resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl CommentAction {
    /// Access policy for this action; every comment action needs a login.
    pub fn policy(self) -> Policy {
        Policy::any_of([Predicate::IsAuthenticated])
    }
}
