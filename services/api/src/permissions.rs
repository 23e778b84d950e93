//! Access policies
//!
//! A [`Permission`] answers two questions: may the caller use the endpoint at
//! all, and may the caller act on a particular object. Policies compose with
//! [`Or`] and [`And`]. Handlers check through [`Access`], which turns a
//! refusal into 401 for anonymous callers and 403 for authenticated ones.

use axum::http::Method;

use crate::{error::ApiError, middleware::AuthUser};

pub trait Permission {
    fn has_permission(&self, method: &Method, user: Option<&AuthUser>) -> bool;

    /// `author_id` identifies the owner of the object being accessed
    fn has_object_permission(&self, _method: &Method, _user: Option<&AuthUser>, _author_id: i64) -> bool {
        true
    }

    fn or<P: Permission>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    fn and<P: Permission>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
    {
        And(self, other)
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Anyone
#[derive(Debug, Clone, Copy)]
pub struct AllowAny;

impl Permission for AllowAny {
    fn has_permission(&self, _method: &Method, _user: Option<&AuthUser>) -> bool {
        true
    }
}

/// Safe methods only
#[derive(Debug, Clone, Copy)]
pub struct ReadOnly;

impl Permission for ReadOnly {
    fn has_permission(&self, method: &Method, _user: Option<&AuthUser>) -> bool {
        is_safe(method)
    }

    fn has_object_permission(&self, method: &Method, _user: Option<&AuthUser>, _author_id: i64) -> bool {
        is_safe(method)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, _method: &Method, user: Option<&AuthUser>) -> bool {
        user.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IsAuthenticatedOrReadOnly;

impl Permission for IsAuthenticatedOrReadOnly {
    fn has_permission(&self, method: &Method, user: Option<&AuthUser>) -> bool {
        is_safe(method) || user.is_some()
    }
}

/// Admin role or superuser
#[derive(Debug, Clone, Copy)]
pub struct IsAdmin;

impl Permission for IsAdmin {
    fn has_permission(&self, _method: &Method, user: Option<&AuthUser>) -> bool {
        user.is_some_and(AuthUser::is_admin)
    }

    fn has_object_permission(&self, _method: &Method, user: Option<&AuthUser>, _author_id: i64) -> bool {
        user.is_some_and(AuthUser::is_admin)
    }
}

/// Reads for everyone; writes for the author, moderators and admins
#[derive(Debug, Clone, Copy)]
pub struct IsAuthorOrStaffOrReadOnly;

impl Permission for IsAuthorOrStaffOrReadOnly {
    fn has_permission(&self, _method: &Method, _user: Option<&AuthUser>) -> bool {
        true
    }

    fn has_object_permission(&self, method: &Method, user: Option<&AuthUser>, author_id: i64) -> bool {
        is_safe(method) || user.is_some_and(|user| user.id == author_id || user.is_staff())
    }
}

/// Either policy grants access
#[derive(Debug, Clone, Copy)]
pub struct Or<A, B>(pub A, pub B);

impl<A: Permission, B: Permission> Permission for Or<A, B> {
    fn has_permission(&self, method: &Method, user: Option<&AuthUser>) -> bool {
        self.0.has_permission(method, user) || self.1.has_permission(method, user)
    }

    fn has_object_permission(&self, method: &Method, user: Option<&AuthUser>, author_id: i64) -> bool {
        (self.0.has_permission(method, user) && self.0.has_object_permission(method, user, author_id))
            || (self.1.has_permission(method, user)
                && self.1.has_object_permission(method, user, author_id))
    }
}

/// Both policies grant access
#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(pub A, pub B);

impl<A: Permission, B: Permission> Permission for And<A, B> {
    fn has_permission(&self, method: &Method, user: Option<&AuthUser>) -> bool {
        self.0.has_permission(method, user) && self.1.has_permission(method, user)
    }

    fn has_object_permission(&self, method: &Method, user: Option<&AuthUser>, author_id: i64) -> bool {
        self.0.has_object_permission(method, user, author_id)
            && self.1.has_object_permission(method, user, author_id)
    }
}

/// Categories, genres and titles: public reads, admin writes
pub const CATALOG: Or<IsAdmin, ReadOnly> = Or(IsAdmin, ReadOnly);

/// Reviews and comments: public reads, authenticated creates, author or staff edits
pub const CONTENT: And<IsAuthenticatedOrReadOnly, IsAuthorOrStaffOrReadOnly> =
    And(IsAuthenticatedOrReadOnly, IsAuthorOrStaffOrReadOnly);

/// The request being authorized
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    pub method: &'a Method,
    pub user: Option<&'a AuthUser>,
}

impl<'a> Access<'a> {
    pub fn new(method: &'a Method, user: Option<&'a AuthUser>) -> Self {
        Self { method, user }
    }

    /// Endpoint-level check
    pub fn check(&self, permission: &impl Permission) -> Result<(), ApiError> {
        if permission.has_permission(self.method, self.user) {
            Ok(())
        } else {
            Err(self.denied())
        }
    }

    /// Object-level check, run after the object has been loaded
    pub fn check_object(&self, permission: &impl Permission, author_id: i64) -> Result<(), ApiError> {
        if permission.has_object_permission(self.method, self.user, author_id) {
            Ok(())
        } else {
            Err(self.denied())
        }
    }

    fn denied(&self) -> ApiError {
        match self.user {
            Some(_) => ApiError::Forbidden,
            None => ApiError::Unauthorized,
        }
    }
}
