//! Resource method descriptors and the metric declarations attached to them.
//!
//! A [`ResourceInfo`] identifies one resource method (declaring type + method
//! name) and carries at most one declaration of each kind. Features inspect
//! it once at startup.

use std::error::Error;
use std::fmt;

/// Declares that every response write of the method is timed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timed {
    /// Explicit metric name; empty means derived from the method.
    pub name: String,
    /// Use `name` verbatim instead of prefixing the resource type.
    pub absolute: bool,
}

/// Declares that every response write of the method is metered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metered {
    pub name: String,
    pub absolute: bool,
}

/// Declares that failures of the method whose cause matches `cause` are metered.
#[derive(Debug, Clone, Default)]
pub struct ExceptionMetered {
    pub name: String,
    pub absolute: bool,
    pub cause: ExceptionFilter,
}

impl Timed {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), absolute: false }
    }

    pub fn absolute(name: impl Into<String>) -> Self {
        Self { name: name.into(), absolute: true }
    }
}

impl Metered {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), absolute: false }
    }

    pub fn absolute(name: impl Into<String>) -> Self {
        Self { name: name.into(), absolute: true }
    }
}

impl ExceptionMetered {
    /// Meter only failures caused by `E`.
    pub fn caused_by<E: Error + 'static>() -> Self {
        Self { cause: ExceptionFilter::of::<E>(), ..Self::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>, absolute: bool) -> Self {
        self.name = name.into();
        self.absolute = absolute;
        self
    }
}

fn is_instance<E: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<E>()
}

fn any_error(_: &(dyn Error + 'static)) -> bool {
    true
}

/// Error-type filter for exception metering.
///
/// Matches when the inspected error, or any error in its `source()` chain,
/// is an instance of the configured type.
#[derive(Clone, Copy)]
pub struct ExceptionFilter {
    type_name: &'static str,
    test: fn(&(dyn Error + 'static)) -> bool,
}

impl ExceptionFilter {
    /// Match every error.
    pub fn any() -> Self {
        Self { type_name: "any", test: any_error }
    }

    /// Match errors of concrete type `E`.
    pub fn of<E: Error + 'static>() -> Self {
        Self { type_name: std::any::type_name::<E>(), test: is_instance::<E> }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        let mut cur = Some(err);
        while let Some(e) = cur {
            if (self.test)(e) {
                return true;
            }
            cur = e.source();
        }
        false
    }
}

impl Default for ExceptionFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for ExceptionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExceptionFilter").field(&self.type_name).finish()
    }
}

/// Identity of a resource method plus its metric declarations.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    resource_type: String,
    method: String,
    timed: Option<Timed>,
    metered: Option<Metered>,
    exception_metered: Option<ExceptionMetered>,
}

impl ResourceInfo {
    pub fn new(resource_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            method: method.into(),
            timed: None,
            metered: None,
            exception_metered: None,
        }
    }

    /// Descriptor whose resource type is the dotted path of `R`
    /// (`my_app::resources::Users` becomes `my_app.resources.Users`).
    /// Generic arguments are dropped: `Repo<User>` and `Repo<Team>` share
    /// `my_app.Repo`.
    pub fn of<R: ?Sized>(method: impl Into<String>) -> Self {
        let full = std::any::type_name::<R>();
        let path = full.split('<').next().unwrap_or(full);
        Self::new(path.replace("::", "."), method)
    }

    pub fn timed(mut self, decl: Timed) -> Self {
        self.timed = Some(decl);
        self
    }

    pub fn metered(mut self, decl: Metered) -> Self {
        self.metered = Some(decl);
        self
    }

    pub fn exception_metered(mut self, decl: ExceptionMetered) -> Self {
        self.exception_metered = Some(decl);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn timed_decl(&self) -> Option<&Timed> {
        self.timed.as_ref()
    }

    pub fn metered_decl(&self) -> Option<&Metered> {
        self.metered.as_ref()
    }

    pub fn exception_metered_decl(&self) -> Option<&ExceptionMetered> {
        self.exception_metered.as_ref()
    }
}
