//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Every variant is a configuration or programming error. Binding errors are
/// raised while the [`Binder`](crate::Binder) is being populated, resolution
/// errors while a [`Container`](crate::Container) builds an object graph.
/// None of them is recovered from inside the container: the triggering
/// installation or resolution request fails as a whole.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, DiError, Resolver};
///
/// let container = Binder::new().build().unwrap();
/// match container.get::<String>() {
///     Err(DiError::UnboundService(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use graft_di::DiError;
///
/// let cycle = DiError::DependencyCycle(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(cycle.to_string(), "Dependency cycle: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Service identifier registered more than once
    #[error("Duplicate binding for: {0}")]
    DuplicateBinding(&'static str),
    /// Concrete type declares no constructor carrying the injection marker
    #[error("No injectable constructor on: {0}")]
    NoInjectableConstructor(&'static str),
    /// Concrete type declares several constructors carrying the injection marker
    #[error("Ambiguous injectable constructor on {type_name}: {count} constructors are marked")]
    AmbiguousInjectableConstructor {
        type_name: &'static str,
        count: usize,
    },
    /// Service requested but never bound
    #[error("Service not bound: {0}")]
    UnboundService(&'static str),
    /// Abstract binding whose redirect chain never reaches a concrete type
    #[error("No concrete implementation found for: {0}")]
    UnresolvableAbstraction(&'static str),
    /// Service reappeared in its own resolution chain (includes path)
    #[error("Dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<&'static str>),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Constructor or method asked for more arguments than it declared
    #[error("Missing argument {position} for: {owner}")]
    MissingArgument {
        owner: &'static str,
        position: usize,
    },
    /// Constructor parameter whose type has no binding (found by validation)
    #[error("{service} depends on unbound service {dependency}")]
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// User constructor reported a failure
    #[error("Construction of {type_name} failed: {message}")]
    Construction {
        type_name: &'static str,
        message: String,
    },
    /// Global container accessed before installation finished
    #[error("Container not initialized")]
    NotInitialized,
    /// Global container installed twice
    #[error("Container already initialized")]
    AlreadyInitialized,
    /// Container options could not be parsed
    #[error("Invalid container options: {0}")]
    InvalidOptions(String),
}

impl DiError {
    /// Wraps a constructor failure for type `T`.
    ///
    /// ```rust
    /// use graft_di::DiError;
    ///
    /// struct Pool;
    /// let err = DiError::construction::<Pool>("connection refused");
    /// assert!(err.to_string().ends_with("failed: connection refused"));
    /// ```
    pub fn construction<T: ?Sized>(message: impl Into<String>) -> Self {
        DiError::Construction {
            type_name: std::any::type_name::<T>(),
            message: message.into(),
        }
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
