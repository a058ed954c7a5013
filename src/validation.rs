//! Static validation of a frozen container.
//!
//! Walks the binding graph (constructor parameters and alias targets)
//! without constructing anything, so configuration errors that would
//! otherwise surface on first resolution can be caught at startup.

use std::collections::HashMap;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::Container;

/// A problem found by [`Container::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A constructor parameter or alias target has no binding.
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// An abstract binding that points at itself.
    UnresolvableAbstraction(&'static str),
    /// A dependency cycle; first and last element are the same service.
    Cycle(Vec<&'static str>),
}

impl From<ValidationIssue> for DiError {
    fn from(issue: ValidationIssue) -> Self {
        match issue {
            ValidationIssue::MissingDependency { service, dependency } => {
                DiError::MissingDependency { service, dependency }
            }
            ValidationIssue::UnresolvableAbstraction(service) => DiError::UnresolvableAbstraction(service),
            ValidationIssue::Cycle(path) => DiError::DependencyCycle(path),
        }
    }
}

/// Outcome of [`Container::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
    checked: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Number of descriptors inspected.
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// `Ok` when valid, otherwise the first issue as a [`DiError`].
    pub fn into_result(self) -> DiResult<()> {
        match self.issues.into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(issue.into()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl Container {
    /// Checks every binding without constructing any service.
    ///
    /// # Examples
    ///
    /// ```
    /// use graft_di::{Binder, Constructor, Injectable, TypeShape, ValidationIssue};
    ///
    /// struct Repo;
    /// struct Handler;
    /// impl Injectable for Handler {
    ///     fn shape() -> TypeShape {
    ///         TypeShape::concrete(vec![
    ///             Constructor::<Self>::new("new")
    ///                 .inject()
    ///                 .param::<Repo>()
    ///                 .build(|_| Ok(Handler)),
    ///         ])
    ///     }
    /// }
    ///
    /// let mut binder = Binder::new();
    /// binder.bind_singleton::<Handler>().unwrap();
    /// let report = binder.build().unwrap().validate();
    ///
    /// assert!(!report.is_valid());
    /// assert!(matches!(
    ///     report.issues()[0],
    ///     ValidationIssue::MissingDependency { .. }
    /// ));
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut marks: HashMap<Key, Mark> = HashMap::new();
        let mut stack: Vec<Key> = Vec::new();

        for descriptor in self.descriptors() {
            report.checked += 1;
            for dependency in self.edges(descriptor, &mut report) {
                if !self.contains_key(&dependency) {
                    report.issues.push(ValidationIssue::MissingDependency {
                        service: descriptor.service_key().display_name(),
                        dependency: dependency.display_name(),
                    });
                }
            }
        }

        for descriptor in self.descriptors() {
            self.visit(descriptor.service_key(), &mut marks, &mut stack, &mut report.issues);
        }

        if !report.is_valid() {
            tracing::warn!(issues = report.issues.len(), "container validation found issues");
        }
        report
    }

    fn contains_key(&self, key: &Key) -> bool {
        self.descriptor(key).is_some()
    }

    /// Outgoing edges; reports self-referencing aliases as it goes.
    fn edges(&self, descriptor: &ServiceDescriptor, report: &mut ValidationReport) -> Vec<Key> {
        if !descriptor.is_alias() {
            return descriptor.dependencies().to_vec();
        }
        let target = descriptor.effective_implementation();
        if target == descriptor.service_key() {
            report
                .issues
                .push(ValidationIssue::UnresolvableAbstraction(target.display_name()));
            return Vec::new();
        }
        vec![target]
    }

    fn alias_target(descriptor: &ServiceDescriptor) -> Option<Key> {
        let target = descriptor.effective_implementation();
        (descriptor.is_alias() && target != descriptor.service_key()).then_some(target)
    }

    fn visit(
        &self,
        key: Key,
        marks: &mut HashMap<Key, Mark>,
        stack: &mut Vec<Key>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        match marks.get(&key) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                if let Some(start) = stack.iter().position(|k| *k == key) {
                    let mut cycle: Vec<&'static str> =
                        stack[start..].iter().map(Key::display_name).collect();
                    cycle.push(key.display_name());
                    issues.push(ValidationIssue::Cycle(cycle));
                }
                return;
            }
            None => {}
        }

        let Some(descriptor) = self.descriptor(&key) else {
            return;
        };
        // Instance bindings never construct anything
        if descriptor.is_instance_binding() {
            marks.insert(key, Mark::Done);
            return;
        }

        marks.insert(key, Mark::Visiting);
        stack.push(key);
        let next: Vec<Key> = match Self::alias_target(descriptor) {
            Some(target) => vec![target],
            None => descriptor.dependencies().to_vec(),
        };
        for dependency in next {
            self.visit(dependency, marks, stack, issues);
        }
        stack.pop();
        marks.insert(key, Mark::Done);
    }
}
