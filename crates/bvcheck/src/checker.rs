//! Checker entry point.
//!
//! [`ConstraintChecker`] owns the dispatcher built from a [`Configuration`]
//! and borrows the two collaborator services for its whole lifetime. Checking
//! one annotation is classification, dispatch and a check-list run:
//!
//! ```text
//! classify(annotation) ─┐
//!                       ├─→ dispatcher.resolve(kind, classification) ─→ list.run(element, annotation)
//! element.kind ─────────┘
//! ```

use bvcheck_model::{
    AnnotationInstance, ConstraintClassifier, ProgramElement, TypeResolver, TypeUniverse,
};
use bvcheck_rules::{CheckContext, CheckDispatcher, DiagnosticSet};
use tracing::{debug, info, trace};

use crate::config::Configuration;

/// Checks annotated program elements.
///
/// Holds no per-call state: the same checker may be shared across threads
/// and used for any number of elements.
pub struct ConstraintChecker<'a> {
    types: &'a dyn TypeResolver,
    constraints: &'a dyn ConstraintClassifier,
    dispatcher: CheckDispatcher,
    config: Configuration,
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(
        types: &'a dyn TypeResolver,
        constraints: &'a dyn ConstraintClassifier,
        config: Configuration,
    ) -> Self {
        let dispatcher = CheckDispatcher::new(types, config.dispatch_options());
        debug!(
            method_constraints_supported = config.method_constraints_supported,
            "constraint checker ready"
        );
        Self {
            types,
            constraints,
            dispatcher,
            config,
        }
    }

    /// Checker over an in-memory universe serving both services.
    pub fn for_universe(universe: &'a TypeUniverse, config: Configuration) -> Self {
        Self::new(universe, universe, config)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Check one annotation on the element carrying it.
    pub fn check(&self, element: &ProgramElement, annotation: &AnnotationInstance) -> DiagnosticSet {
        let classification = self.constraints.classify(annotation);
        let list = self.dispatcher.resolve(element.kind, classification);
        let ctx = CheckContext::new(self.types, self.constraints);
        let diagnostics = list.run(element, annotation, &ctx);

        if self.config.verbose {
            info!(
                element = %element.path,
                annotation = %annotation.annotation_type,
                findings = diagnostics.len(),
                "checked annotation"
            );
        } else {
            trace!(
                element = %element.path,
                annotation = %annotation.annotation_type,
                classification = ?classification,
                findings = diagnostics.len(),
                "checked annotation"
            );
        }
        diagnostics
    }

    /// Check every annotation attached directly to `element`.
    pub fn check_element(&self, element: &ProgramElement) -> DiagnosticSet {
        let mut diagnostics = DiagnosticSet::new();
        for annotation in &element.annotations {
            diagnostics.extend(self.check(element, annotation));
        }
        diagnostics
    }

    /// Check `element` and, recursively, every member it encloses.
    pub fn check_declaration(&self, element: &ProgramElement) -> DiagnosticSet {
        let mut diagnostics = self.check_element(element);
        for member in &element.enclosed {
            diagnostics.extend(self.check_declaration(member));
        }
        diagnostics
    }
}
