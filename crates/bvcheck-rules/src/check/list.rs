//! Ordered check sequences and their two composition strategies.

use std::fmt;
use std::sync::Arc;

use bvcheck_model::{AnnotationInstance, CheckTarget, ProgramElement};
use tracing::trace;

use super::{run_check, Check, CheckContext};
use crate::error::DiagnosticSet;

/// How the checks of a list combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composition {
    /// Run checks in order; the first non-empty result is the result.
    ///
    /// Later checks may rely on earlier ones having passed.
    ShortCircuit,

    /// Decompose a list-container annotation into its parts and run the
    /// short-circuit sequence once per part, unioning the results.
    DecomposeAndAggregate,
}

/// An ordered, immutable sequence of checks.
///
/// Built once by the dispatcher and shared read-only across runs.
#[derive(Clone)]
pub struct CheckList {
    checks: Vec<Arc<dyn Check>>,
    composition: Composition,
}

impl CheckList {
    /// A list that reports nothing.
    pub fn empty() -> Self {
        Self::short_circuit(Vec::new())
    }

    pub fn short_circuit(checks: Vec<Arc<dyn Check>>) -> Self {
        Self {
            checks,
            composition: Composition::ShortCircuit,
        }
    }

    pub fn aggregate(checks: Vec<Arc<dyn Check>>) -> Self {
        Self {
            checks,
            composition: Composition::DecomposeAndAggregate,
        }
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Names of the checks, in order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Run the list against an annotated element.
    ///
    /// Elements without a check target (constructors, parameters) yield no
    /// findings.
    pub fn run(
        &self,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        let Some(target) = element.kind.check_target() else {
            return DiagnosticSet::new();
        };
        if self.checks.is_empty() {
            return DiagnosticSet::new();
        }

        match self.composition {
            Composition::ShortCircuit => self.run_sequence(target, element, annotation, ctx),
            Composition::DecomposeAndAggregate => {
                let mut diagnostics = DiagnosticSet::new();
                for part in ctx.constraints.decompose_multi_valued(annotation) {
                    diagnostics.extend(self.run_sequence(target, element, &part, ctx));
                }
                diagnostics
            }
        }
    }

    fn run_sequence(
        &self,
        target: CheckTarget,
        element: &ProgramElement,
        annotation: &AnnotationInstance,
        ctx: &CheckContext<'_>,
    ) -> DiagnosticSet {
        for check in &self.checks {
            let diagnostics = run_check(check.as_ref(), target, element, annotation, ctx);
            if !diagnostics.is_empty() {
                trace!(
                    check = check.name(),
                    element = %element.path,
                    annotation = %annotation.annotation_type,
                    findings = diagnostics.len(),
                    "check list stopped"
                );
                return diagnostics;
            }
        }
        DiagnosticSet::new()
    }
}

impl fmt::Debug for CheckList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckList")
            .field("checks", &self.check_names())
            .field("composition", &self.composition)
            .finish()
    }
}
