//! Turning diagnostics into reported findings.
//!
//! Checks only produce message keys and arguments. The [`Reporter`] picks a
//! severity and renders the message through a [`MessageCatalog`].
//!
//! # Severity
//!
//! Findings get the configured diagnostic kind's severity. Keys that are
//! warnings by nature (see [`MessageKey::is_warning`]) are never reported
//! above [`Severity::Warning`].

use std::fmt;

use bvcheck_model::ElementKind;
use bvcheck_rules::{Diagnostic, DiagnosticArg, MessageKey, Severity};
use serde::{Deserialize, Serialize};

use crate::config::Configuration;

/// Renders message keys into text.
pub trait MessageCatalog: Send + Sync {
    fn render(&self, key: MessageKey, args: &[DiagnosticArg]) -> String;
}

/// English messages with positional `{0}`, `{1}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

/// Default templates, indexed by `MessageKey` discriminant.
const DEFAULT_TEMPLATES: [&str; 38] = [
    "The annotation @{0} is disallowed for this data type.",
    "The annotation @{0} is disallowed for the return type of this method.",
    "Multiple validators of the annotation @{0} apply to this data type.",
    "Multiple validators of the annotation @{0} apply to the return type of this method.",
    "Constraint annotations must not be specified at methods which are not valid JavaBeans getter methods.",
    "Constraint annotations must not be specified at methods without return value.",
    "Only non-static fields may be annotated with constraint annotations.",
    "Only non-static methods may be annotated with constraint annotations.",
    "Fields of a primitive type must not be annotated with @Valid.",
    "Methods returning a primitive type must not be annotated with @Valid.",
    "Constraint annotation types must have retention policy RUNTIME.",
    "Constraint annotation types must target at least one of METHOD, FIELD, TYPE or ANNOTATION_TYPE.",
    "Constraint annotation types must name a validator or be composed of other constraints.",
    "Constraint annotation types must declare a member \"String message()\".",
    "Constraint annotation types must declare a member \"Class<?>[] groups() default {}\".",
    "Constraint annotation types must declare a member \"Class<? extends Payload>[] payload() default {}\".",
    "The return type of \"message()\" must be String.",
    "The return type of \"groups()\" must be Class<?>[].",
    "The default value of \"groups()\" must be an empty array.",
    "The return type of \"payload()\" must be Class<? extends Payload>[].",
    "The default value of \"payload()\" must be an empty array.",
    "Only constraint annotation types may be annotated with constraint annotations.",
    "The constraint @{0} is declared both directly and within its list annotation.",
    "@GroupSequenceProvider may only be declared on a class.",
    "@GroupSequenceProvider must not be combined with @GroupSequence.",
    "The @GroupSequenceProvider value must be a concrete implementation class.",
    "The group sequence provider {0} must declare a public no-argument constructor.",
    "The group sequence provider is defined for {0}, which is not a supertype of {1}.",
    "A @GroupSequence may only list interfaces, plus the hosting class when redefining its default group sequence.",
    "The interface {0} is listed more than once in the group sequence.",
    "A group sequence interface should not extend other interfaces.",
    "A @GroupSequence on a class must list that class to redefine its default group sequence.",
    "The group sequence definition is cyclic.",
    "The cross-parameter constraint @{0} has more than one cross-parameter validator.",
    "The cross-parameter validator of @{0} must validate Object or Object[].",
    "The constraint @{0} can be cross-parameter and generic, so it must declare a member \"ConstraintTarget validationAppliesTo()\".",
    "The return type of \"validationAppliesTo()\" in @{0} must be ConstraintTarget.",
    "The default value of \"validationAppliesTo()\" in @{0} must be ConstraintTarget.IMPLICIT.",
];

impl DefaultCatalog {
    /// Template for a key, before placeholders are filled.
    pub fn template(key: MessageKey) -> &'static str {
        DEFAULT_TEMPLATES[key as usize]
    }
}

impl MessageCatalog for DefaultCatalog {
    fn render(&self, key: MessageKey, args: &[DiagnosticArg]) -> String {
        format_template(Self::template(key), args)
    }
}

/// Replace `{i}` with the `i`-th argument; placeholders without an argument
/// are left in place.
pub fn format_template(template: &str, args: &[DiagnosticArg]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |rendered, (index, arg)| {
            rendered.replace(&format!("{{{}}}", index), &arg.to_string())
        })
}

/// A finding ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedDiagnostic {
    pub severity: Severity,
    pub key: MessageKey,
    pub element_kind: ElementKind,
    /// Qualified path of the element, with parameter types for executables
    pub element: String,
    /// Simple name of the anchor annotation
    pub annotation: Option<String>,
    pub message: String,
}

impl fmt::Display for ReportedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: ", self.severity, self.element)?;
        if let Some(annotation) = &self.annotation {
            write!(f, "@{}: ", annotation)?;
        }
        write!(f, "{}", self.message)
    }
}

/// Assigns severities and renders messages.
#[derive(Debug, Clone)]
pub struct Reporter<C = DefaultCatalog> {
    catalog: C,
    severity: Severity,
}

impl Reporter<DefaultCatalog> {
    pub fn new(config: &Configuration) -> Self {
        Self::with_catalog(DefaultCatalog, config)
    }
}

impl<C: MessageCatalog> Reporter<C> {
    pub fn with_catalog(catalog: C, config: &Configuration) -> Self {
        Self {
            catalog,
            severity: config.severity(),
        }
    }

    /// Severity a finding with `key` is reported with.
    pub fn severity_for(&self, key: MessageKey) -> Severity {
        if key.is_warning() {
            self.severity.min(Severity::Warning)
        } else {
            self.severity
        }
    }

    pub fn report(&self, diagnostic: &Diagnostic) -> ReportedDiagnostic {
        ReportedDiagnostic {
            severity: self.severity_for(diagnostic.key),
            key: diagnostic.key,
            element_kind: diagnostic.element.kind,
            element: diagnostic.element.to_string(),
            annotation: diagnostic
                .anchor
                .as_ref()
                .map(|anchor| anchor.simple_name().to_string()),
            message: self.catalog.render(diagnostic.key, &diagnostic.args),
        }
    }

    pub fn report_all<'d>(
        &self,
        diagnostics: impl IntoIterator<Item = &'d Diagnostic>,
    ) -> Vec<ReportedDiagnostic> {
        diagnostics
            .into_iter()
            .map(|diagnostic| self.report(diagnostic))
            .collect()
    }
}

/// One JSON object per line.
pub fn to_json_lines(reported: &[ReportedDiagnostic]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for finding in reported {
        out.push_str(&serde_json::to_string(finding)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagnosticKind;
    use bvcheck_model::{names, AnnotationInstance, ProgramElement, TypeRef};

    fn make_diagnostic(key: MessageKey) -> Diagnostic {
        let field = ProgramElement::field("com.acme.Order.total", TypeRef::declared("java.lang.Integer"));
        Diagnostic::new(&field, Some(&AnnotationInstance::new(names::builtin::SIZE)), key)
    }

    #[test]
    fn test_every_key_has_template() {
        for key in MessageKey::ALL {
            assert!(!DefaultCatalog::template(key).is_empty(), "{}", key);
        }
    }

    #[test]
    fn test_wrong_target_lists_only_accepted_targets() {
        let message = DefaultCatalog.render(MessageKey::ConstraintTypeWithWrongTarget, &[]);
        for target in names::ALLOWED_TARGETS {
            assert!(message.contains(target), "{}", target);
        }
        assert!(!message.contains("PARAMETER"));
    }

    #[test]
    fn test_placeholders_filled() {
        let args = vec![DiagnosticArg::from("Size")];
        assert_eq!(
            DefaultCatalog.render(MessageKey::NotSupportedType, &args),
            "The annotation @Size is disallowed for this data type."
        );
        assert_eq!(format_template("{0} and {1}", &args), "Size and {1}");
    }

    #[test]
    fn test_warning_keys_capped() {
        let errors = Reporter::new(&Configuration::default());
        assert_eq!(errors.severity_for(MessageKey::NotSupportedType), Severity::Error);
        assert_eq!(
            errors.severity_for(MessageKey::InvalidGroupSequenceExtendInterfaces),
            Severity::Warning
        );

        let notes = Reporter::new(&Configuration {
            diagnostic_kind: DiagnosticKind::Note,
            ..Configuration::default()
        });
        assert_eq!(
            notes.severity_for(MessageKey::InvalidGroupSequenceExtendInterfaces),
            Severity::Note
        );
    }

    #[test]
    fn test_display_and_json() {
        let reporter = Reporter::new(&Configuration::default());
        let reported =
            reporter.report(&make_diagnostic(MessageKey::NotSupportedType).with_arg("Size"));

        assert_eq!(
            reported.to_string(),
            "error: com.acme.Order.total: @Size: The annotation @Size is disallowed for this data type."
        );

        let lines = to_json_lines(&[reported.clone(), reported]).unwrap();
        assert_eq!(lines.lines().count(), 2);
        let parsed: ReportedDiagnostic = serde_json::from_str(lines.lines().next().unwrap()).unwrap();
        assert_eq!(parsed.key, MessageKey::NotSupportedType);
        assert_eq!(parsed.annotation.as_deref(), Some("Size"));
    }
}
