//! Diagnostic error types for the knowledge core.
//!
//! The reasoning surface deliberately has no fatal errors: lookups signal
//! not-found with `Option`, referential mutation failures return `bool`, and
//! a failing inference rule is logged and skipped. The error types here cover
//! the two places where something can genuinely go wrong — serialization of
//! an export and the body of an inference rule — with miette `#[diagnostic]`
//! derives providing error codes and help text.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the knowledge core.
#[derive(Debug, Error, Diagnostic)]
pub enum KgError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("JSON serialization failed: {source}")]
    #[diagnostic(
        code(kg::export::json),
        help(
            "A concept attribute or binding metadata value could not be \
             serialized. Check for non-finite floats in attribute maps."
        )
    )]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Inference rule errors
// ---------------------------------------------------------------------------

/// Errors an inference rule may return.
///
/// A rule failure never aborts an inference pass: the knowledge graph logs
/// the rule name and entity key, skips the rule, and continues with the
/// remaining rules and the relationship-based inference.
#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    #[error("rule references unknown concept: {concept_id}")]
    #[diagnostic(
        code(kg::rule::unknown_concept),
        help(
            "The rule expected a concept that no registered ontology defines. \
             Register the ontology that provides it, or guard the rule with \
             a get_concept check."
        )
    )]
    UnknownConcept { concept_id: String },

    #[error("rule requires feature {feature} which the binding does not carry")]
    #[diagnostic(
        code(kg::rule::missing_feature),
        help(
            "The entity binding has no such feature. Populate it via \
             bind_entity or update_entity_features before running inference."
        )
    )]
    MissingFeature { feature: String },

    #[error("inference rule failed: {message}")]
    #[diagnostic(
        code(kg::rule::failed),
        help("The rule body reported an internal failure. See the message for details.")
    )]
    Failed { message: String },
}

/// Convenience alias for functions returning knowledge-core results.
pub type KgResult<T> = std::result::Result<T, KgError>;
