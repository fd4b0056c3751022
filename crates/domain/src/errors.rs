use thiserror::Error;

/// Caller-contract violations: malformed input handed to a name or
/// evaluator operation, distinct from the evaluators' own warning/error
/// taxonomy (`ferrous_dns_dnssec::errors`), which describes a validation
/// *outcome*, not a programmer mistake.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Evaluator precondition violated: {0}")]
    InvalidEvaluatorInput(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),
}
