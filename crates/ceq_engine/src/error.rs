use thiserror::Error;

/// Errors from normalization, isolation and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("division by an expression that is identically zero")]
    ZeroDenominator,

    #[error("cannot isolate `{symbol}`: unsupported equation shape")]
    CannotIsolate { symbol: String },

    #[error("degree {degree} in `{symbol}` exceeds quadratic support")]
    DegreeTooHigh { symbol: String, degree: u32 },

    #[error("no value bound for symbol `{symbol}`")]
    UnboundSymbol { symbol: String },

    #[error("cannot evaluate unknown function `{symbol}`")]
    UnknownFunction { symbol: String },

    #[error("numeric evaluation produced a non-finite value")]
    NonFinite,
}
