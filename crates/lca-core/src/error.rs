use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Negative value for {what}: {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Unknown unit '{unit}' for property {property}")]
    UnknownUnit { unit: String, property: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
