//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A constructor or step argument is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unit-charge shorthand was given something other than `+` or `-`.
    #[error("invalid charge sign {0:?}, expected \"+\" or \"-\"")]
    InvalidChargeSign(String),

    /// Two particle centres coincide, so inverse-square quantities are undefined.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    #[error("cannot take the direction of a zero-length or non-finite vector")]
    DegenerateVector,

    /// An update produced NaN or infinity; the previous state was kept.
    #[error("non-finite state: {0}")]
    NonFiniteState(String),

    #[error("unknown particle handle {0}")]
    UnknownParticle(usize),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    TomlDeserialize(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
