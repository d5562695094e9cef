//! Parsing failures for the HTTP control plane.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FlagParseError {
    #[error("invalid profile id: {0}")]
    InvalidProfileId(String),

    #[error("unknown flag name: {0}")]
    UnknownFlag(String),

    #[error("the None flag cannot be set")]
    NoneFlagRejected,

    #[error("invalid enabled value: {0}, expected true or false")]
    InvalidEnabled(String),
}
