use thiserror::Error;

use crate::PlanError;

/// Malformed planner input. These are caller bugs, reported at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("vision radius must be non-negative, got {0}")]
    NegativeRadius(i32),
    #[error("color dimension must be non-zero")]
    ZeroColorDimension,
    #[error("vision buffer has {found} floats, expected {expected}")]
    BufferLength { expected: usize, found: usize },
    #[error("{name} signature has {found} channels, expected {expected}")]
    SignatureLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("search produced an invalid plan: {0}")]
    InvalidPlan(#[from] PlanError),
}
