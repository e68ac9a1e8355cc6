// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::ShapeId;

/// Error returned by fallible [`DistanceField`](crate::DistanceField) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// No shape is registered under this id.
    UnknownShape(ShapeId),
    /// A shape is already registered under this id.
    DuplicateShape(ShapeId),
    /// The grid resolution must be at least one cell.
    InvalidResolution(usize),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownShape(id) => write!(f, "no shape registered as {id}"),
            Self::DuplicateShape(id) => write!(f, "shape {id} is already registered"),
            Self::InvalidResolution(n) => write!(f, "invalid grid resolution {n}"),
        }
    }
}

impl core::error::Error for FieldError {}
