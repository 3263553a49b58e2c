/*
 * UserCF
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::io;

use thiserror::Error;

/// Errors raised while loading ratings, configuring the pipeline or computing metrics.
#[derive(Debug, Error)]
pub enum UserCfError {
    /// The ratings file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A rating record does not have the expected number of fields.
    #[error("malformed rating record at line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Precision is undefined when not a single recommendation slot was issued.
    #[error("no recommendations were issued, precision is undefined")]
    NoRecommendations,

    /// Recall is undefined when no user has held-out interactions.
    #[error("no held-out interactions in the test set, recall is undefined")]
    NoHeldOutInteractions,

    #[error("no movies in the training set, coverage is undefined")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, UserCfError>;
