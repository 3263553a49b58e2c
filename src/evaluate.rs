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

use std::fmt;
use std::time::Instant;

use serde_derive::Serialize;
use tracing::info;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Result, UserCfError};
use crate::recommend::{recommend_all, Recommender};
use crate::types;
use crate::utils;

/// Offline quality of a recommender, measured against held-out interactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub coverage: f64,
    pub hits: u64,
    pub rec_count: u64,
    pub test_count: u64,
    pub num_recommended_movies: usize,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "precision={:.4}\trecall={:.4}\tcoverage={:.4}",
            self.precision, self.recall, self.coverage)
    }
}

/// Generates `n_rec_movie` recommendations for every user of the training set and compares them
/// to the user's held-out movies in `test`.
///
/// Every evaluated user counts `n_rec_movie` against precision, even if fewer movies could be
/// recommended. Coverage is the fraction of the `num_movies` training movies recommended to
/// anyone. Undefined ratios are reported as errors.
pub fn evaluate(
    recommender: &Recommender,
    test: &Dataset,
    num_movies: usize,
    config: &Config,
) -> Result<Metrics> {

    let start = Instant::now();
    let users = recommender.training().users();

    info!(users = users.len(), "evaluation start");

    let recommendations = recommend_all(
        recommender,
        &users,
        config.n_sim_user,
        config.n_rec_movie,
        config.num_threads,
    );

    let mut hits: u64 = 0;
    let mut rec_count: u64 = 0;
    let mut test_count: u64 = 0;
    let mut all_rec_movies = types::new_sparse_binary_vector(num_movies);

    for (user, recommended) in recommendations.iter() {

        let test_movies = test.history(*user);

        for scored_item in recommended.iter() {
            if test_movies.map_or(false, |movies| movies.contains(&scored_item.item)) {
                hits += 1;
            }
            all_rec_movies.insert(scored_item.item);
        }

        rec_count += config.n_rec_movie as u64;
        test_count += test_movies.map_or(0, |movies| movies.len() as u64);
    }

    if rec_count == 0 {
        return Err(UserCfError::NoRecommendations);
    }

    if test_count == 0 {
        return Err(UserCfError::NoHeldOutInteractions);
    }

    if num_movies == 0 {
        return Err(UserCfError::EmptyCatalog);
    }

    let metrics = Metrics {
        precision: hits as f64 / rec_count as f64,
        recall: hits as f64 / test_count as f64,
        coverage: all_rec_movies.len() as f64 / num_movies as f64,
        hits,
        rec_count,
        test_count,
        num_recommended_movies: all_rec_movies.len(),
    };

    info!(
        precision = metrics.precision,
        recall = metrics.recall,
        coverage = metrics.coverage,
        millis = utils::to_millis(start.elapsed()),
        "evaluation done"
    );

    Ok(metrics)
}
