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

//! User-based collaborative filtering on rating events.
//!
//! Users are compared by the movies they share, where each shared movie is weighted by its
//! inverse user frequency. Movies are recommended to a user from the histories of the most similar
//! users, and the resulting recommender is scored with precision, recall and coverage on held-out
//! ratings.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod index;
pub mod io;
pub mod recommend;
pub mod scored;
pub mod similarity;
pub mod stats;
pub mod types;
pub mod utils;

pub use crate::config::Config;
pub use crate::dataset::Dataset;
pub use crate::error::{Result, UserCfError};
pub use crate::evaluate::Metrics;
pub use crate::index::InteractionIndex;
pub use crate::io::Rating;
pub use crate::recommend::Recommender;
pub use crate::scored::ScoredItem;
pub use crate::similarity::{user_similarities, SimilarityMatrix};
pub use crate::stats::{DataDictionary, Renaming};

/// Splits the ratings into a training and a test set, computes the user similarities on the
/// training set and evaluates the resulting recommendations against the test set.
pub fn evaluate_ratings(ratings: &[Rating], config: &Config) -> Result<Metrics> {

    config.validate()?;

    let data_dict = DataDictionary::from_ratings(ratings);

    info!(
        interactions = data_dict.num_interactions(),
        users = data_dict.num_users(),
        movies = data_dict.num_movies(),
        "read ratings"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (training, test) = dataset::split(ratings, &data_dict, config.pivot, &mut rng);

    let index = InteractionIndex::from(&training);
    let similarities = user_similarities(&training, &index, config.num_threads);
    let recommender = Recommender::new(&training, &similarities);

    evaluate::evaluate(&recommender, &test, index.num_movies(), config)
}

/// Trains on all ratings and computes recommendations for every user. The returned `Renaming`
/// maps the indices in the recommendations back to the original identifiers.
pub fn recommend_ratings(
    ratings: &[Rating],
    config: &Config,
) -> Result<(Renaming, Vec<(types::UserIndex, Vec<ScoredItem>)>)> {

    config.validate()?;

    let data_dict = DataDictionary::from_ratings(ratings);

    let mut training = Dataset::new();
    for rating in ratings {
        if let (Some(user), Some(movie)) =
            (data_dict.user_index(&rating.user), data_dict.movie_index(&rating.movie)) {
            training.insert(user, movie);
        }
    }

    let index = InteractionIndex::from(&training);
    let similarities = user_similarities(&training, &index, config.num_threads);
    let recommender = Recommender::new(&training, &similarities);

    let recommendations = recommend::recommend_all(
        &recommender,
        &training.users(),
        config.n_sim_user,
        config.n_rec_movie,
        config.num_threads,
    );

    Ok((Renaming::from(data_dict), recommendations))
}
