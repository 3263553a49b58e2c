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

use tracing::info;

use crate::dataset::Dataset;
use crate::types;
use crate::types::{MovieIndex, SparseBinaryMatrix, SparseBinaryVector};

/// Inverted index from each movie to the users who interacted with it in the training set.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionIndex {
    users_per_movie: SparseBinaryMatrix,
}

impl InteractionIndex {

    /// The users which interacted with `movie`, if any did.
    pub fn users(&self, movie: MovieIndex) -> Option<&SparseBinaryVector> {
        self.users_per_movie.get(&movie)
    }

    /// Number of users which interacted with `movie`.
    pub fn popularity(&self, movie: MovieIndex) -> usize {
        self.users_per_movie.get(&movie).map_or(0, |users| users.len())
    }

    /// Number of distinct movies in the training set.
    pub fn num_movies(&self) -> usize {
        self.users_per_movie.len()
    }

    pub fn iter(&self) -> impl Iterator<Item=(&MovieIndex, &SparseBinaryVector)> {
        self.users_per_movie.iter()
    }
}

impl<'a> From<&'a Dataset> for InteractionIndex {

    fn from(training: &'a Dataset) -> Self {

        let mut users_per_movie = types::new_sparse_binary_matrix(training.num_users() * 10);

        for (user, history) in training.iter() {
            for movie in history.iter() {
                users_per_movie
                    .entry(*movie)
                    .or_insert_with(|| types::new_sparse_binary_vector(10))
                    .insert(*user);
            }
        }

        info!(movies = users_per_movie.len(), "built movie-user index");

        InteractionIndex { users_per_movie }
    }
}
