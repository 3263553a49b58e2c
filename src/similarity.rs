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

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use fnv::FnvHashMap;
use scoped_pool::Pool;
use tracing::info;

use crate::dataset::Dataset;
use crate::index::InteractionIndex;
use crate::types;
use crate::types::{MovieIndex, SparseMatrix, SparseVector, UserIndex};
use crate::utils;

type SharedMovies = FnvHashMap<UserIndex, Vec<MovieIndex>>;

/// The movies shared by each ordered pair of distinct users. Both directions of a pair hold the
/// same movies in the same order.
pub struct CooccurrenceAccumulator {
    shared: FnvHashMap<UserIndex, SharedMovies>,
    num_cooccurrences: u64,
}

impl CooccurrenceAccumulator {

    pub fn shared_movies(&self, user: UserIndex, other_user: UserIndex) -> Option<&[MovieIndex]> {
        self.shared.get(&user)
            .and_then(|shared_per_user| shared_per_user.get(&other_user))
            .map(Vec::as_slice)
    }

    /// Number of ordered user pairs with at least one shared movie.
    pub fn num_pairs(&self) -> usize {
        self.shared.values().map(|shared_per_user| shared_per_user.len()).sum()
    }

    /// Number of pair generations, each one records a movie for an ordered pair.
    pub fn num_cooccurrences(&self) -> u64 {
        self.num_cooccurrences
    }
}

impl<'a> From<&'a InteractionIndex> for CooccurrenceAccumulator {

    fn from(index: &'a InteractionIndex) -> Self {

        let mut shared: FnvHashMap<UserIndex, SharedMovies> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());
        let mut num_cooccurrences: u64 = 0;

        for (movie, users) in index.iter() {
            for user in users.iter() {

                let shared_per_user = shared
                    .entry(*user)
                    .or_insert_with(|| FnvHashMap::with_capacity_and_hasher(10, Default::default()));

                for other_user in users.iter() {
                    if other_user != user {
                        shared_per_user
                            .entry(*other_user)
                            .or_insert_with(Vec::new)
                            .push(*movie);

                        num_cooccurrences += 1;
                    }
                }
            }
        }

        // Users which are the only ones to have seen their movies share nothing
        shared.retain(|_, shared_per_user| !shared_per_user.is_empty());

        CooccurrenceAccumulator { shared, num_cooccurrences }
    }
}

/// Precompute the inverse user frequency `1 / log10(1 + n)` for movies seen by `n` users,
/// for all `n < max_popularity`.
pub fn iuf_table(max_popularity: usize) -> Vec<f64> {

    (0..max_popularity)
        .map(|popularity| {
            if popularity == 0 {
                0.0
            } else {
                1.0 / (1.0 + popularity as f64).log10()
            }
        })
        .collect()
}

/// Pairwise similarities between users who share at least one movie. The matrix is symmetric
/// and has no entries on the diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: SparseMatrix,
}

impl SimilarityMatrix {

    pub fn similarity(&self, user: UserIndex, other_user: UserIndex) -> Option<f64> {
        self.rows.get(&user)
            .and_then(|row| row.get(&other_user))
            .cloned()
    }

    /// The similarities of all users sharing a movie with `user`.
    pub fn neighbors(&self, user: UserIndex) -> Option<&SparseVector> {
        self.rows.get(&user)
    }

    pub fn num_users(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item=(&UserIndex, &SparseVector)> {
        self.rows.iter()
    }
}

/// Computes the similarity of every pair of users sharing at least one movie. Each shared movie
/// contributes its inverse user frequency, the sum is normalized by the geometric mean of the
/// sizes of both users' training histories. Rows are computed in parallel on `pool_size` threads.
pub fn user_similarities(
    training: &Dataset,
    index: &InteractionIndex,
    pool_size: usize,
) -> SimilarityMatrix {

    let start = Instant::now();

    let cooccurrences = CooccurrenceAccumulator::from(index);

    let max_popularity = index.iter()
        .map(|(_, users)| users.len())
        .max()
        .unwrap_or(0);
    let pre_computed_iufs = iuf_table(max_popularity + 1);

    let rows: Vec<(&UserIndex, &SharedMovies)> = cooccurrences.shared.iter().collect();
    let chunk_size = utils::chunk_size(rows.len(), pool_size * 4);

    let computed_rows: Vec<Mutex<Vec<(UserIndex, SparseVector)>>> = rows.chunks(chunk_size)
        .map(|chunk| Mutex::new(Vec::with_capacity(chunk.len())))
        .collect();

    let pool = Pool::new(pool_size.max(1));

    pool.scoped(|scope| {
        for (chunk, computed) in rows.chunks(chunk_size).zip(computed_rows.iter()) {

            let reference_to_index = index;
            let reference_to_pre_computed_iufs = &pre_computed_iufs;

            scope.execute(move || {
                let mut computed = computed.lock().unwrap_or_else(PoisonError::into_inner);

                for (user, shared_per_user) in chunk.iter() {
                    let row = similarity_row(
                        **user,
                        shared_per_user,
                        training,
                        reference_to_index,
                        reference_to_pre_computed_iufs,
                    );

                    computed.push((**user, row));
                }
            });
        }
    });

    pool.shutdown();

    let mut similarities = types::new_sparse_matrix(rows.len());

    for computed in computed_rows.into_iter() {
        let computed = computed.into_inner().unwrap_or_else(PoisonError::into_inner);
        similarities.extend(computed);
    }

    info!(
        pairs = cooccurrences.num_pairs(),
        cooccurrences = cooccurrences.num_cooccurrences(),
        millis = utils::to_millis(start.elapsed()),
        "computed user similarity matrix"
    );

    SimilarityMatrix { rows: similarities }
}

/// Every user of the accumulator and each of their co-raters have at least one training movie,
/// so the norm is never zero.
fn similarity_row(
    user: UserIndex,
    shared_per_user: &SharedMovies,
    training: &Dataset,
    index: &InteractionIndex,
    pre_computed_iufs: &[f64],
) -> SparseVector {

    let num_movies_of_user = history_len(training, user);
    let mut row = types::new_sparse_vector(shared_per_user.len());

    for (other_user, shared_movies) in shared_per_user.iter() {

        let raw_similarity: f64 = shared_movies.iter()
            .map(|movie| pre_computed_iufs[index.popularity(*movie)])
            .sum();

        let num_movies_of_other_user = history_len(training, *other_user);
        let norm = ((num_movies_of_user * num_movies_of_other_user) as f64).sqrt();

        row.insert(*other_user, raw_similarity / norm);
    }

    row
}

fn history_len(training: &Dataset, user: UserIndex) -> usize {
    training.history(user).map_or(0, |history| history.len())
}
