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

use scoped_pool::Pool;

use crate::dataset::Dataset;
use crate::scored;
use crate::scored::ScoredItem;
use crate::similarity::SimilarityMatrix;
use crate::types;
use crate::types::UserIndex;
use crate::utils;

/// Recommends movies to a user from the training histories of their most similar users.
pub struct Recommender<'a> {
    training: &'a Dataset,
    similarities: &'a SimilarityMatrix,
}

impl<'a> Recommender<'a> {

    pub fn new(training: &'a Dataset, similarities: &'a SimilarityMatrix) -> Self {
        Recommender { training, similarities }
    }

    pub fn training(&self) -> &'a Dataset {
        self.training
    }

    /// The `k` users most similar to `user`, by descending similarity.
    pub fn nearest_neighbors(&self, user: UserIndex, k: usize) -> Vec<ScoredItem> {
        match self.similarities.neighbors(user) {
            Some(neighbors) => {
                let candidates = neighbors.iter()
                    .map(|(other_user, similarity)| {
                        ScoredItem { item: *other_user, score: *similarity }
                    });

                scored::top_k(candidates, k)
            },
            None => Vec::new(),
        }
    }

    /// Up to `n` movies the user has not seen yet, by descending score. The score of a movie is
    /// the sum of the similarities of those of the `k` nearest neighbors who have seen it. Users
    /// without neighbors get no recommendations.
    pub fn recommend(&self, user: UserIndex, k: usize, n: usize) -> Vec<ScoredItem> {

        let neighbors = self.nearest_neighbors(user, k);

        if neighbors.is_empty() {
            return Vec::new();
        }

        let watched_movies = self.training.history(user);
        let mut rank = types::new_sparse_vector(n.saturating_mul(10).min(1_024));

        for neighbor in neighbors.iter() {

            let history = match self.training.history(neighbor.item) {
                Some(history) => history,
                None => continue,
            };

            for movie in history.iter() {

                let already_watched = watched_movies
                    .map_or(false, |watched| watched.contains(movie));

                if !already_watched {
                    *rank.entry(*movie).or_insert(0.0) += neighbor.score;
                }
            }
        }

        let candidates = rank.into_iter()
            .map(|(movie, score)| ScoredItem { item: movie, score });

        scored::top_k(candidates, n)
    }
}

/// Computes recommendations for all given `users` on `pool_size` threads. The result holds one
/// entry per user, in the order of `users`.
pub fn recommend_all(
    recommender: &Recommender,
    users: &[UserIndex],
    k: usize,
    n: usize,
    pool_size: usize,
) -> Vec<(UserIndex, Vec<ScoredItem>)> {

    let chunk_size = utils::chunk_size(users.len(), pool_size * 4);

    let recommendations: Vec<Mutex<Vec<(UserIndex, Vec<ScoredItem>)>>> = users.chunks(chunk_size)
        .map(|chunk| Mutex::new(Vec::with_capacity(chunk.len())))
        .collect();

    let pool = Pool::new(pool_size.max(1));

    pool.scoped(|scope| {
        for (chunk, recommendations_for_chunk) in users.chunks(chunk_size).zip(recommendations.iter()) {
            scope.execute(move || {
                let mut recommendations_for_chunk = recommendations_for_chunk.lock()
                    .unwrap_or_else(PoisonError::into_inner);

                for user in chunk.iter() {
                    recommendations_for_chunk.push((*user, recommender.recommend(*user, k, n)));
                }
            });
        }
    });

    pool.shutdown();

    recommendations.into_iter()
        .flat_map(|recommendations_for_chunk| {
            recommendations_for_chunk.into_inner().unwrap_or_else(PoisonError::into_inner)
        })
        .collect()
}

#[cfg(test)]
mod tests {

    use proptest::prelude::*;

    use super::{recommend_all, Recommender};
    use crate::dataset::Dataset;
    use crate::index::InteractionIndex;
    use crate::similarity::{user_similarities, SimilarityMatrix};

    const A: u32 = 0;
    const B: u32 = 1;
    const C: u32 = 2;
    const D: u32 = 3;
    const E: u32 = 4;

    const M1: u32 = 0;
    const M2: u32 = 1;
    const M3: u32 = 2;
    const M4: u32 = 3;
    const M5: u32 = 4;

    fn training() -> Dataset {
        let mut training = Dataset::new();

        training.insert(A, M1);
        training.insert(A, M2);

        training.insert(B, M1);
        training.insert(B, M2);
        training.insert(B, M3);

        training.insert(C, M1);
        training.insert(C, M4);

        training.insert(D, M2);
        training.insert(D, M3);
        training.insert(D, M4);

        training.insert(E, M5);
        training
    }

    fn similarities(training: &Dataset) -> SimilarityMatrix {
        user_similarities(training, &InteractionIndex::from(training), 2)
    }

    fn close_enough_to(value: f64, expected: f64) -> bool {
        (value - expected).abs() < 1e-9
    }

    #[test]
    fn never_recommends_watched_movies() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let recommended = recommender.recommend(A, 20, 10);

        let movies: Vec<u32> = recommended.iter().map(|scored| scored.item).collect();
        assert_eq!(movies.len(), 2);
        assert!(movies.contains(&M3));
        assert!(movies.contains(&M4));
        assert!(!movies.contains(&M1));
        assert!(!movies.contains(&M2));
    }

    #[test]
    fn scores_add_up_over_neighbors() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let ab = similarities.similarity(A, B).unwrap();
        let ac = similarities.similarity(A, C).unwrap();
        let ad = similarities.similarity(A, D).unwrap();

        let recommended = recommender.recommend(A, 20, 10);

        let m3 = recommended.iter().find(|scored| scored.item == M3).unwrap();
        let m4 = recommended.iter().find(|scored| scored.item == M4).unwrap();

        // m3 is known to b and d, m4 to c and d
        assert!(close_enough_to(m3.score, ab + ad));
        assert!(close_enough_to(m4.score, ac + ad));
    }

    #[test]
    fn only_the_nearest_neighbors_contribute() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let nearest = recommender.nearest_neighbors(A, 1);
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].item, B);

        let recommended = recommender.recommend(A, 1, 10);

        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].item, M3);
        assert!(close_enough_to(recommended[0].score, similarities.similarity(A, B).unwrap()));
    }

    #[test]
    fn truncates_to_n_in_descending_order() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let recommended = recommender.recommend(C, 20, 1);
        assert_eq!(recommended.len(), 1);

        let all = recommender.recommend(C, 20, 10);
        assert!(all.len() > 1);
        assert_eq!(all[0], recommended[0]);

        for pair in all.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn users_without_neighbors_get_nothing() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        assert!(recommender.recommend(E, 20, 10).is_empty());
        assert!(recommender.recommend(42, 20, 10).is_empty());
        assert!(recommender.recommend(A, 0, 10).is_empty());
        assert!(recommender.recommend(A, 20, 0).is_empty());
    }

    #[test]
    fn huge_recommendation_lists_return_all_candidates() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let recommended = recommender.recommend(A, 20, usize::MAX / 4);

        assert_eq!(recommended.len(), 2);
        assert_eq!(recommended, recommender.recommend(A, 20, 10));
    }

    #[test]
    fn batch_matches_single_recommendations() {
        let training = training();
        let similarities = similarities(&training);
        let recommender = Recommender::new(&training, &similarities);

        let users = training.users();
        let batch = recommend_all(&recommender, &users, 20, 2, 3);

        assert_eq!(batch.len(), users.len());

        for ((user, recommended), expected_user) in batch.iter().zip(users.iter()) {
            assert_eq!(user, expected_user);
            assert_eq!(recommended, &recommender.recommend(*user, 20, 2));
        }
    }

    proptest! {

        #[test]
        fn recommendation_properties(
            interactions in prop::collection::vec((0_u32..12, 0_u32..25), 1..150),
            k in 1_usize..8,
            n in 0_usize..8,
        ) {
            let mut training = Dataset::new();
            for (user, movie) in &interactions {
                training.insert(*user, *movie);
            }

            let similarities = similarities(&training);
            let recommender = Recommender::new(&training, &similarities);

            for user in training.users() {
                let recommended = recommender.recommend(user, k, n);

                prop_assert!(recommended.len() <= n);

                for scored in recommended.iter() {
                    prop_assert!(!training.contains(user, scored.item));
                    prop_assert!(scored.score >= 0.0);
                }

                for pair in recommended.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                }

                prop_assert_eq!(&recommended, &recommender.recommend(user, k, n));
            }
        }
    }
}
