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

use rand::Rng;
use tracing::info;

use crate::io::Rating;
use crate::stats::DataDictionary;
use crate::types;
use crate::types::{MovieIndex, SparseBinaryMatrix, SparseBinaryVector, UserIndex};

/// The movies each user interacted with. Users only appear once they have at least one movie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    histories: SparseBinaryMatrix,
    num_interactions: usize,
}

impl Dataset {

    pub fn new() -> Self {
        Dataset { histories: types::new_sparse_binary_matrix(100), num_interactions: 0 }
    }

    /// Records that `user` interacted with `movie`, repeated interactions are ignored.
    pub fn insert(&mut self, user: UserIndex, movie: MovieIndex) {
        let history = self.histories
            .entry(user)
            .or_insert_with(|| types::new_sparse_binary_vector(10));

        if history.insert(movie) {
            self.num_interactions += 1;
        }
    }

    pub fn history(&self, user: UserIndex) -> Option<&SparseBinaryVector> {
        self.histories.get(&user)
    }

    pub fn contains(&self, user: UserIndex, movie: MovieIndex) -> bool {
        self.histories.get(&user).map_or(false, |history| history.contains(&movie))
    }

    pub fn num_users(&self) -> usize {
        self.histories.len()
    }

    pub fn num_interactions(&self) -> usize {
        self.num_interactions
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// All users of the dataset in ascending index order.
    pub fn users(&self) -> Vec<UserIndex> {
        let mut users: Vec<UserIndex> = self.histories.keys().cloned().collect();
        users.sort_unstable();
        users
    }

    pub fn iter(&self) -> impl Iterator<Item=(&UserIndex, &SparseBinaryVector)> {
        self.histories.iter()
    }
}

/// Randomly partitions the ratings: each rating independently ends up in the training set with
/// probability `pivot`, and in the test set otherwise.
pub fn split<'a, I, R>(
    ratings: I,
    data_dict: &DataDictionary,
    pivot: f64,
    rng: &mut R,
) -> (Dataset, Dataset)
    where I: IntoIterator<Item=&'a Rating>,
          R: Rng {

    let mut training = Dataset::new();
    let mut test = Dataset::new();

    let mut num_training_ratings: u64 = 0;
    let mut num_test_ratings: u64 = 0;

    for rating in ratings {

        let (user, movie) = match (data_dict.user_index(&rating.user),
                                   data_dict.movie_index(&rating.movie)) {
            (Some(user), Some(movie)) => (user, movie),
            _ => continue,
        };

        if rng.gen::<f64>() < pivot {
            training.insert(user, movie);
            num_training_ratings += 1;
        } else {
            test.insert(user, movie);
            num_test_ratings += 1;
        }
    }

    info!(
        training = num_training_ratings,
        test = num_test_ratings,
        "split ratings into training and test set"
    );

    (training, test)
}

#[cfg(test)]
mod tests {

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{split, Dataset};
    use crate::io::Rating;
    use crate::stats::DataDictionary;

    fn ratings() -> Vec<Rating> {
        let mut ratings = Vec::new();
        for user in 0..20 {
            for movie in 0..10 {
                ratings.push(Rating::new(&user.to_string(), &movie.to_string()));
            }
        }
        ratings
    }

    #[test]
    fn duplicates_are_idempotent() {
        let mut dataset = Dataset::new();
        dataset.insert(1, 7);
        dataset.insert(1, 7);
        dataset.insert(1, 8);

        assert_eq!(dataset.num_users(), 1);
        assert_eq!(dataset.num_interactions(), 2);
        assert!(dataset.contains(1, 7));
        assert!(!dataset.contains(2, 7));
        assert!(dataset.history(2).is_none());
    }

    #[test]
    fn pivot_one_keeps_everything_for_training() {
        let ratings = ratings();
        let data_dict = DataDictionary::from_ratings(&ratings);
        let mut rng = StdRng::seed_from_u64(1);

        let (training, test) = split(&ratings, &data_dict, 1.0, &mut rng);

        assert_eq!(training.num_interactions(), 200);
        assert_eq!(training.num_users(), 20);
        assert!(test.is_empty());
    }

    #[test]
    fn pivot_zero_holds_out_everything() {
        let ratings = ratings();
        let data_dict = DataDictionary::from_ratings(&ratings);
        let mut rng = StdRng::seed_from_u64(1);

        let (training, test) = split(&ratings, &data_dict, 0.0, &mut rng);

        assert!(training.is_empty());
        assert_eq!(test.num_interactions(), 200);
    }

    #[test]
    fn every_rating_lands_in_exactly_one_set() {
        let ratings = ratings();
        let data_dict = DataDictionary::from_ratings(&ratings);
        let mut rng = StdRng::seed_from_u64(7);

        let (training, test) = split(&ratings, &data_dict, 0.75, &mut rng);

        assert_eq!(training.num_interactions() + test.num_interactions(), 200);

        for rating in &ratings {
            let user = data_dict.user_index(&rating.user).unwrap();
            let movie = data_dict.movie_index(&rating.movie).unwrap();
            assert!(training.contains(user, movie) != test.contains(user, movie));
        }
    }

    #[test]
    fn same_seed_same_split() {
        let ratings = ratings();
        let data_dict = DataDictionary::from_ratings(&ratings);

        let first = split(&ratings, &data_dict, 0.5, &mut StdRng::seed_from_u64(3));
        let second = split(&ratings, &data_dict, 0.5, &mut StdRng::seed_from_u64(3));

        assert_eq!(first, second);
    }
}
