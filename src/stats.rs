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

use fnv::FnvHashMap;

use crate::io::Rating;
use crate::types::{MovieIndex, UserIndex};

/// Maps the string identifiers of users and movies to consecutive integer indices, in the order
/// in which they first appear in the ratings.
#[derive(Debug, Default)]
pub struct DataDictionary {
    user_dict: FnvHashMap<String, UserIndex>,
    movie_dict: FnvHashMap<String, MovieIndex>,
    num_interactions: u64,
}

impl DataDictionary {

    pub fn num_users(&self) -> usize {
        self.user_dict.len()
    }

    pub fn num_movies(&self) -> usize {
        self.movie_dict.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    pub fn user_index(&self, name: &str) -> Option<UserIndex> {
        self.user_dict.get(name).cloned()
    }

    pub fn movie_index(&self, name: &str) -> Option<MovieIndex> {
        self.movie_dict.get(name).cloned()
    }

    /// Returns the index of the user, assigning the next free one on first sight.
    pub fn intern_user(&mut self, name: &str) -> UserIndex {
        intern(&mut self.user_dict, name)
    }

    /// Returns the index of the movie, assigning the next free one on first sight.
    pub fn intern_movie(&mut self, name: &str) -> MovieIndex {
        intern(&mut self.movie_dict, name)
    }

    pub fn from_ratings<'a, I>(ratings: I) -> Self
        where I: IntoIterator<Item=&'a Rating> {

        let mut data_dict = DataDictionary {
            user_dict: FnvHashMap::with_capacity_and_hasher(100, Default::default()),
            movie_dict: FnvHashMap::with_capacity_and_hasher(100, Default::default()),
            num_interactions: 0,
        };

        for rating in ratings {
            data_dict.intern_user(&rating.user);
            data_dict.intern_movie(&rating.movie);
            data_dict.num_interactions += 1;
        }

        data_dict
    }
}

fn intern(dict: &mut FnvHashMap<String, u32>, name: &str) -> u32 {
    if let Some(index) = dict.get(name) {
        return *index;
    }

    let index = dict.len() as u32;
    dict.insert(name.to_owned(), index);
    index
}

/// Inverse of the `DataDictionary`, used to report results with the original identifiers.
pub struct Renaming {
    user_names: FnvHashMap<UserIndex, String>,
    movie_names: FnvHashMap<MovieIndex, String>,
}

impl Renaming {

    pub fn user_name(&self, user_index: UserIndex) -> Option<&str> {
        self.user_names.get(&user_index).map(String::as_str)
    }

    pub fn movie_name(&self, movie_index: MovieIndex) -> Option<&str> {
        self.movie_names.get(&movie_index).map(String::as_str)
    }
}

impl From<DataDictionary> for Renaming {

    fn from(data_dict: DataDictionary) -> Self {

        let mut user_names: FnvHashMap<UserIndex, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_users(), Default::default());

        let mut movie_names: FnvHashMap<MovieIndex, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_movies(), Default::default());

        for (user, user_index) in data_dict.user_dict.into_iter() {
            user_names.insert(user_index, user);
        }

        for (movie, movie_index) in data_dict.movie_dict.into_iter() {
            movie_names.insert(movie_index, movie);
        }

        Renaming { user_names, movie_names }
    }
}
