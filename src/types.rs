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

use fnv::{FnvHashMap, FnvHashSet};

/// Consecutive index of a user, assigned by the `DataDictionary`.
pub type UserIndex = u32;
/// Consecutive index of a movie, assigned by the `DataDictionary`.
pub type MovieIndex = u32;

pub type SparseBinaryVector = FnvHashSet<u32>;
pub type SparseBinaryMatrix = FnvHashMap<u32, SparseBinaryVector>;

pub type SparseVector = FnvHashMap<u32, f64>;
pub type SparseMatrix = FnvHashMap<u32, SparseVector>;

pub fn new_sparse_binary_vector(capacity: usize) -> SparseBinaryVector {
    FnvHashSet::with_capacity_and_hasher(capacity, Default::default())
}

pub fn new_sparse_binary_matrix(capacity: usize) -> SparseBinaryMatrix {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}

pub fn new_sparse_vector(capacity: usize) -> SparseVector {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}

pub fn new_sparse_matrix(capacity: usize) -> SparseMatrix {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}
