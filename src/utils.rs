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

use std::time::Duration;

pub fn to_millis(duration: Duration) -> u64 {
    (duration.as_secs() * 1_000) + (duration.subsec_nanos() / 1_000_000) as u64
}

/// Number of worker threads used when none is configured.
pub fn default_pool_size() -> usize {
    num_cpus::get().max(1)
}

/// Splits `len` units of work into at most `num_workers` chunks of roughly equal size.
pub fn chunk_size(len: usize, num_workers: usize) -> usize {
    let num_workers = num_workers.max(1);
    ((len + num_workers - 1) / num_workers).max(1)
}

#[cfg(test)]
mod tests {

    use std::time::Duration;

    use super::{chunk_size, to_millis};

    #[test]
    fn millis() {
        assert_eq!(to_millis(Duration::from_millis(1_234)), 1_234);
        assert_eq!(to_millis(Duration::new(2, 999_999)), 2_000);
    }

    #[test]
    fn chunks() {
        assert_eq!(chunk_size(10, 3), 4);
        assert_eq!(chunk_size(9, 3), 3);
        assert_eq!(chunk_size(0, 4), 1);
        assert_eq!(chunk_size(5, 0), 5);
    }
}
