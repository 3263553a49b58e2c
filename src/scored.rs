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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A user or movie index together with a score, used to find the top-k entries via a binary heap.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScoredItem {
    pub item: u32,
    pub score: f64,
}

/// Ordering for our max-heap: the "smallest" entry is the one with the highest score, so that the
/// top of the heap always holds the weakest of the current top-k. There is no total order on
/// floating point numbers, incomparable scores are treated as equal. Ties are broken by index,
/// lower indices rank first.
fn cmp_reverse(scored_item_a: &ScoredItem, scored_item_b: &ScoredItem) -> Ordering {
    let by_score = match scored_item_a.score.partial_cmp(&scored_item_b.score) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        Some(Ordering::Equal) => Ordering::Equal,
        None => Ordering::Equal
    };

    by_score.then_with(|| scored_item_a.item.cmp(&scored_item_b.item))
}

impl Eq for ScoredItem {}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_reverse(self, other)
    }
}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_reverse(self, other))
    }
}

/// Selects the `k` highest scored entries, sorted by descending score.
pub fn top_k<I>(scored_items: I, k: usize) -> Vec<ScoredItem>
    where I: IntoIterator<Item=ScoredItem> {

    if k == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(k.min(1_024));

    for scored_item in scored_items {
        if heap.len() < k {
            heap.push(scored_item);
        } else if let Some(mut top) = heap.peek_mut() {
            if scored_item < *top {
                *top = scored_item;
            }
        }
    }

    heap.into_sorted_vec()
}

#[cfg(test)]
mod tests {

    use super::{top_k, ScoredItem};

    fn within_epsilon(value: f64, expected: f64) -> bool {
        (value - expected).abs() < std::f64::EPSILON
    }

    #[test]
    fn scored_item_ordering_reversed() {
        let item_a = ScoredItem { item: 1, score: 0.5 };
        let item_b = ScoredItem { item: 2, score: 1.5 };
        let item_c = ScoredItem { item: 3, score: 0.3 };

        assert!(item_a > item_b);
        assert!(item_a < item_c);
        assert!(item_b < item_c);
    }

    #[test]
    fn ties_prefer_lower_index() {
        let item_a = ScoredItem { item: 4, score: 1.0 };
        let item_b = ScoredItem { item: 9, score: 1.0 };

        assert!(item_a < item_b);
    }

    #[test]
    fn topk() {

        const K: usize = 3;

        let items = vec![
            ScoredItem { item: 1, score: 0.5 },
            ScoredItem { item: 2, score: 1.5 },
            ScoredItem { item: 3, score: 0.3 },
            ScoredItem { item: 4, score: 3.5 },
            ScoredItem { item: 5, score: 2.5 },
        ];

        let top = top_k(items, K);

        assert_eq!(top.len(), 3);

        assert_eq!(top[0].item, 4);
        assert!(within_epsilon(top[0].score, 3.5));

        assert_eq!(top[1].item, 5);
        assert!(within_epsilon(top[1].score, 2.5));

        assert_eq!(top[2].item, 2);
        assert!(within_epsilon(top[2].score, 1.5));
    }

    #[test]
    fn topk_with_ties_is_independent_of_input_order() {
        let forward = vec![
            ScoredItem { item: 7, score: 1.0 },
            ScoredItem { item: 3, score: 1.0 },
            ScoredItem { item: 5, score: 1.0 },
            ScoredItem { item: 1, score: 0.5 },
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let expected: Vec<u32> = vec![3, 5];

        let from_forward: Vec<u32> = top_k(forward, 2).iter().map(|s| s.item).collect();
        let from_backward: Vec<u32> = top_k(backward, 2).iter().map(|s| s.item).collect();

        assert_eq!(from_forward, expected);
        assert_eq!(from_backward, expected);
    }

    #[test]
    fn fewer_candidates_than_k() {
        let top = top_k(vec![ScoredItem { item: 1, score: 0.2 }], 10);
        assert_eq!(top.len(), 1);
        assert!(top_k(Vec::new(), 10).is_empty());
        assert!(top_k(vec![ScoredItem { item: 1, score: 0.2 }], 0).is_empty());
    }
}
