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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_derive::Deserialize;

use crate::error::{Result, UserCfError};
use crate::utils;

/// Parameters of a recommendation run. They are fixed once the pipeline is set up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of the neighborhood (K) used to generate recommendations for a user.
    pub n_sim_user: usize,
    /// Length of the recommendation list (N) per user.
    pub n_rec_movie: usize,
    /// Probability with which a rating ends up in the training set.
    pub pivot: f64,
    /// Seed for the train/test split, a random seed is drawn if absent.
    pub seed: Option<u64>,
    /// Number of worker threads for the similarity computation and the evaluation.
    pub num_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            n_sim_user: 20,
            n_rec_movie: 10,
            pivot: 0.75,
            seed: None,
            num_threads: utils::default_pool_size(),
        }
    }
}

impl Config {

    /// Reads a configuration from a JSON file, absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pivot) {
            return Err(UserCfError::Config(
                format!("pivot must be within [0, 1], got {}", self.pivot)));
        }

        if self.num_threads == 0 {
            return Err(UserCfError::Config(String::from("num_threads must be at least 1")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::Config;
    use crate::error::UserCfError;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.n_sim_user, 20);
        assert_eq!(config.n_rec_movie, 10);
        assert!((config.pivot - 0.75).abs() < std::f64::EPSILON);
        assert_eq!(config.seed, None);
        assert!(config.num_threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_pivot_out_of_range() {
        let config = Config { pivot: 1.5, ..Config::default() };

        match config.validate() {
            Err(UserCfError::Config(_)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_threads() {
        let config = Config { num_threads: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"n_sim_user\": 5, \"seed\": 42}}").unwrap();

        let config = Config::from_json_file(file.path()).unwrap();

        assert_eq!(config.n_sim_user, 5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.n_rec_movie, 10);
    }
}
