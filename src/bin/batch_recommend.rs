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

use std::env;
use std::error::Error;
use std::process;

use getopts::Options;
use tracing::info;
use tracing_subscriber::EnvFilter;

use usercf::io;
use usercf::Config;

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required), comma-separated \
        user,movie,rating,timestamp records with a header line.", "PATH");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optopt("k", "num-neighbors", "Number of similar users to recommend from (optional, \
        defaults to 20).", "NUMBER");
    opts.optopt("n", "num-recommendations", "Number of movies to recommend per user (optional, \
        defaults to 10).", "NUMBER");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts, None);
        return;
    }

    let ratings_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    let recommendations_path = matches.opt_str("o");

    let defaults = Config::default();

    let n_sim_user: usize = match matches.opt_get_default("k", defaults.n_sim_user) {
        Ok(k) => k,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let n_rec_movie: usize = match matches.opt_get_default("n", defaults.n_rec_movie) {
        Ok(n) => n,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let config = Config { n_sim_user, n_rec_movie, pivot: 1.0, ..defaults };

    if let Err(failure) = batch_recommend(&ratings_path, &config, recommendations_path) {
        eprintln!("{}", failure);
        process::exit(1);
    }
}

fn print_usage(program: &str, opts: &Options, hint: Option<&str>) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn print_usage_and_exit(program: &str, opts: Options, hint: Option<&str>) {
    print_usage(program, &opts, hint);
    process::exit(2);
}

fn batch_recommend(
    ratings_path: &str,
    config: &Config,
    recommendations_path: Option<String>,
) -> Result<(), Box<dyn Error>> {

    info!(path = ratings_path, "reading ratings");
    let ratings = io::read_ratings(ratings_path)?;

    info!(n_rec_movie = config.n_rec_movie, "computing recommendations for all users");
    let (renaming, recommendations) = usercf::recommend_ratings(&ratings, config)?;

    info!(users = recommendations.len(), "writing recommendations");
    io::write_recommendations(&recommendations, &renaming, recommendations_path)?;

    Ok(())
}
