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

use getopts::{Matches, Options};
use tracing::info;
use tracing_subscriber::EnvFilter;

use usercf::io;
use usercf::Config;

fn main() {

    init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of ratings \
        of movies by users, one comma-separated user,movie,rating,timestamp record per line, \
        preceded by a header line.", "PATH");
    opts.optopt("c", "config", "JSON file with the configuration (optional), options given on \
        the command line take precedence.", "PATH");
    opts.optopt("k", "num-neighbors", "Number of similar users to recommend from (optional, \
        defaults to 20).", "NUMBER");
    opts.optopt("n", "num-recommendations", "Number of movies to recommend per user (optional, \
        defaults to 10).", "NUMBER");
    opts.optopt("p", "pivot", "Probability with which a rating is used for training (optional, \
        defaults to 0.75).", "NUMBER");
    opts.optopt("s", "seed", "Seed for the train/test split (optional, random by default).",
        "NUMBER");
    opts.optopt("t", "threads", "Number of threads to use (optional, defaults to the number of \
        CPUs).", "NUMBER");
    opts.optflag("j", "json", "Print the metrics as JSON");
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

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(failure) => {
            let hint = format!("Problem with the configuration: {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = evaluate(&ratings_path, &config, matches.opt_present("j")) {
        eprintln!("{}", failure);
        process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
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

/// Defaults, overridden by the config file, overridden by command line options.
fn config_from(matches: &Matches) -> Result<Config, Box<dyn Error>> {

    let mut config = match matches.opt_str("c") {
        Some(path) => Config::from_json_file(&path)?,
        None => Config::default(),
    };

    if let Some(n_sim_user) = matches.opt_get::<usize>("k")? {
        config.n_sim_user = n_sim_user;
    }
    if let Some(n_rec_movie) = matches.opt_get::<usize>("n")? {
        config.n_rec_movie = n_rec_movie;
    }
    if let Some(pivot) = matches.opt_get::<f64>("p")? {
        config.pivot = pivot;
    }
    if let Some(seed) = matches.opt_get::<u64>("s")? {
        config.seed = Some(seed);
    }
    if let Some(num_threads) = matches.opt_get::<usize>("t")? {
        config.num_threads = num_threads;
    }

    config.validate()?;

    Ok(config)
}

fn evaluate(ratings_path: &str, config: &Config, as_json: bool) -> Result<(), Box<dyn Error>> {

    info!(path = ratings_path, "reading ratings");
    let ratings = io::read_ratings(ratings_path)?;

    info!(
        n_sim_user = config.n_sim_user,
        n_rec_movie = config.n_rec_movie,
        pivot = config.pivot,
        "evaluating user-based collaborative filtering"
    );

    let metrics = usercf::evaluate_ratings(&ratings, config)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", metrics);
    }

    Ok(())
}
