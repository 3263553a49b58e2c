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
use std::io::{self, BufWriter, Write, stdout};
use std::path::Path;

use csv::StringRecord;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Result, UserCfError};
use crate::scored::ScoredItem;
use crate::stats::Renaming;
use crate::types::UserIndex;

/// Number of fields per rating record: user, movie, rating and timestamp.
pub const NUM_FIELDS: usize = 4;

/// A single rating event. Only the fact that the user interacted with the movie is used, the
/// rating value and the timestamp are kept verbatim and never interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    pub user: String,
    pub movie: String,
    pub rating: String,
    pub timestamp: String,
}

impl Rating {
    pub fn new(user: &str, movie: &str) -> Self {
        Rating {
            user: user.to_owned(),
            movie: movie.to_owned(),
            rating: String::new(),
            timestamp: String::new(),
        }
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(b',')
        .flexible(true)
        .quoting(false);

    builder
}

/// Opens a ratings file. We expect a header line, followed by one comma-separated
/// `user,movie,rating,timestamp` record per line. Fields are taken as is, there is no quoting
/// or escaping of embedded commas.
pub fn csv_reader(file: &str) -> Result<csv::Reader<File>> {
    reader_builder()
        .from_path(file)
        .map_err(|source| UserCfError::Open { path: file.to_owned(), source })
}

/// Same format as `csv_reader`, for ratings that do not live in a file.
pub fn csv_reader_from<R: io::Read>(input: R) -> csv::Reader<R> {
    reader_builder().from_reader(input)
}

pub fn ratings_from_csv<'a, R>(
    reader: &'a mut csv::Reader<R>
) -> impl Iterator<Item=Result<Rating>> + 'a
    where R: io::Read {

    reader.records()
        .map(|result| {
            let record = result?;
            parse_record(&record)
        })
}

fn parse_record(record: &StringRecord) -> Result<Rating> {
    if record.len() != NUM_FIELDS {
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        return Err(UserCfError::FieldCount { line, expected: NUM_FIELDS, found: record.len() });
    }

    let rating: Rating = record.deserialize(None)?;
    Ok(rating)
}

/// Reads all ratings from the file, failing on the first malformed record.
pub fn read_ratings(file: &str) -> Result<Vec<Rating>> {
    let mut reader = csv_reader(file)?;
    ratings_from_csv(&mut reader).collect()
}

/// Struct used for JSON serialization of computed recommendations. Field names will be used in
/// JSON.
#[derive(Serialize)]
struct Recommendations<'a> {
    for_user: &'a str,
    recommended_movies: Vec<RecommendedMovie<'a>>,
}

#[derive(Serialize)]
struct RecommendedMovie<'a> {
    movie: &'a str,
    score: f64,
}

/// Output the computed recommendations in JSON format, one user per line, using the original
/// identifiers from the input file. If a `recommendations_path` is supplied, we write to a file at
/// the specified path, otherwise, we output to stdout.
pub fn write_recommendations(
    recommendations: &[(UserIndex, Vec<ScoredItem>)],
    renaming: &Renaming,
    recommendations_path: Option<String>,
) -> Result<()> {

    let out: Box<dyn Write> = match recommendations_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout())
    };

    write_recommendations_to(recommendations, renaming, BufWriter::new(out))
}

pub fn write_recommendations_to<W: Write>(
    recommendations: &[(UserIndex, Vec<ScoredItem>)],
    renaming: &Renaming,
    mut out: W,
) -> Result<()> {

    for (user, recommended) in recommendations {

        let for_user = match renaming.user_name(*user) {
            Some(name) => name,
            None => continue,
        };

        let recommended_movies = recommended.iter()
            .filter_map(|scored_item| {
                renaming.movie_name(scored_item.item)
                    .map(|movie| RecommendedMovie { movie, score: scored_item.score })
            })
            .collect();

        serde_json::to_writer(&mut out, &Recommendations { for_user, recommended_movies })?;
        writeln!(out)?;
    }

    out.flush()?;

    Ok(())
}
