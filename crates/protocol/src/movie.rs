//! Movie record definitions.
//!
//! These types are shared by the catalog (which owns the collection) and the
//! HTTP adapter (which serializes records onto the wire).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Genres a movie may be tagged with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Genre {
    Action,
    Adventure,
    Crime,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    /// Every allowed genre, in display order.
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Crime,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
    ];

    /// Wire spelling of the genre.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Crime => "Crime",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Case-insensitive comparison against a free-form name such as a query
    /// parameter.
    pub fn matches_name(&self, name: &str) -> bool {
        self.as_str().to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Exact (case-sensitive) parse of the wire spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| format!("unknown genre '{}'", s))
    }
}

/// A single movie in the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Server-generated identifier (UUID text), immutable once assigned
    pub id: String,
    pub title: String,
    pub year: i32,
    pub director: String,
    /// Running time in minutes
    pub duration: u32,
    /// Poster image URL
    pub poster: String,
    /// Non-empty, ordered genre list
    pub genre: Vec<Genre>,
    pub rate: f64,
}

impl Movie {
    /// Build a record from a validated draft and a freshly assigned id.
    pub fn from_draft(id: impl Into<String>, draft: MovieDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            year: draft.year,
            director: draft.director,
            duration: draft.duration,
            poster: draft.poster,
            genre: draft.genre,
            rate: draft.rate,
        }
    }

    /// Return a copy of this record with every field present in `patch`
    /// overwritten. The id is never touched.
    pub fn merged(&self, patch: &MoviePatch) -> Movie {
        let mut merged = self.clone();
        if let Some(title) = &patch.title {
            merged.title = title.clone();
        }
        if let Some(year) = patch.year {
            merged.year = year;
        }
        if let Some(director) = &patch.director {
            merged.director = director.clone();
        }
        if let Some(duration) = patch.duration {
            merged.duration = duration;
        }
        if let Some(poster) = &patch.poster {
            merged.poster = poster.clone();
        }
        if let Some(genre) = &patch.genre {
            merged.genre = genre.clone();
        }
        if let Some(rate) = patch.rate {
            merged.rate = rate;
        }
        merged
    }

    /// Whether any of this movie's genres matches `name` case-insensitively.
    pub fn has_genre(&self, name: &str) -> bool {
        self.genre.iter().any(|genre| genre.matches_name(name))
    }
}

/// A fully validated create payload (no id yet).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    pub rate: f64,
}

/// A validated partial update. Absent fields are `None` and leave the
/// existing record untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl MoviePatch {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.director.is_none()
            && self.duration.is_none()
            && self.poster.is_none()
            && self.genre.is_none()
            && self.rate.is_none()
    }
}
