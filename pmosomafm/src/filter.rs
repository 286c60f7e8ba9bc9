//! Substring search over channel lists

use crate::models::Channel;
use serde::{Deserialize, Serialize};

/// Search terms: a single term or a list of terms that must all match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Search {
    Term(String),
    Terms(Vec<String>),
}

impl Search {
    /// Terms as a slice; a single term is a one-element list
    pub fn terms(&self) -> &[String] {
        match self {
            Search::Term(term) => std::slice::from_ref(term),
            Search::Terms(terms) => terms,
        }
    }
}

impl From<&str> for Search {
    fn from(term: &str) -> Self {
        Search::Term(term.to_string())
    }
}

impl From<String> for Search {
    fn from(term: String) -> Self {
        Search::Term(term)
    }
}

impl From<Vec<String>> for Search {
    fn from(terms: Vec<String>) -> Self {
        Search::Terms(terms)
    }
}

impl From<Vec<&str>> for Search {
    fn from(terms: Vec<&str>) -> Self {
        Search::Terms(terms.into_iter().map(str::to_string).collect())
    }
}

/// Keep channels matching every search term
///
/// `None` and an empty term list leave the list untouched.
pub fn filter_channels(channels: Vec<Channel>, search: Option<&Search>) -> Vec<Channel> {
    let terms: Vec<String> = match search {
        Some(search) if !search.terms().is_empty() => {
            search.terms().iter().map(|t| t.to_lowercase()).collect()
        }
        _ => return channels,
    };

    channels
        .into_iter()
        .filter(|channel| matches_all(channel, &terms))
        .collect()
}

/// A channel matches when each lowercased term is a substring of one of
/// its id, title, description, genre or dj
pub fn matches_all(channel: &Channel, lowercase_terms: &[String]) -> bool {
    let fields = [
        channel.id.to_lowercase(),
        channel.title.to_lowercase(),
        channel.description.to_lowercase(),
        channel.genre.to_lowercase(),
        channel.dj.to_lowercase(),
    ];

    lowercase_terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
}
