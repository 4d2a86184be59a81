use serde::{Deserialize, Serialize};

/// Descriptions longer than this many characters are collapsed by default.
pub const DESCRIPTION_LIMIT: usize = 100;

pub const NO_DESCRIPTION: &str = "No description available.";

/// Label of the genre option that means "no genre filter".
pub const ALL_GENRES: &str = "All Genres";

/// A genre record from the genre list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A movie as returned by the discover and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl Movie {
    /// Overview with empty strings treated as absent.
    fn overview_text(&self) -> Option<&str> {
        self.overview.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether the description is long enough to offer Read More / Read Less.
    pub fn has_long_description(&self) -> bool {
        self.overview_text()
            .is_some_and(|s| s.chars().count() > DESCRIPTION_LIMIT)
    }

    /// The description as it should be displayed for the given expansion state.
    pub fn display_description(&self, expanded: bool) -> String {
        match self.overview_text() {
            None => NO_DESCRIPTION.to_string(),
            Some(text) if expanded => text.to_string(),
            Some(text) => truncate_description(text),
        }
    }

    /// Rating line, e.g. `7.3/10`.
    pub fn rating_label(&self) -> String {
        format!("{}/10", self.vote_average)
    }
}

/// Cut `text` to its first [`DESCRIPTION_LIMIT`] characters plus `...`.
/// Text at or under the limit is returned unchanged.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Server-side sort orders supported by the discover endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortBy {
    #[default]
    #[serde(rename = "popularity.desc")]
    #[value(name = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    #[value(name = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    #[value(name = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "vote_average.asc")]
    #[value(name = "vote_average.asc")]
    RatingAsc,
    #[serde(rename = "release_date.desc")]
    #[value(name = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "release_date.asc")]
    #[value(name = "release_date.asc")]
    ReleaseDateAsc,
}

impl SortBy {
    pub const ALL: [SortBy; 6] = [
        Self::PopularityDesc,
        Self::PopularityAsc,
        Self::RatingDesc,
        Self::RatingAsc,
        Self::ReleaseDateDesc,
        Self::ReleaseDateAsc,
    ];

    /// Value sent as `sort_by`.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::PopularityDesc => "popularity.desc",
            Self::PopularityAsc => "popularity.asc",
            Self::RatingDesc => "vote_average.desc",
            Self::RatingAsc => "vote_average.asc",
            Self::ReleaseDateDesc => "release_date.desc",
            Self::ReleaseDateAsc => "release_date.asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PopularityDesc => "Popularity Descending",
            Self::PopularityAsc => "Popularity Ascending",
            Self::RatingDesc => "Rating Descending",
            Self::RatingAsc => "Rating Ascending",
            Self::ReleaseDateDesc => "Release Date Descending",
            Self::ReleaseDateAsc => "Release Date Ascending",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// One entry of the genre picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreOption {
    /// `None` is the "All Genres" sentinel.
    pub id: Option<u64>,
    pub label: String,
}

impl GenreOption {
    pub fn all_genres() -> Self {
        Self {
            id: None,
            label: ALL_GENRES.to_string(),
        }
    }
}

/// Picker options: the sentinel first, then the genres in API order.
pub fn genre_options(genres: &[Genre]) -> Vec<GenreOption> {
    std::iter::once(GenreOption::all_genres())
        .chain(genres.iter().map(|g| GenreOption {
            id: Some(g.id),
            label: g.name.clone(),
        }))
        .collect()
}

/// Builds poster URLs of the form `<image_base>/<size>/<poster_path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterUrls {
    pub image_base: String,
    pub size: String,
    pub placeholder: String,
}

impl PosterUrls {
    pub fn url_for(&self, movie: &Movie) -> String {
        match movie.poster_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => format!(
                "{}/{}/{}",
                self.image_base.trim_end_matches('/'),
                self.size.trim_matches('/'),
                path.trim_start_matches('/')
            ),
            None => self.placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn movie(id: u64, overview: Option<&str>) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: overview.map(str::to_string),
            poster_path: None,
            vote_average: 7.5,
        }
    }

    fn tmdb_posters() -> PosterUrls {
        PosterUrls {
            image_base: "https://image.tmdb.org/t/p".to_string(),
            size: "w300".to_string(),
            placeholder: "https://via.placeholder.com/300x450?text=No+Image".to_string(),
        }
    }

    #[test]
    fn test_description_of_101_chars_is_truncated() {
        let text = "a".repeat(101);
        let m = movie(1, Some(&text));
        assert!(m.has_long_description());
        assert_eq!(m.display_description(false), format!("{}...", "a".repeat(100)));
        assert_eq!(m.display_description(true), text);
    }

    #[test]
    fn test_description_of_100_chars_is_never_truncated() {
        let text = "b".repeat(100);
        let m = movie(1, Some(&text));
        assert!(!m.has_long_description());
        assert_eq!(m.display_description(false), text);
        assert_eq!(m.display_description(true), text);
    }

    #[test]
    fn test_missing_description_shows_placeholder() {
        assert_eq!(movie(1, None).display_description(false), NO_DESCRIPTION);
        assert_eq!(movie(1, None).display_description(true), NO_DESCRIPTION);
        assert_eq!(movie(1, Some("")).display_description(false), NO_DESCRIPTION);
        assert!(!movie(1, None).has_long_description());
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(101);
        let out = truncate_description(&text);
        assert_eq!(out.chars().count(), 103);
        assert!(out.starts_with(&"é".repeat(100)));
    }

    #[test]
    fn test_poster_url_with_path() {
        let mut m = movie(1, None);
        m.poster_path = Some("/abc.jpg".to_string());
        assert_eq!(tmdb_posters().url_for(&m), "https://image.tmdb.org/t/p/w300/abc.jpg");
    }

    #[test]
    fn test_poster_url_without_path_uses_placeholder() {
        let posters = tmdb_posters();
        let mut m = movie(1, None);
        assert_eq!(posters.url_for(&m), posters.placeholder);
        m.poster_path = Some(String::new());
        assert_eq!(posters.url_for(&m), posters.placeholder);
    }

    #[test]
    fn test_genre_options_prepend_sentinel() {
        let genres = vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 35, name: "Comedy".to_string() },
        ];
        let options = genre_options(&genres);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], GenreOption::all_genres());
        assert_eq!(options[1].id, Some(28));
        assert_eq!(options[2].label, "Comedy");

        assert_eq!(genre_options(&[]), vec![GenreOption::all_genres()]);
    }

    #[test]
    fn test_sort_by_params_and_default() {
        assert_eq!(SortBy::default(), SortBy::PopularityDesc);
        let params: Vec<&str> = SortBy::ALL.iter().map(|s| s.as_param()).collect();
        assert_eq!(
            params,
            vec![
                "popularity.desc",
                "popularity.asc",
                "vote_average.desc",
                "vote_average.asc",
                "release_date.desc",
                "release_date.asc",
            ]
        );
        assert_eq!(SortBy::RatingAsc.index(), 3);
    }

    #[test]
    fn test_movie_deserializes_with_missing_fields() {
        let m: Movie = serde_json::from_str(r#"{"id": 9, "title": "X", "poster_path": null}"#).unwrap();
        assert_eq!(m.id, 9);
        assert_eq!(m.overview, None);
        assert_eq!(m.poster_path, None);
        assert_eq!(m.vote_average, 0.0);
    }

    #[test]
    fn test_rating_label() {
        let mut m = movie(1, None);
        m.vote_average = 8.0;
        assert_eq!(m.rating_label(), "8/10");
        m.vote_average = 6.25;
        assert_eq!(m.rating_label(), "6.25/10");
    }

    proptest! {
        #[test]
        fn prop_expanded_description_is_full_text(text in "\\PC{1,300}") {
            let m = movie(1, Some(&text));
            prop_assert_eq!(m.display_description(true), text);
        }

        #[test]
        fn prop_collapsed_description_is_bounded(text in "\\PC{1,300}") {
            let m = movie(1, Some(&text));
            let shown = m.display_description(false);
            let len = text.chars().count();
            if len > DESCRIPTION_LIMIT {
                prop_assert_eq!(shown.chars().count(), DESCRIPTION_LIMIT + 3);
                prop_assert!(shown.ends_with("..."));
            } else {
                prop_assert_eq!(shown, text);
            }
        }
    }
}
