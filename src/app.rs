use crate::model::{self, Genre, GenreOption, Movie, PosterUrls, SortBy};
use crate::tmdb::{ApiError, DiscoverQuery};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which completions may replace the data they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Only the latest request issued for a source is applied; older
    /// in-flight requests are aborted and their late results dropped.
    #[default]
    LatestRequest,
    /// Every completion is applied, so whichever response resolves last wins.
    LastResolved,
}

/// Independent remote data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Genres,
    /// Discovery and search both feed the movie list.
    Movies,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Genres,
    Discover(DiscoverQuery),
    Search(String),
}

/// A remote call the reducer wants the runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub kind: RequestKind,
}

impl FetchRequest {
    pub fn source(&self) -> Source {
        match self.kind {
            RequestKind::Genres => Source::Genres,
            RequestKind::Discover(_) | RequestKind::Search(_) => Source::Movies,
        }
    }
}

/// Payload of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Genres(Vec<Genre>),
    Movies(Vec<Movie>),
}

/// Everything that can change the browser state.
#[derive(Debug)]
pub enum Action {
    /// Issues the initial genre and discovery requests.
    Started,
    SearchChanged(String),
    SortChanged(SortBy),
    GenreChanged(Option<u64>),
    SearchSubmitted,
    ExpansionToggled(u64),
    FetchSucceeded {
        request: FetchRequest,
        outcome: FetchOutcome,
    },
    FetchFailed {
        request: FetchRequest,
        error: ApiError,
    },
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Popup list currently open, with its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    Sort { cursor: usize },
    Genre { cursor: usize },
}

/// What produced the movie list on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Discover,
    Search(String),
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub picker: Option<Picker>,

    // Remote data
    pub genres: Vec<Genre>,
    pub movies: Vec<Movie>,
    pub listing: Listing,

    // Query parameters
    pub sort_by: SortBy,
    pub selected_genre: Option<u64>,
    pub search_text: String,

    // View-only state
    pub expanded: HashMap<u64, bool>,
    pub selected: usize,
    pub columns: usize,
    pub posters: PosterUrls,

    ordering: ResponseOrdering,
    next_seq: u64,
    latest: HashMap<Source, u64>,
}

impl App {
    pub fn new(posters: PosterUrls, ordering: ResponseOrdering) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            picker: None,

            genres: Vec::new(),
            movies: Vec::new(),
            listing: Listing::Discover,

            sort_by: SortBy::default(),
            selected_genre: None,
            search_text: String::new(),

            expanded: HashMap::new(),
            selected: 0,
            columns: 1,
            posters,

            ordering,
            next_seq: 0,
            latest: HashMap::new(),
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Apply one action; returns the remote calls it triggers.
    pub fn dispatch(&mut self, action: Action) -> Vec<FetchRequest> {
        match action {
            Action::Started => vec![
                self.issue(RequestKind::Genres),
                self.issue_discover(),
            ],
            Action::SearchChanged(text) => {
                self.search_text = text;
                Vec::new()
            }
            Action::SortChanged(sort_by) => {
                if sort_by == self.sort_by {
                    return Vec::new();
                }
                self.sort_by = sort_by;
                vec![self.issue_discover()]
            }
            Action::GenreChanged(genre) => {
                if genre == self.selected_genre {
                    return Vec::new();
                }
                self.selected_genre = genre;
                vec![self.issue_discover()]
            }
            Action::SearchSubmitted => {
                if self.search_text.is_empty() {
                    return Vec::new();
                }
                vec![self.issue(RequestKind::Search(self.search_text.clone()))]
            }
            Action::ExpansionToggled(id) => {
                let entry = self.expanded.entry(id).or_insert(false);
                *entry = !*entry;
                Vec::new()
            }
            Action::FetchSucceeded { request, outcome } => {
                if self.accepts(&request) {
                    self.apply(request, outcome);
                }
                Vec::new()
            }
            Action::FetchFailed { request, error } => {
                if self.accepts(&request) {
                    tracing::error!(
                        seq = request.seq,
                        source = ?request.source(),
                        error = %error,
                        "{}",
                        error.user_message()
                    );
                } else {
                    tracing::warn!(
                        seq = request.seq,
                        source = ?request.source(),
                        error = %error,
                        "Superseded request failed"
                    );
                }
                Vec::new()
            }
        }
    }

    fn issue_discover(&mut self) -> FetchRequest {
        let query = DiscoverQuery::first_page(self.sort_by, self.selected_genre);
        self.issue(RequestKind::Discover(query))
    }

    fn issue(&mut self, kind: RequestKind) -> FetchRequest {
        self.next_seq += 1;
        let request = FetchRequest {
            seq: self.next_seq,
            kind,
        };
        self.latest.insert(request.source(), request.seq);
        tracing::info!(seq = request.seq, kind = ?request.kind, "Issuing request");
        request
    }

    /// Whether a completion for `request` may touch the state.
    fn accepts(&self, request: &FetchRequest) -> bool {
        match self.ordering {
            ResponseOrdering::LastResolved => true,
            ResponseOrdering::LatestRequest => {
                let current = self.latest.get(&request.source()).copied();
                if current == Some(request.seq) {
                    true
                } else {
                    tracing::debug!(
                        seq = request.seq,
                        latest = ?current,
                        "Discarding stale response"
                    );
                    false
                }
            }
        }
    }

    fn apply(&mut self, request: FetchRequest, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Genres(genres) => {
                tracing::info!(count = genres.len(), "Genres loaded");
                self.genres = genres;
            }
            FetchOutcome::Movies(movies) => {
                tracing::info!(seq = request.seq, count = movies.len(), "Movie list replaced");
                self.movies = movies;
                self.selected = 0;
                self.listing = match request.kind {
                    RequestKind::Search(query) => Listing::Search(query),
                    _ => Listing::Discover,
                };
            }
        }
    }

    // ── View helpers ──

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded.get(&id).copied().unwrap_or(false)
    }

    pub fn description_for(&self, movie: &Movie) -> String {
        movie.display_description(self.is_expanded(movie.id))
    }

    pub fn poster_url_for(&self, movie: &Movie) -> String {
        self.posters.url_for(movie)
    }

    pub fn genre_options(&self) -> Vec<GenreOption> {
        model::genre_options(&self.genres)
    }

    /// Display name of the active genre filter.
    pub fn selected_genre_label(&self) -> String {
        match self.selected_genre {
            None => model::ALL_GENRES.to_string(),
            Some(id) => self
                .genres
                .iter()
                .find(|g| g.id == id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| format!("Genre {}", id)),
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Toggle the selected card, if its description can be expanded.
    pub fn toggle_selected(&mut self) {
        if let Some(movie) = self.selected_movie() {
            if movie.has_long_description() {
                let id = movie.id;
                self.dispatch(Action::ExpansionToggled(id));
            }
        }
    }

    /// Grid column count for a terminal width.
    pub fn columns_for_width(width: u16) -> usize {
        match width {
            0..80 => 1,
            80..120 => 2,
            120..160 => 3,
            _ => 4,
        }
    }

    pub fn update_columns(&mut self, width: u16) {
        self.columns = Self::columns_for_width(width);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let target = self.selected + self.columns;
        if target < self.movies.len() {
            self.selected = target;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.movies.len().saturating_sub(1);
    }

    // ── Pickers ──

    pub fn open_sort_picker(&mut self) {
        self.picker = Some(Picker::Sort {
            cursor: self.sort_by.index(),
        });
    }

    pub fn open_genre_picker(&mut self) {
        let cursor = self
            .genre_options()
            .iter()
            .position(|o| o.id == self.selected_genre)
            .unwrap_or(0);
        self.picker = Some(Picker::Genre { cursor });
    }

    fn picker_len(&self, picker: Picker) -> usize {
        match picker {
            Picker::Sort { .. } => SortBy::ALL.len(),
            Picker::Genre { .. } => self.genres.len() + 1,
        }
    }

    pub fn picker_next(&mut self) {
        if let Some(picker) = self.picker {
            let len = self.picker_len(picker);
            self.picker = Some(match picker {
                Picker::Sort { cursor } => Picker::Sort { cursor: (cursor + 1).min(len - 1) },
                Picker::Genre { cursor } => Picker::Genre { cursor: (cursor + 1).min(len - 1) },
            });
        }
    }

    pub fn picker_prev(&mut self) {
        self.picker = self.picker.map(|picker| match picker {
            Picker::Sort { cursor } => Picker::Sort { cursor: cursor.saturating_sub(1) },
            Picker::Genre { cursor } => Picker::Genre { cursor: cursor.saturating_sub(1) },
        });
    }

    /// Close the picker and dispatch its selection.
    pub fn picker_confirm(&mut self) -> Vec<FetchRequest> {
        let Some(picker) = self.picker.take() else {
            return Vec::new();
        };
        match picker {
            Picker::Sort { cursor } => match SortBy::ALL.get(cursor) {
                Some(sort_by) => self.dispatch(Action::SortChanged(*sort_by)),
                None => Vec::new(),
            },
            Picker::Genre { cursor } => match self.genre_options().get(cursor) {
                Some(option) => self.dispatch(Action::GenreChanged(option.id)),
                None => Vec::new(),
            },
        }
    }
}
