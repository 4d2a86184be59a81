use crate::model::{Genre, Movie, SortBy};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors from talking to the movie metadata API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) if e.is_timeout() => "The movie service timed out".to_string(),
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Status { status: 401, .. } => {
                "The movie service rejected the API key".to_string()
            }
            ApiError::Status { status, message } => {
                format!("Movie service error ({}): {}", status, message)
            }
            ApiError::Decode(e) => format!("Unexpected response format: {}", e),
            ApiError::InvalidUrl(url) => format!("Invalid API base URL: {}", url),
        }
    }
}

/// Parameters of a discovery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub sort_by: SortBy,
    pub with_genres: Option<u64>,
    pub page: u32,
}

impl DiscoverQuery {
    /// First page for the given filters; only page 1 is ever requested.
    pub fn first_page(sort_by: SortBy, with_genres: Option<u64>) -> Self {
        Self {
            sort_by,
            with_genres,
            page: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct MoviePage {
    #[serde(default)]
    results: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

/// The three read-only calls the browser makes.
///
/// Implemented by [`TmdbClient`]; the fetch runtime is generic over it so it
/// can be driven without a network.
pub trait MovieSource: Clone + Send + Sync + 'static {
    fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, ApiError>> + Send;

    fn discover(
        &self,
        query: DiscoverQuery,
    ) -> impl Future<Output = Result<Vec<Movie>, ApiError>> + Send;

    fn search(&self, query: String) -> impl Future<Output = Result<Vec<Movie>, ApiError>> + Send;
}

/// HTTP client for the TMDB v3 API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_base: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        reqwest::Url::parse(api_base).map_err(|_| ApiError::InvalidUrl(api_base.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("movie-quest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    pub(crate) fn genres_request(&self) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint("genre/movie/list"))
            .query(&[("api_key", self.api_key.as_str())])
    }

    pub(crate) fn discover_request(&self, query: DiscoverQuery) -> reqwest::RequestBuilder {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("sort_by", query.sort_by.as_param().to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(genre) = query.with_genres {
            params.push(("with_genres", genre.to_string()));
        }
        self.http.get(self.endpoint("discover/movie")).query(&params)
    }

    pub(crate) fn search_request(&self, query: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint("search/movie"))
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<StatusBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl MovieSource for TmdbClient {
    async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let list: GenreList = Self::send_json(self.genres_request()).await?;
        Ok(list.genres)
    }

    async fn discover(&self, query: DiscoverQuery) -> Result<Vec<Movie>, ApiError> {
        let page: MoviePage = Self::send_json(self.discover_request(query)).await?;
        Ok(page.results)
    }

    async fn search(&self, query: String) -> Result<Vec<Movie>, ApiError> {
        let page: MoviePage = Self::send_json(self.search_request(&query)).await?;
        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new("https://api.themoviedb.org/3/", "secret", Duration::from_secs(5))
            .expect("client should build")
    }

    fn query_pairs(req: reqwest::RequestBuilder) -> (String, Vec<(String, String)>) {
        let req = req.build().expect("request should build");
        let url = req.url().clone();
        let pairs = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        (url.path().to_string(), pairs)
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_genres_request_carries_api_key() {
        let (path, pairs) = query_pairs(client().genres_request());
        assert_eq!(path, "/3/genre/movie/list");
        assert_eq!(param(&pairs, "api_key"), Some("secret"));
    }

    #[test]
    fn test_discover_request_without_genre() {
        let query = DiscoverQuery::first_page(SortBy::RatingDesc, None);
        let (path, pairs) = query_pairs(client().discover_request(query));
        assert_eq!(path, "/3/discover/movie");
        assert_eq!(param(&pairs, "api_key"), Some("secret"));
        assert_eq!(param(&pairs, "sort_by"), Some("vote_average.desc"));
        assert_eq!(param(&pairs, "page"), Some("1"));
        assert_eq!(param(&pairs, "with_genres"), None);
    }

    #[test]
    fn test_discover_request_with_genre() {
        let query = DiscoverQuery::first_page(SortBy::ReleaseDateAsc, Some(878));
        let (_, pairs) = query_pairs(client().discover_request(query));
        assert_eq!(param(&pairs, "sort_by"), Some("release_date.asc"));
        assert_eq!(param(&pairs, "with_genres"), Some("878"));
    }

    #[test]
    fn test_search_request_encodes_query() {
        let (path, pairs) = query_pairs(client().search_request("the matrix & co"));
        assert_eq!(path, "/3/search/movie");
        assert_eq!(param(&pairs, "query"), Some("the matrix & co"));
        assert_eq!(param(&pairs, "sort_by"), None);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = TmdbClient::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_wire_types_decode() {
        let genres: GenreList =
            serde_json::from_str(r#"{"genres":[{"id":28,"name":"Action"},{"id":12,"name":"Adventure"}]}"#)
                .unwrap();
        assert_eq!(genres.genres.len(), 2);
        assert_eq!(genres.genres[1].name, "Adventure");

        let page: MoviePage = serde_json::from_str(
            r#"{"page":1,"results":[{"id":603,"title":"The Matrix","overview":"Neo.","poster_path":"/m.jpg","vote_average":8.2,"adult":false}],"total_pages":1}"#,
        )
        .unwrap();
        assert_eq!(page.results[0].id, 603);
        assert_eq!(page.results[0].poster_path.as_deref(), Some("/m.jpg"));
    }

    #[test]
    fn test_api_error_user_message() {
        let err = ApiError::Status {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(err.user_message().contains("API key"));

        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "Movie service error (500): boom");
    }
}
