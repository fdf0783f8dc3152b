/// Jikan (unofficial MyAnimeList) API provider
///
/// API Flow:
/// 1. Catalog: /top/anime → top-ranked anime with genres and covers
/// 2. User check: /users/{username}/full
/// 3. Favorites: /users/{username}/favorites → favorite anime ids
/// 4. Detail: /anime/{id} → genres of one favorite
use crate::{
    error::{AppError, AppResult},
    models::{
        Anime, AnimeId, JikanAnimeResponse, JikanFavoritesResponse, JikanTopAnimeResponse,
        JikanUserResponse, UserProfile,
    },
    services::providers::AnimeDataSource,
};
use reqwest::{Client as HttpClient, Url};
use serde::de::DeserializeOwned;

const PROVIDER_NAME: &str = "jikan";

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: Url,
}

impl JikanProvider {
    /// Creates a provider rooted at `api_url` (e.g. `https://api.jikan.moe/v4`)
    pub fn new(api_url: &str, user_agent: &str) -> AppResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| {
            AppError::InvalidInput(format!("Invalid Jikan API URL {}: {}", api_url, e))
        })?;

        if api_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!(
                "Jikan API URL {} cannot be used as a base",
                api_url
            )));
        }

        let http_client = HttpClient::builder().user_agent(user_agent).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `segments` and returns the body of a successful response
    async fn get_text(&self, segments: &[&str]) -> AppResult<String> {
        let url = self.endpoint(segments)?;
        let endpoint = segments.join("/");

        tracing::debug!(url = %url, provider = PROVIDER_NAME, "Jikan request");

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(
                endpoint = %endpoint,
                status = status,
                provider = PROVIDER_NAME,
                "Jikan API returned non-success status"
            );
            return Err(AppError::UpstreamStatus { endpoint, status });
        }

        Ok(response.text().await?)
    }

    /// GETs `segments` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let response_text = self.get_text(segments).await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = %segments.join("/"),
                provider = PROVIDER_NAME,
                "Failed to deserialize Jikan response"
            );
            AppError::Decode(e)
        })
    }
}

#[async_trait::async_trait]
impl AnimeDataSource for JikanProvider {
    async fn fetch_top_anime(&self) -> AppResult<Vec<Anime>> {
        let response: JikanTopAnimeResponse = self.get_json(&["top", "anime"]).await?;
        let catalog: Vec<Anime> = response.data.into_iter().map(Anime::from).collect();

        tracing::info!(
            results = catalog.len(),
            provider = PROVIDER_NAME,
            "Top anime fetched"
        );

        Ok(catalog)
    }

    async fn fetch_user_profile(&self, username: &str) -> AppResult<UserProfile> {
        let response_text = self.get_text(&["users", username, "full"]).await?;

        // Existence is decided by the status alone; the body is read best-effort
        let user = serde_json::from_str::<JikanUserResponse>(&response_text)
            .unwrap_or_else(|e| {
                tracing::debug!(
                    error = %e,
                    username = %username,
                    provider = PROVIDER_NAME,
                    "Ignoring unreadable user profile body"
                );
                JikanUserResponse::default()
            })
            .data;

        Ok(user.into_profile(username))
    }

    async fn fetch_user_favorites(&self, username: &str) -> AppResult<Vec<AnimeId>> {
        let response: JikanFavoritesResponse =
            self.get_json(&["users", username, "favorites"]).await?;
        let ids = response.data.anime_ids();

        tracing::info!(
            username = %username,
            favorites = ids.len(),
            provider = PROVIDER_NAME,
            "Favorites fetched"
        );

        Ok(ids)
    }

    async fn fetch_anime_detail(&self, id: AnimeId) -> AppResult<Anime> {
        let id = id.to_string();
        let response: JikanAnimeResponse = self.get_json(&["anime", id.as_str()]).await?;
        Ok(Anime::from(response.data))
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use crate::services::{AffinityConfig, RecommendationEngine};
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Serves `router` on an ephemeral port and returns its `/v4` base URL
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v4", addr)
    }

    fn provider(base_url: &str) -> JikanProvider {
        JikanProvider::new(base_url, "anime-recommender-tests").unwrap()
    }

    fn stub_router() -> Router {
        Router::new()
            .route(
                "/v4/top/anime",
                get(|| async {
                    Json(json!({
                        "pagination": {"last_visible_page": 1, "has_next_page": false},
                        "data": [
                            {
                                "mal_id": 52991,
                                "title": "Sousou no Frieren",
                                "images": {"jpg": {"image_url": "https://cdn.example/frieren.jpg"}},
                                "genres": [
                                    {"mal_id": 2, "type": "anime", "name": "Adventure", "url": ""},
                                    {"mal_id": 10, "type": "anime", "name": "Fantasy", "url": ""}
                                ]
                            },
                            {
                                "mal_id": 9253,
                                "title": "Steins;Gate",
                                "genres": [{"mal_id": 1, "type": "anime", "name": "Action", "url": ""}]
                            }
                        ]
                    }))
                }),
            )
            .route(
                "/v4/users/:username/full",
                get(|Path(username): Path<String>| async move {
                    match username.as_str() {
                        "ghost" => Err(StatusCode::NOT_FOUND),
                        "sparse" => Ok(Json(json!({"data": {"mal_id": 7}}))),
                        _ => Ok(Json(json!({"data": {"mal_id": 7, "username": username}}))),
                    }
                }),
            )
            .route(
                "/v4/users/:username/favorites",
                get(|Path(username): Path<String>| async move {
                    if username == "mangaka" {
                        return Json(json!({"data": {"manga": [{"mal_id": 2}]}}));
                    }
                    Json(json!({"data": {"anime": [{"mal_id": 1}, {"mal_id": 20}], "manga": []}}))
                }),
            )
            .route(
                "/v4/anime/:id",
                get(|Path(id): Path<u64>| async move {
                    match id {
                        1 => Ok(Json(json!({
                            "data": {
                                "mal_id": 1,
                                "title": "Cowboy Bebop",
                                "genres": [{"mal_id": 1, "type": "anime", "name": "Action", "url": ""}]
                            }
                        }))),
                        666 => Ok(Json::<Value>(json!({"data": {"unexpected": true}}))),
                        _ => Err(StatusCode::TOO_MANY_REQUESTS),
                    }
                }),
            )
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            JikanProvider::new("not a url", "ua"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(JikanProvider::new("mailto:someone@example.com", "ua").is_err());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let provider = provider("https://api.jikan.moe/v4/");
        let url = provider.endpoint(&["users", "some user", "full"]).unwrap();
        assert_eq!(url.as_str(), "https://api.jikan.moe/v4/users/some%20user/full");

        let url = provider.endpoint(&["anime", "5114"]).unwrap();
        assert_eq!(url.as_str(), "https://api.jikan.moe/v4/anime/5114");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider("https://api.jikan.moe/v4").name(), "jikan");
    }

    #[tokio::test]
    async fn test_fetch_top_anime() {
        let base_url = spawn_stub(stub_router()).await;
        let catalog = provider(&base_url).fetch_top_anime().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, 52991);
        assert_eq!(catalog[0].genres, vec![Genre::from("Adventure"), Genre::from("Fantasy")]);
        assert_eq!(
            catalog[0].image_url,
            Some("https://cdn.example/frieren.jpg".to_string())
        );
        assert_eq!(catalog[1].genres, vec![Genre::from("Action")]);
        assert_eq!(catalog[1].image_url, None);
    }

    #[tokio::test]
    async fn test_fetch_user_profile() {
        let base_url = spawn_stub(stub_router()).await;
        let provider = provider(&base_url);

        let profile = provider.fetch_user_profile("Xinil").await.unwrap();
        assert_eq!(profile.username, "Xinil");

        let err = provider.fetch_user_profile("ghost").await.unwrap_err();
        assert!(err.is_upstream_unavailable());
        assert!(matches!(err, AppError::UpstreamStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_user_profile_only_needs_success_status() {
        let base_url = spawn_stub(stub_router()).await;
        let profile = provider(&base_url)
            .fetch_user_profile("sparse")
            .await
            .unwrap();
        assert_eq!(profile.username, "sparse");
        assert_eq!(profile.mal_id, Some(7));
    }

    #[tokio::test]
    async fn test_favorites_without_anime_list_is_decode_error() {
        let base_url = spawn_stub(stub_router()).await;
        let err = provider(&base_url)
            .fetch_user_favorites("mangaka")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    fn engine(base_url: &str) -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(provider(base_url)), AffinityConfig::default())
    }

    #[tokio::test]
    async fn test_sparse_profile_still_reaches_favorites() {
        let base_url = spawn_stub(stub_router()).await;
        let result = engine(&base_url).recommend("sparse").await;

        // Favorite 1 is Action, 20 is rate limited and skipped
        assert_eq!(result.animes.len(), 1);
        assert_eq!(result.animes[0].title, "Steins;Gate");
        assert_eq!(result.genres, vec![Genre::from("Action")]);
    }

    #[tokio::test]
    async fn test_favorites_without_anime_list_is_unexpected_error() {
        let base_url = spawn_stub(stub_router()).await;
        let result = engine(&base_url).recommend("mangaka").await;

        assert_eq!(result.animes.len(), 1);
        assert!(result.animes[0].is_placeholder());
        assert!(result.animes[0]
            .title
            .starts_with("Unexpected error: Malformed response payload"));
    }

    #[tokio::test]
    async fn test_fetch_user_favorites() {
        let base_url = spawn_stub(stub_router()).await;
        let ids = provider(&base_url)
            .fetch_user_favorites("Xinil")
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 20]);
    }

    #[tokio::test]
    async fn test_fetch_anime_detail() {
        let base_url = spawn_stub(stub_router()).await;
        let provider = provider(&base_url);

        let anime = provider.fetch_anime_detail(1).await.unwrap();
        assert_eq!(anime.title, "Cowboy Bebop");
        assert_eq!(anime.genres, vec![Genre::from("Action")]);

        let err = provider.fetch_anime_detail(20).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamStatus { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let base_url = spawn_stub(stub_router()).await;
        let err = provider(&base_url).fetch_anime_detail(666).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(!err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Bind then drop to obtain a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{}/v4", addr))
            .fetch_top_anime()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }
}
