use cookie::Cookie;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{
    CreateItemRequest, CreateItemResponse, GetAllItemsResponse, Item, ItemsQuery, LoginRequest,
    LoginResponse, Session, SessionCookie,
};

/// Thin wrapper over the product API routes
#[derive(Debug, Clone)]
pub struct ProductServiceClient {
    client: Client,
    base_url: String,
    host_header: Option<String>,
    session_cookie_name: String,
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ProductServiceClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host_header: config.host_header().map(str::to_string),
            session_cookie_name: config.session_cookie_name.clone(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.host_header {
            Some(host) => builder.header(header::HOST, host),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, url: &str) -> Result<RawResponse, ClientError> {
        let response = builder.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(RawResponse { status, headers, body })
    }

    /// Log in and return the cookies the service set.
    ///
    /// Fails on any status other than 200, and when the response carries no cookie at all.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        let url = self.url("usr/login");
        let builder = self.request(Method::POST, &url).json(request);
        let raw = self.execute(builder, &url).await?;

        let cookies = parse_set_cookies(&raw.headers);
        debug!("cookies response is {:?}", cookies);

        let raw = expect_status(raw, &[StatusCode::OK])?;
        if cookies.is_empty() {
            error!("Login to {} answered without cookies", url);
            return Err(ClientError::NoCookies);
        }
        if let Ok(body) = serde_json::from_str::<LoginResponse>(&raw.body) {
            debug!("login response detail: {}", body.detail);
        }

        info!("Logged in as {}", request.email);
        Ok(Session { cookies })
    }

    /// List items, optionally filtered
    pub async fn get_all_items(&self, query: &ItemsQuery) -> Result<GetAllItemsResponse, ClientError> {
        let url = self.url("product/items");
        let builder = self.request(Method::GET, &url).query(query);
        let raw = expect_status(self.execute(builder, &url).await?, &[StatusCode::OK])?;
        debug!("response is [{}]", raw.body);
        decode(&url, raw)
    }

    /// Fetch a single item by id
    pub async fn get_item(&self, item_id: i64) -> Result<Item, ClientError> {
        let url = self.url(&format!("product/items/{}", item_id));
        let builder = self.request(Method::GET, &url);
        let raw = expect_status(self.execute(builder, &url).await?, &[StatusCode::OK])?;
        debug!("response is [{}]", raw.body);
        decode(&url, raw)
    }

    /// Create an item. The session cookie is attached when a session is given.
    ///
    /// Returns the new item id when the service reports one.
    pub async fn create_item(
        &self,
        request: &CreateItemRequest,
        session: Option<&Session>,
    ) -> Result<Option<i64>, ClientError> {
        let url = self.url("product/items/create");
        let mut builder = self.request(Method::POST, &url).json(request);

        if let Some(session) = session {
            match session.cookie(&self.session_cookie_name) {
                Some(value) => {
                    let cookie = Cookie::new(self.session_cookie_name.as_str(), value);
                    builder = builder.header(header::COOKIE, cookie.to_string());
                }
                None => warn!(
                    "Session has no '{}' cookie, creating item without it",
                    self.session_cookie_name
                ),
            }
        }

        let raw = expect_status(
            self.execute(builder, &url).await?,
            &[StatusCode::CREATED, StatusCode::OK],
        )?;
        debug!("response is [{}]", raw.body);

        let item_id = serde_json::from_str::<CreateItemResponse>(&raw.body)
            .ok()
            .map(|r| r.item_id);
        Ok(item_id)
    }
}

fn parse_set_cookies(headers: &HeaderMap) -> Vec<SessionCookie> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value).ok())
        .map(|c| SessionCookie {
            name: c.name().to_string(),
            value: c.value().to_string(),
        })
        .collect()
}

fn expect_status(raw: RawResponse, accepted: &[StatusCode]) -> Result<RawResponse, ClientError> {
    if accepted.contains(&raw.status) {
        return Ok(raw);
    }

    error!("status code was [{}]", raw.status.as_u16());
    debug!("body was: {}", raw.body);
    Err(ClientError::UnexpectedStatus {
        status: raw.status,
        body: raw.body,
    })
}

fn decode<T: DeserializeOwned>(url: &str, raw: RawResponse) -> Result<T, ClientError> {
    serde_json::from_str(&raw.body).map_err(|source| {
        error!("Unmarshal of {} failed: {}", url, source);
        debug!("body was: {}", raw.body);
        ClientError::Decode {
            url: url.to_string(),
            source,
            body: raw.body,
        }
    })
}
