use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;

use shopfront_domain::id::{CategoryId, ProductId};

use crate::error::ClientError;
use crate::types::{
    Category, Envelope, ErrorEnvelope, Page, Product, ProductFilter, ProductUpload, SessionData,
    SessionUser, SubCategory, Wishlist,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const REFRESH_PATH: &str = "/auth/refresh";
const SESSION_COOKIES: [&str; 3] = ["accessToken", "userId", "refreshToken"];

/// Which half of the API to read the catalog through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    Admin,
    #[default]
    User,
}

impl Scope {
    fn prefix(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::User => "/user",
        }
    }
}

/// Cookie-based API session. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    /// Base URL including the `/api` prefix, without a trailing slash.
    base: String,
    origin: Url,
    user: Arc<Mutex<Option<SessionUser>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = base_url.trim_end_matches('/').to_owned();
        let origin =
            Url::parse(&base).map_err(|e| ClientError::InvalidBaseUrl(format!("{base}: {e}")))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            jar,
            base,
            origin,
            user: Arc::new(Mutex::new(None)),
        })
    }

    /// The signed-in user, if any.
    pub fn session(&self) -> Option<SessionUser> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, user: Option<SessionUser>) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Forget the signed-in user and expire every session cookie in the jar.
    pub fn clear_session(&self) {
        self.set_session(None);
        for name in SESSION_COOKIES {
            self.jar
                .add_cookie_str(&format!("{name}=; Max-Age=0; Path=/"), &self.origin);
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    // ── Transport ────────────────────────────────────────────────────────────

    /// Send a request built by `build`, refreshing once on 401.
    ///
    /// `build` runs again for the retry, so bodies that cannot be cloned
    /// (multipart) are rebuilt rather than replayed.
    async fn send<F>(&self, path: &str, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client, String) -> Result<RequestBuilder, ClientError>,
    {
        let response = build(&self.http, self.url(path))?.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED || path.starts_with(REFRESH_PATH) {
            return Ok(response);
        }

        tracing::debug!(path, "access token rejected, refreshing");
        if let Err(err) = self.refresh().await {
            tracing::debug!(path, error = %err, "refresh failed, clearing session");
            self.clear_session();
            return Err(ClientError::SessionExpired);
        }
        Ok(build(&self.http, self.url(path))?.send().await?)
    }

    async fn call<T, F>(&self, path: &str, build: F) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, String) -> Result<RequestBuilder, ClientError>,
    {
        decode(self.send(path, build).await?).await
    }

    async fn call_data<T, F>(&self, path: &str, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, String) -> Result<RequestBuilder, ClientError>,
    {
        into_data(self.call(path, build).await?)
    }

    // ── Auth ─────────────────────────────────────────────────────────────────

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let data: SessionData = self
            .call_data("/auth/signup", |http, url| Ok(http.post(url).json(&body)))
            .await?;
        self.set_session(Some(data.user.clone()));
        Ok(data.user)
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let body = json!({ "email": email, "password": password });
        let data: SessionData = self
            .call_data("/auth/signin", |http, url| Ok(http.post(url).json(&body)))
            .await?;
        self.set_session(Some(data.user.clone()));
        Ok(data.user)
    }

    /// Exchange the `userId` cookie for a fresh access token. Never retried.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url(REFRESH_PATH)).send().await?;
        decode::<IgnoredAny>(response).await.map(drop)
    }

    /// Ends the session server-side; local state is cleared regardless.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .call::<IgnoredAny, _>("/auth/logout", |http, url| Ok(http.post(url)))
            .await;
        self.clear_session();
        result.map(drop)
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub async fn categories(&self, scope: Scope) -> Result<Vec<Category>, ClientError> {
        let path = format!("{}/categories", scope.prefix());
        self.call_data(&path, |http, url| Ok(http.get(url))).await
    }

    pub async fn subcategories(&self, scope: Scope) -> Result<Vec<SubCategory>, ClientError> {
        let path = format!("{}/subcategories", scope.prefix());
        self.call_data(&path, |http, url| Ok(http.get(url))).await
    }

    pub async fn products(
        &self,
        scope: Scope,
        filter: &ProductFilter,
    ) -> Result<Page<Product>, ClientError> {
        let path = format!("{}/products", scope.prefix());
        let query = filter.query();
        let envelope: Envelope<Vec<Product>> = self
            .call(&path, |http, url| Ok(http.get(url).query(&query)))
            .await?;
        Ok(Page {
            pagination: envelope.pagination,
            items: into_data(envelope)?,
        })
    }

    pub async fn product(&self, scope: Scope, id: ProductId) -> Result<Product, ClientError> {
        let path = format!("{}/product/{id}", scope.prefix());
        self.call_data(&path, |http, url| Ok(http.get(url))).await
    }

    pub async fn add_category(&self, name: &str) -> Result<Category, ClientError> {
        let body = json!({ "name": name });
        self.call_data("/admin/categories", |http, url| {
            Ok(http.post(url).json(&body))
        })
        .await
    }

    pub async fn add_subcategory(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<SubCategory, ClientError> {
        let body = json!({ "name": name, "categoryId": category_id });
        self.call_data("/admin/subcategories", |http, url| {
            Ok(http.post(url).json(&body))
        })
        .await
    }

    pub async fn add_product(&self, upload: &ProductUpload) -> Result<Product, ClientError> {
        self.call_data("/admin/products", |http, url| {
            Ok(http.post(url).multipart(product_form(upload)?))
        })
        .await
    }

    pub async fn edit_product(
        &self,
        id: ProductId,
        upload: &ProductUpload,
    ) -> Result<Product, ClientError> {
        let path = format!("/admin/product/{id}");
        self.call_data(&path, |http, url| {
            Ok(http.put(url).multipart(product_form(upload)?))
        })
        .await
    }

    // ── Wishlist ─────────────────────────────────────────────────────────────

    pub async fn wishlist(&self) -> Result<Wishlist, ClientError> {
        self.call_data("/user/wishlist", |http, url| Ok(http.get(url)))
            .await
    }

    pub async fn add_to_wishlist(&self, product_id: ProductId) -> Result<Wishlist, ClientError> {
        let body = json!({ "productId": product_id });
        self.call_data("/user/wishlist", |http, url| Ok(http.post(url).json(&body)))
            .await
    }

    pub async fn remove_from_wishlist(
        &self,
        product_id: ProductId,
    ) -> Result<Wishlist, ClientError> {
        let path = format!("/user/wishlist/{product_id}");
        self.call_data(&path, |http, url| Ok(http.delete(url))).await
    }

    pub async fn clear_wishlist(&self) -> Result<Wishlist, ClientError> {
        self.call_data("/user/wishlist", |http, url| Ok(http.delete(url)))
            .await
    }
}

fn product_form(upload: &ProductUpload) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("title", upload.title.clone())
        .text("description", upload.description.clone())
        .text("subcategory", upload.subcategory.to_string())
        .text("variants", serde_json::to_string(&upload.variants)?);
    if let Some(keep) = &upload.existing_images {
        form = form.text("existingImages", serde_json::to_string(keep)?);
    }
    for image in &upload.images {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        form = form.part("images", part);
    }
    Ok(form)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorEnvelope>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

fn into_data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    envelope.data.ok_or_else(|| {
        ClientError::Decode(<serde_json::Error as serde::de::Error>::custom(
            "response carried no data",
        ))
    })
}
