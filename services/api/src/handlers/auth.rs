use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use shopfront_auth_types::cookie::{
    REFRESH_TOKEN, USER_ID, clear_cookies, set_access_token_cookie, set_user_id_cookie,
};
use shopfront_core::envelope::Envelope;
use shopfront_core::extract::Json;

use crate::domain::repository::Repositories;
use crate::error::ApiError;
use crate::handlers::view::UserView;
use crate::state::AppState;
use crate::usecase::auth::{
    LoginInput, LoginUseCase, LogoutInput, LogoutUseCase, RefreshUseCase, Session, SignupInput,
    SignupUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserView,
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenData {
    pub access_token: String,
}

/// Set both session cookies and split off the response payload.
fn start_session<R: Repositories>(
    state: &AppState<R>,
    jar: CookieJar,
    session: Session,
) -> (CookieJar, SessionData) {
    let jar = set_access_token_cookie(jar, session.tokens.access_token.clone(), &state.cookies);
    let jar = set_user_id_cookie(jar, session.tokens.identity_token, &state.cookies);
    let data = SessionData {
        user: session.user.into(),
        access_token: session.tokens.access_token,
    };
    (jar, data)
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name).map(|c| c.value().to_owned())
}

// ── POST /api/auth/signup ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn signup<R: Repositories>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        passwords: state.passwords,
        tokens: state.tokens.clone(),
    };
    let session = usecase
        .execute(SignupInput {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
        })
        .await?;

    let (jar, data) = start_session(&state, jar, session);
    Ok((
        StatusCode::CREATED,
        jar,
        Envelope::ok(data, "User created successfully"),
    ))
}

// ── POST /api/auth/signin ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn signin<R: Repositories>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        passwords: state.passwords,
        tokens: state.tokens.clone(),
    };
    let session = usecase
        .execute(LoginInput {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
        })
        .await?;

    let (jar, data) = start_session(&state, jar, session);
    Ok((jar, Envelope::ok(data, "Login successful")))
}

// ── POST /api/auth/refresh ───────────────────────────────────────────────────

pub async fn refresh<R: Repositories>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RefreshUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let session = usecase.execute(cookie_value(&jar, USER_ID)).await?;

    let (jar, data) = start_session(&state, jar, session);
    Ok((
        jar,
        Envelope::ok(
            AccessTokenData {
                access_token: data.access_token,
            },
            "Token refreshed successfully",
        ),
    ))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout<R: Repositories>(
    State(state): State<AppState<R>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LogoutUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    usecase
        .execute(LogoutInput {
            refresh_cookie: cookie_value(&jar, REFRESH_TOKEN),
            identity_cookie: cookie_value(&jar, USER_ID),
        })
        .await?;

    let jar = clear_cookies(jar, &state.cookies);
    Ok((jar, Envelope::message("Logout successful")))
}
