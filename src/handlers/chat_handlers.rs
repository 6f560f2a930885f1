use axum::{
    extract::Path,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use hyper::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    app_state::AppState,
    error::AppError,
    middleware::auth_middleware::{current_user, ChatUser, TOKEN_COOKIE},
    models::{message::PostMessageData, user::LoginData},
    services::{chat_service, jwt_service::create_jwt},
    utils::validation::USERNAME_REGEX,
};

// Room names are `[\w-]`, so only non-ASCII letters need escaping in a path.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

const LOGIN_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/login.html"));
const CHAT_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/chat.html"));

// Only values that passed validation are echoed back into the page.
fn render_login(username: &str, room_name: &str, errors: Option<&ValidationErrors>) -> String {
    let errors = errors
        .map(|errors| {
            let items: String = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|err| err.message.as_ref())
                .map(|message| format!("<li>{message}</li>"))
                .collect();
            format!("<ul class=\"errors\">{items}</ul>")
        })
        .unwrap_or_default();

    LOGIN_TEMPLATE
        .replace("{errors}", &errors)
        .replace("{username}", username)
        .replace("{room_name}", room_name)
}

fn chat_url(room_name: &str) -> String {
    format!("/chat/{}/", utf8_percent_encode(room_name, PATH_SEGMENT))
}

/// GET /
pub async fn login_page(Extension(state): Extension<AppState>, headers: HeaderMap) -> Html<String> {
    let username = current_user(&headers, &state.settings.jwt_secret).unwrap_or_default();
    Html(render_login(&username, "", None))
}

/// POST /
pub async fn login(
    Extension(state): Extension<AppState>,
    Form(mut payload): Form<LoginData>,
) -> Result<Response, AppError> {
    payload.room_name = payload.room_name.to_lowercase();
    if let Err(errors) = payload.validate() {
        let username = if USERNAME_REGEX.is_match(&payload.username) {
            payload.username.as_str()
        } else {
            ""
        };
        let page = render_login(username, "", Some(&errors));
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    let settings = &state.settings;
    let token = create_jwt(&payload.username, &settings.jwt_secret, settings.session_ttl_hours)
        .map_err(|e| AppError::Internal(format!("Failed to sign login token: {e}")))?;
    let cookie = format!(
        "{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.session_ttl_hours * 3600
    );

    info!("{} logged in, entering room {}", payload.username, payload.room_name);
    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(&chat_url(&payload.room_name)),
    )
        .into_response())
}

/// GET /chat/:room_name/
pub async fn chat_page(
    Extension(state): Extension<AppState>,
    Extension(ChatUser(username)): Extension<ChatUser>,
    Path(room_name): Path<String>,
) -> Result<Html<String>, AppError> {
    let room = chat_service::resolve_room(&state, &room_name).await?;

    Ok(Html(
        CHAT_TEMPLATE
            .replace("{room_name}", &room.name)
            .replace("{username}", &username),
    ))
}

/// POST /chat/:room_name/
pub async fn post_chat_message(
    Extension(state): Extension<AppState>,
    Extension(ChatUser(username)): Extension<ChatUser>,
    Path(room_name): Path<String>,
    Form(data): Form<PostMessageData>,
) -> Result<Redirect, AppError> {
    let room = chat_service::resolve_room(&state, &room_name).await?;
    let target = chat_url(&room.name);

    if let Err(errors) = data.validate() {
        warn!("Discarding invalid message from {}: {}", username, errors);
        return Ok(Redirect::to(&target));
    }

    chat_service::post_message(&state, &room.name, &username, &data.content).await?;
    Ok(Redirect::to(&target))
}
