use std::convert::Infallible;

use canvas::{CanvasError, CooldownToken, PaintOutcome, PaintRequest};
use chrono::Utc;
use tracing::{debug, error};
use warp::{
    http::StatusCode,
    reject::Rejection,
    reply::Response,
    Reply,
};

use crate::{context::{CanvasContextRef, ViewerMsg}, ws, Result};

pub const COOKIE_NAME: &str = "lastPaint";

#[derive(Debug, serde::Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_reply(status: StatusCode, error: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error }), status).into_response()
}

/// An empty `lastPaint` cookie counts as no token.
pub fn cooldown_token(cookie: Option<String>) -> Option<CooldownToken> {
    cookie.filter(|value| !value.is_empty()).map(CooldownToken::from)
}

pub async fn board_handler(token: Option<CooldownToken>, context_ref: CanvasContextRef) -> Result<impl Reply> {
    let view = context_ref.orchestrator.snapshot(token.as_ref(), Utc::now());
    Ok(warp::reply::json(&view))
}

pub async fn paint_handler(request: PaintRequest, token: Option<CooldownToken>, context_ref: CanvasContextRef) -> Result<Response> {
    let outcome = match context_ref.orchestrator.paint(&request, token.as_ref(), Utc::now()) {
        Ok(outcome) => outcome,
        Err(CanvasError::InvalidInput(reason)) => {
            debug!("rejected paint: {reason}");
            return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid input"));
        }
        Err(e) => {
            error!("paint failed: {e}");
            return Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"));
        }
    };

    match outcome {
        PaintOutcome::Painted { view, token, cell } => {
            context_ref.broadcast(&ViewerMsg::Painted(cell)).await;
            let cookie = format!("{COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly", context_ref.cookie_max_age);
            Ok(warp::reply::with_header(warp::reply::json(&view), "set-cookie", cookie).into_response())
        }
        PaintOutcome::RateLimited { view } => Ok(warp::reply::json(&view).into_response()),
    }
}

pub async fn ws_handler(ws: warp::ws::Ws, context_ref: CanvasContextRef) -> Result<impl Reply> {
    Ok(ws.on_upgrade(move |socket| ws::viewer_connection_process(socket, context_ref)))
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}

pub async fn rejection_handler(rejection: Rejection) -> std::result::Result<Response, Infallible> {
    if rejection.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not Found"));
    }
    if rejection.find::<warp::filters::body::BodyDeserializeError>().is_some()
        || rejection.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid input"));
    }
    if rejection.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(error_reply(StatusCode::LENGTH_REQUIRED, "Length Required"));
    }
    if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error_reply(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"));
    }
    if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }
    debug!("rejected request: {rejection:?}");
    Ok(error_reply(StatusCode::BAD_REQUEST, "Bad Request"))
}
