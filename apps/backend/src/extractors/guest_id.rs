use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::BytesMut;
use actix_web::{FromRequest, HttpRequest};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::trace_ctx;

pub const GUEST_ID_HEADER: &str = "x-guest-id";
pub const MAX_GUEST_ID_LEN: usize = 64;

/// Participant id for a v2 draw.
///
/// Taken from the JSON body (`guest_id`, then `guestId`) or, failing that,
/// from the `x-guest-id` header. Bodies declared with a non-JSON content type
/// are ignored; a body without a content type is read as JSON. Surrounding whitespace is trimmed. The
/// request is rejected before any handler code runs when the id is missing,
/// blank, or longer than 64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestId(pub String);

impl GuestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Validate an already-located raw id.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let id = raw.map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::GuestIdRequired,
                "guest_id is required",
            ));
        }
        if id.chars().count() > MAX_GUEST_ID_LEN {
            return Err(DomainError::validation(
                ValidationKind::GuestIdTooLong,
                format!("guest_id must be at most {MAX_GUEST_ID_LEN} characters"),
            ));
        }
        Ok(Self(id.to_string()))
    }
}

fn id_from_body(body: &Value) -> Option<&str> {
    ["guest_id", "guestId"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
}

/// JSON when declared so (`application/json`, `*/*+json`) or undeclared.
fn declares_json(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return true;
    };
    let essence = raw.split(';').next().unwrap_or_default().trim();
    essence.is_empty()
        || essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}

impl FromRequest for GuestId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        // read the header before the future to avoid borrowing req across await
        let header_id = req
            .headers()
            .get(GUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let json_body = declares_json(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    DomainError::validation(ValidationKind::InvalidBody, "Failed to read request body")
                })?;
                body.extend_from_slice(&chunk);
            }

            let parsed = if !json_body || body.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice::<Value>(&body).map_err(|e| {
                    debug!(
                        trace_id = %trace_id,
                        line = e.line(),
                        body_size = body.len(),
                        "JSON parsing failed"
                    );
                    DomainError::validation(ValidationKind::InvalidBody, "Invalid JSON body")
                })?
            };

            let raw = id_from_body(&parsed).or(header_id.as_deref());
            Ok(GuestId::parse(raw)?)
        })
    }
}
