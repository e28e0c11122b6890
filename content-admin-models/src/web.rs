use actix_web::body::BoxBody;
use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// `code` carried by every successful envelope.
pub const CODE_OK: u16 = 0;
/// `code` carried by an envelope built from a rejected request.
pub const CODE_ERROR: u16 = 500;

/// JSON envelope returned by the admin API.
///
/// Rows, created or updated records and delivery counts travel in `data`;
/// failures produced outside a handler (auth) put the reason in `message`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            message: "success".into(),
            data: Some(data),
        }
    }

    /// Success without payload, e.g. after a delete.
    pub fn ok_empty() -> WebResponse<()> {
        WebResponse {
            code: CODE_OK,
            message: "success".into(),
            data: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            code: CODE_ERROR,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl<T> Responder for WebResponse<T>
where
    T: Serialize,
{
    type Body = BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<BoxBody> {
        HttpResponse::Ok().json(self)
    }
}
