use crate::http::headers::HttpHeaders;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatus;

pub const HELLO_BODY: &str = "Hello from HTTP/1.1 Server!";
pub const JSON_BODY: &str = r#"{"message": "Hello", "protocol": "HTTP/1.1"}"#;
pub const NOT_FOUND_BODY: &str = "404 - Not Found";

fn content_type(value: &str) -> Option<HttpHeaders> {
    Some([("Content-Type", value)].into_iter().collect())
}

pub fn hello(_req: &HttpRequest) -> HttpResponse {
    HttpResponse::new(HttpStatus::Ok, HELLO_BODY, content_type("text/plain"))
}

pub fn json_greeting(_req: &HttpRequest) -> HttpResponse {
    HttpResponse::new(HttpStatus::Ok, JSON_BODY, content_type("application/json"))
}

pub fn not_found() -> HttpResponse {
    HttpResponse::new(HttpStatus::NotFound, NOT_FOUND_BODY, content_type("text/plain"))
}
