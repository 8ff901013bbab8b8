mod responses;
mod router;

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Maps a request to its response. Never fails: unmatched requests get a 404.
pub fn handle_request(req: &HttpRequest) -> HttpResponse {
    router::route(req)
}
