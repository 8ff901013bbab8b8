use crate::handler::responses;
use crate::http::HttpMethod;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

type Handler = fn(&HttpRequest) -> HttpResponse;

struct Route {
    method: HttpMethod,
    path: &'static str,
    handler: Handler,
}

/// Exact `(method, path)` matches only, checked in order.
static ROUTES: [Route; 2] = [
    Route {
        method: HttpMethod::Get,
        path: "/",
        handler: responses::hello,
    },
    Route {
        method: HttpMethod::Get,
        path: "/json",
        handler: responses::json_greeting,
    },
];

pub fn route(req: &HttpRequest) -> HttpResponse {
    ROUTES
        .iter()
        .find(|r| r.method == req.method && r.path == req.path)
        .map_or_else(responses::not_found, |r| (r.handler)(req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parser::parse_request;

    fn dispatch(raw: &str) -> HttpResponse {
        route(&parse_request(raw.as_bytes()).unwrap())
    }

    #[test]
    fn root_says_hello() {
        let res = dispatch("GET / HTTP/1.1\r\nHost: x\r\n\r\n");

        assert_eq!(res.status(), 200);
        assert_eq!(res.reason(), "OK");
        assert_eq!(res.headers().get("Content-Type"), Some("text/plain"));
        assert_eq!(res.body(), responses::HELLO_BODY.as_bytes());
    }

    #[test]
    fn json_route_returns_the_greeting() {
        let res = dispatch("GET /json HTTP/1.1\r\n\r\n");

        assert_eq!(res.status(), 200);
        assert_eq!(res.headers().get("Content-Type"), Some("application/json"));
        assert_eq!(res.body(), br#"{"message": "Hello", "protocol": "HTTP/1.1"}"#);
        assert_eq!(res.headers().get("Content-Length"), Some("44"));
    }

    #[test]
    fn everything_else_is_not_found() {
        for raw in [
            "GET /missing HTTP/1.1\r\n\r\n",
            "POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n",
            "get / HTTP/1.1\r\n\r\n",
            "GET /json/ HTTP/1.1\r\n\r\n",
            "DELETE /json HTTP/1.0\r\n\r\n",
        ] {
            let res = dispatch(raw);

            assert_eq!(res.status(), 404, "{raw:?}");
            assert_eq!(res.reason(), "Not Found");
            assert_eq!(res.headers().get("Content-Type"), Some("text/plain"));
            assert_eq!(res.body(), b"404 - Not Found");
        }
    }
}
