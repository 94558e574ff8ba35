use std::borrow::Cow;

use anyhow::Result;
use rouille::{Response, ResponseBody};
use serde::Serialize;

use crate::http_response_status_codes::HttpResponseStatusCode;


pub fn errorpage_from_status(status: HttpResponseStatusCode) -> Response {
    let title = status.title();
    let explanation = status.desc();
    let resp = format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>\
                        <p>{explanation}</p></body></html>\n");
    Response {
        status_code: status.code(),
        headers: vec![(Cow::from("Content-type"), Cow::from("text/html"))],
        data: ResponseBody::from_string(resp),
        upgrade: None,
    }
}

/// Unknown paths get no body at all.
pub fn not_found() -> Response {
    Response {
        status_code: HttpResponseStatusCode::NotFound404.code(),
        headers: vec![],
        data: ResponseBody::empty(),
        upgrade: None,
    }
}

fn response_with(content_type: impl Into<Cow<'static, str>>, data: ResponseBody) -> Response {
    Response {
        status_code: HttpResponseStatusCode::OK200.code(),
        headers: vec![(Cow::from("Content-type"), content_type.into())],
        data,
        upgrade: None,
    }
}

/// `charset` is the name of the encoding `body` is in.
pub fn html_response(body: Vec<u8>, charset: &str) -> Response {
    response_with(format!("text/html; charset={charset}"), ResponseBody::from_data(body))
}

pub fn css_response(body: &'static str) -> Response {
    response_with("text/css; charset=utf-8", ResponseBody::from_data(body.as_bytes()))
}

pub fn js_response(body: &'static str) -> Response {
    response_with("text/javascript; charset=utf-8", ResponseBody::from_data(body.as_bytes()))
}

#[derive(Serialize)]
struct StatusReply {
    status: &'static str,
}

/// The acknowledgement of a save, `{"status":"ok"}`.
pub fn json_status_ok() -> Result<Response> {
    let body = serde_json::to_string(&StatusReply { status: "ok" })?;
    Ok(response_with("text/json", ResponseBody::from_string(body)))
}
