//! Request dispatch for one project.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Result, Context, anyhow, bail};
use rouille::{Request, Response};
use rouille::input::multipart::get_multipart_input;
use rouille::input::post::raw_urlencoded_post_input;

use crate::assets::{CONSOLE_CSS, CONSOLE_CSS_PATH, CONSOLE_JS, CONSOLE_JS_PATH};
use crate::document::{DocumentOptions, make_document};
use crate::http_request_method::{HttpRequestMethod, HttpRequestMethodSimple};
use crate::http_response_status_codes::HttpResponseStatusCode;
use crate::library::LibraryRegistry;
use crate::snippets::save_snippet_fields;
use crate::store::ProjectStore;
use crate::warn;
use crate::webutils::{errorpage_from_status, not_found, html_response, css_response,
                      js_response, json_status_ok};

const MAIN_PATH: &str = "/";

/// Everything a request needs: which project, where it's stored,
/// how to render it.
pub struct TryMe {
    pub project: String,
    pub store: Arc<dyn ProjectStore>,
    pub options: DocumentOptions,
}

impl TryMe {
    pub fn new(
        project: impl Into<String>,
        store: Arc<dyn ProjectStore>,
        options: DocumentOptions,
    ) -> Result<Self> {
        options.check()?;
        Ok(TryMe {
            project: project.into(),
            store,
            options,
        })
    }

    /// Errors are left to the caller to log and turn into a 500
    /// response.
    pub fn handle_request(&self, request: &Request) -> Result<Response> {
        let method = match HttpRequestMethod::from_str(request.method()) {
            Ok(method) => method,
            Err(e) => {
                warn!("{e:#}");
                return Ok(errorpage_from_status(HttpResponseStatusCode::NotImplemented501))
            }
        };
        let simplemethod = match method.to_simple() {
            Some(m) => m,
            None => {
                warn!("method {:?} not implemented", method.as_str());
                return Ok(errorpage_from_status(HttpResponseStatusCode::NotImplemented501))
            }
        };
        let path = request.url();
        match simplemethod {
            HttpRequestMethodSimple::POST =>
                if path == MAIN_PATH {
                    self.save(request)
                } else {
                    Ok(not_found())
                },
            // HEAD gets the full response too, the server drops the
            // body but keeps the Content-Length.
            HttpRequestMethodSimple::GET | HttpRequestMethodSimple::HEAD =>
                match path.as_str() {
                    MAIN_PATH => Ok(html_response(
                        make_document(&*self.store, &self.project, &self.options)?,
                        self.options.encoding()?.name())),
                    CONSOLE_CSS_PATH => Ok(css_response(CONSOLE_CSS)),
                    CONSOLE_JS_PATH => Ok(js_response(CONSOLE_JS)),
                    _ => Ok(not_found())
                }
        }
    }

    /// Store the submitted snippets and library selections. The
    /// library configuration is written back even if no selection
    /// changed.
    fn save(&self, request: &Request) -> Result<Response> {
        let fields = form_fields(request)?;
        save_snippet_fields(&*self.store, &self.project, &fields)?;
        let mut registry = LibraryRegistry::load(&*self.store, &self.project)?;
        registry.apply_selections(&fields);
        registry.save(&*self.store, &self.project)?;
        json_status_ok()
    }
}

/// The fields of a posted form, in submission order. Accepts
/// `multipart/form-data` and `application/x-www-form-urlencoded`.
pub fn form_fields(request: &Request) -> Result<Vec<(String, String)>> {
    let content_type = request.header("Content-Type").unwrap_or("");
    if content_type.starts_with("multipart/form-data") {
        let mut multipart = get_multipart_input(request).map_err(
            |e| anyhow!("reading multipart form: {e}"))?;
        let mut fields = Vec::new();
        while let Some(mut field) = multipart.next() {
            let name = field.headers.name.to_string();
            let mut value = String::new();
            field.data.read_to_string(&mut value).with_context(
                || anyhow!("reading form field {name:?}"))?;
            fields.push((name, value));
        }
        Ok(fields)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        raw_urlencoded_post_input(request).map_err(
            |e| anyhow!("reading urlencoded form: {e}"))
    } else {
        bail!("unsupported form content type {content_type:?}")
    }
}
