pub mod warn;
pub mod util;
pub mod http_request_method;
pub mod http_response_status_codes;
pub mod store;
pub mod snippets;
pub mod library;
pub mod assets;
pub mod document;
pub mod webutils;
pub mod apachelog;
pub mod handler;
pub mod rouille_runner;
