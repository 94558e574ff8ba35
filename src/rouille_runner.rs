use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use rouille::{Server, Request, Response};

use crate::apachelog::{log_combined, Logs};
use crate::handler::TryMe;


/// Make a handler for Rouille's `Server`: dispatches to `tryme` and
/// logs each request.
pub fn server_handler(
    tryme: Arc<TryMe>,
    logs: Arc<Mutex<Logs>>,
) -> impl Fn(&Request) -> Response + Send + Sync + 'static
{
    move |request: &Request| -> Response {
        log_combined(request, &logs, || tryme.handle_request(request))
    }
}

/// Bind to `addr` and serve requests until the process ends.
pub fn run_server(
    addr: &str,
    tryme: Arc<TryMe>,
    logs: Arc<Mutex<Logs>>,
) -> Result<()>
{
    let server = Server::new(addr, server_handler(tryme, logs))
        .map_err(|e| anyhow!("starting server on {addr:?}: {e}"))?;
    eprintln!("Listening on http://{}/", server.server_addr());
    server.run();
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::apachelog::testlogs;
    use crate::document::DocumentOptions;
    use crate::store::memory::MemoryStore;

    #[test]
    fn t_server_handler_logs() {
        let tryme = Arc::new(TryMe::new("demo", Arc::new(MemoryStore::default()),
                                        DocumentOptions::default())
                             .expect("valid options"));
        let (logs, access, error) = testlogs::logs();
        let handler = server_handler(tryme, Arc::new(logs));

        let r = handler(&Request::fake_http("GET", "/missing", vec![], vec![]));
        assert_eq!(r.status_code, 404);
        assert!(access.contents().contains("\"GET /missing\" 404 0 "));

        let r = handler(&Request::fake_http(
            "POST", "/", vec![("Content-Type".into(), "text/plain".into())], vec![]));
        assert_eq!(r.status_code, 500);
        assert!(error.contents().contains("unsupported form content type \"text/plain\""));
    }
}
