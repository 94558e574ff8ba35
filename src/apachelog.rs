//! Write HTTP access log files in the Combined Log Format (extended
//! Common Log Format) for access logs (Apache style), as per
//! <https://httpd.apache.org/docs/2.4/logs.html>.

use std::fs::File;
use std::mem::swap;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{time::{Duration, SystemTime, Instant}, io::{stderr, BufWriter}};
use std::io::Write;

use anyhow::{Result, Context, anyhow};
use chrono::{DateTime, Utc, Datelike, Timelike};
use rouille::{Request, Response, ResponseBody};

use crate::http_response_status_codes::HttpResponseStatusCode;
use crate::warn;
use crate::webutils::errorpage_from_status;

static MONTHS: &[&str; 12] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

// "06/Dec/2023:02:02:47 +0000"
pub fn write_time(
    outp: &mut impl Write,
    time: SystemTime
) -> Result<()> {
    let dt: DateTime<Utc> = DateTime::from(time);
    write!(outp, "{:02}/{}/{:04}:{:02}:{:02}:{:02} +0000",
           dt.day(), MONTHS[dt.month0() as usize], dt.year(),
           dt.hour(), dt.minute(), dt.second())?;
    Ok(())
}

fn request_line(request: &Request) -> String {
    // `Request` does not keep the original request line.
    format!("{} {}", request.method(), request.raw_url())
}

// Apache:
// 44.212.94.18 - - [06/Dec/2023:02:38:18 +0100] "GET /resume/nontechnical.html HTTP/1.1" 200 2403 "-" "CCBot/2.0 (https://commoncrawl.org/faq/)"
// We also add duration at the end.

/// Write to the access log.
pub fn write_combined(
    outp: &mut impl Write,
    request: &Request,
    duration: Duration,
    response: &mut Response, // temporarily swaps out ResponseBody and back
) -> Result<()> {
    // Write the time when the log entry is made, not when the
    // request started
    let now = SystemTime::now();
    write!(outp, "{} - - [", request.remote_addr().ip())?;
    write_time(outp, now)?;
    let len = {
        // The body length is private, the only way to get at it is
        // to take the body apart and put it back together.
        let mut responsebody = ResponseBody::empty();
        swap(&mut responsebody, &mut response.data);
        let (data, length) = responsebody.into_reader_and_size();
        responsebody =
            if let Some(len) = length {
                ResponseBody::from_reader_and_size(data, len)
            } else {
                ResponseBody::from_reader(data)
            };
        swap(&mut responsebody, &mut response.data);
        length
    };
    writeln!(outp, "] {:?} {} {} {:?} {:?} {duration:?}",
             request_line(request),
             response.status_code,
             len.unwrap_or(0),
             request.header("referer").unwrap_or("-"),
             request.header("user-agent").unwrap_or("-"),
    )?;
    outp.flush()?;
    Ok(())
}

/// Write to the error log.
pub fn write_error(
    outp: &mut impl Write,
    request: &Request,
    duration: Duration,
    err: &anyhow::Error,
) -> Result<()> {
    let now = SystemTime::now();
    write!(outp, "[")?;
    write_time(outp, now)?;
    writeln!(outp, "] [error] [client {}] {:?} {duration:?}: {err:#}",
             request.remote_addr().ip(),
             request_line(request))?;
    outp.flush()?;
    Ok(())
}

/// Panic log to stderr.
fn write_panic_stderr(
    request: &Request,
    duration: Duration
) {
    let result = (|| -> std::io::Result<()> {
        let mut outp = BufWriter::new(stderr().lock());
        // stderr is expected to be fed to a service like daemontools
        // anyway, hence no timestamps.
        writeln!(&mut outp, "[panic] handling {:?} after {duration:?}",
                 request_line(request))?;
        outp.flush()
    })();
    if let Err(e) = result {
        warn!("could not write panic message: {e}");
    }
}


fn open_log_output(path: PathBuf) -> Result<Box<BufWriter<File>>> {
    let mut outp = File::options();
    outp.write(true).append(true).create(true);
    if let Some(parent) = path.parent() {
        let _ignore = std::fs::create_dir_all(parent);
    }
    Ok(Box::new(BufWriter::new(outp.open(&path).with_context(
        || anyhow!("opening log for output: {:?}", path.to_string_lossy()))?)))
}

/// The logs to write to: access_log if a response was produced,
/// error_log when the handler failed. Should do buffering, the code
/// calls flush once per entry.
pub struct Logs {
    pub access_log: Box<dyn Write + Send + Sync>,
    pub error_log: Box<dyn Write + Send + Sync>,
}

impl Logs {
    pub fn open_in_basedir(logbasedir: &str) -> Result<Mutex<Logs>> {
        Ok(Mutex::new(Logs {
            access_log: open_log_output(
                format!("{logbasedir}/http_access.log").into())?,
            error_log: open_log_output(
                format!("{logbasedir}/http_error.log").into())?,
        }))
    }

    /// Both logs go to stderr.
    pub fn stderr() -> Mutex<Logs> {
        Mutex::new(Logs {
            access_log: Box::new(stderr()),
            error_log: Box::new(stderr()),
        })
    }
}


// rouille::log_custom doesn't get to see the handler's Error, thus
// this is an adapted copy of its code.

/// Run `handler`, log the outcome, and turn errors into a 500 page.
/// Panics are logged to stderr and resumed.
pub fn log_combined<F>(
    request: &Request,
    logs: &Mutex<Logs>,
    handler: F
) -> Response
where
    F: FnOnce() -> Result<Response>,
{
    let start_instant = Instant::now();

    // We always resume unwinding afterwards, hence AssertUnwindSafe.
    let result = panic::catch_unwind(panic::AssertUnwindSafe(handler));
    let elapsed = start_instant.elapsed();

    match result {
        Ok(result) => match result {
            Ok(mut response) => {
                match logs.lock() {
                    Ok(mut logs) =>
                        if let Err(e) = write_combined(
                            &mut logs.access_log, request, elapsed, &mut response)
                        {
                            warn!("could not write to access log: {e:#}")
                        },
                    Err(_) => warn!("logs are poisoned")
                }
                response
            }
            Err(err) => {
                match logs.lock() {
                    Ok(mut logs) =>
                        if let Err(e) = write_error(
                            &mut logs.error_log, request, elapsed, &err)
                        {
                            warn!("could not write to error log: {e:#}")
                        },
                    Err(_) => warn!("logs are poisoned")
                }
                errorpage_from_status(HttpResponseStatusCode::InternalServerError500)
            }
        },
        Err(payload) => {
            write_panic_stderr(request, elapsed);
            // The panic handler will print the payload contents
            panic::resume_unwind(payload);
        }
    }
}


#[cfg(test)]
pub mod testlogs {
    //! Logs that can be read back.

    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("not poisoned")).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("not poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    /// (logs, access log, error log)
    pub fn logs() -> (Mutex<Logs>, SharedBuf, SharedBuf) {
        let access = SharedBuf::default();
        let error = SharedBuf::default();
        (Mutex::new(Logs {
            access_log: Box::new(access.clone()),
            error_log: Box::new(error.clone()),
        }), access, error)
    }
}
