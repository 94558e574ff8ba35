//! Operational messages to stderr.

use std::sync::atomic::AtomicBool;

/// Set by `--quiet`; checked by `warn!`.
pub static QUIET: AtomicBool = AtomicBool::new(false);

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        if !$crate::warn::QUIET.load(std::sync::atomic::Ordering::Relaxed) {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "W: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
            let _ = outp.flush();
        }
    } }
}
