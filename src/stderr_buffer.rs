use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Activate buffering. While active, log lines are stored instead of
/// printed to stderr.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// stderr writer for the tracing subscriber. Routes through the buffer
/// when it is active.
pub struct BufferedStderr;

/// `MakeWriter` constructor for `tracing_subscriber::fmt().with_writer(..)`
pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = lock();
        if let Some(lines) = guard.as_mut() {
            let text = String::from_utf8_lossy(buf);
            lines.push(text.trim_end_matches('\n').to_string());
            Ok(buf.len())
        } else {
            drop(guard);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the buffer is process-wide
    #[test]
    fn test_buffers_while_active() {
        activate();
        writer().write_all(b"first line\n").unwrap();
        writer().write_all(b"second line\n").unwrap();

        let lines = drain();
        assert_eq!(lines, vec!["first line", "second line"]);
        // Drained buffer is inactive; nothing more collects
        assert!(drain().is_empty());
    }
}
