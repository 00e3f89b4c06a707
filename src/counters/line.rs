//! A counter that writes one line per event.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

use crate::counters::{Counter, CounterKey};

/// Writes `[name] N bytes read` / `[name] N bytes written` for every event.
///
/// Output goes to stdout unless another sink is supplied with
/// [`with_writer`](LineCounter::with_writer). Write failures are logged and
/// otherwise ignored.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::LineCounter;
/// use counter_hooks::factories::SimpleCounterFactory;
/// use std::sync::Arc;
///
/// let counter = Arc::new(LineCounter::new("pdf"));
/// let factory = SimpleCounterFactory::new(counter);
/// assert_eq!(format!("{:?}", factory), "SimpleCounterFactory { .. }");
/// ```
pub struct LineCounter {
    name: Cow<'static, str>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl LineCounter {
    /// Creates a counter writing to stdout under `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sink: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Creates a counter named after the key's type.
    pub fn for_key(key: &CounterKey) -> Self {
        Self::new(key.name())
    }

    /// Replaces the output sink.
    pub fn with_writer(self, writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
            ..self
        }
    }

    /// Returns the name printed in every line.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, length: u64, verb: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(|p| p.into_inner());
        let written = writeln!(sink, "[{}] {} bytes {}", self.name, length, verb)
            .and_then(|_| sink.flush());
        if let Err(err) = written {
            warn!(counter = %self.name, error = %err, "line counter failed to write");
        }
    }
}

impl Default for LineCounter {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl fmt::Debug for LineCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineCounter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Counter for LineCounter {
    fn on_document_read(&self, _document: &dyn Any, length: u64) {
        self.emit(length, "read");
    }

    fn on_document_write(&self, _document: &dyn Any, length: u64) {
        self.emit(length, "written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines() {
        let buf = SharedBuf::default();
        let counter = LineCounter::new("pdf").with_writer(buf.clone());

        counter.on_document_read(&(), 1024);
        counter.on_document_write(&(), 2048);

        assert_eq!(
            buf.contents(),
            "[pdf] 1024 bytes read\n[pdf] 2048 bytes written\n"
        );
    }

    #[test]
    fn test_for_key() {
        let counter = LineCounter::for_key(&CounterKey::of::<String>());
        assert_eq!(counter.name(), "alloc::string::String");
    }

    #[test]
    fn test_default_name() {
        assert_eq!(LineCounter::default().name(), "counter-hooks");
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let counter = LineCounter::new("pdf").with_writer(Broken);
        counter.on_document_read(&(), 1);
        counter.on_document_write(&(), 1);
    }

    #[test]
    fn test_debug() {
        let counter = LineCounter::new("pdf");
        assert!(format!("{:?}", counter).contains("\"pdf\""));
    }
}
