use regex::Regex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Redacts credentials from formatted log lines.
#[derive(Clone)]
pub struct SecretScrubber {
    platform_token_pattern: Regex,
    bearer_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Personal access tokens: dop_v1_<hex>
            platform_token_pattern: Regex::new(r"do[a-z]_v1_[a-fA-F0-9]{16,}")?,
            bearer_pattern: Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.]+")?,
            field_pattern: Regex::new(
                r#"(?i)(["']?(?:api_token|api_key|access_key|accessKey|secret|secret_key|token)["']?\s*[:=]\s*)["']?[^"'\s,}]+["']?"#,
            )?,
        })
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .platform_token_pattern
            .replace_all(message, "[TOKEN_REDACTED]");
        let scrubbed = self
            .bearer_pattern
            .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, "${1}[REDACTED]")
            .into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// `MakeWriter` that scrubs each formatted event before it reaches `inner`.
#[derive(Debug, Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
    scrubber: Arc<SecretScrubber>,
}

impl<M> ScrubbingMakeWriter<M> {
    pub fn new(inner: M, scrubber: Arc<SecretScrubber>) -> Self {
        Self { inner, scrubber }
    }
}

impl<'a, M> MakeWriter<'a> for ScrubbingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
            scrubber: self.scrubber.clone(),
            buf: Vec::new(),
        }
    }
}

/// Buffers one event and writes the scrubbed text on flush or drop.
pub struct ScrubbingWriter<W: Write> {
    inner: W,
    scrubber: Arc<SecretScrubber>,
    buf: Vec<u8>,
}

impl<W: Write> ScrubbingWriter<W> {
    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let scrubbed = self
            .scrubber
            .scrub_message(&String::from_utf8_lossy(&self.buf));
        self.buf.clear();
        self.inner.write_all(scrubbed.as_bytes())
    }
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer()?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for ScrubbingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush_buffer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn scrubber() -> SecretScrubber {
        SecretScrubber::new().unwrap()
    }

    #[test]
    fn test_scrub_bearer_token() {
        let scrubbed = scrubber().scrub_message("Authorization: Bearer abc.def-123_xyz");
        assert!(!scrubbed.contains("abc.def-123_xyz"));
        assert!(scrubbed.contains("Bearer [TOKEN_REDACTED]"));
    }

    #[test]
    fn test_scrub_platform_token() {
        let token = "dop_v1_0123456789abcdef0123456789abcdef";
        let scrubbed = scrubber().scrub_message(&format!("using {token} now"));
        assert!(!scrubbed.contains(token));
        assert!(scrubbed.contains("[TOKEN_REDACTED]"));
    }

    #[test]
    fn test_scrub_access_key_fields() {
        let scrubbed = scrubber().scrub_message(r#"{"accessKey":"sk-demo-123","domain":"acme.com"}"#);
        assert!(!scrubbed.contains("sk-demo-123"));
        assert!(scrubbed.contains("acme.com"));

        let scrubbed = scrubber().scrub_message("api_token=hunter2 region=tor1");
        assert!(!scrubbed.contains("hunter2"));
        assert!(scrubbed.contains("region=tor1"));
    }

    #[test]
    fn test_plain_message_untouched() {
        let message = "reindex started kb_id=kb-1 job_id=job-9";
        assert_eq!(scrubber().scrub_message(message), message);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_scrubs_on_drop() {
        let captured = Captured::default();
        let sink = captured.clone();
        let make = ScrubbingMakeWriter::new(move || sink.clone(), Arc::new(scrubber()));

        {
            let mut writer = make.make_writer();
            write!(writer, "token=").unwrap();
            writeln!(writer, "supersecret value").unwrap();
        }

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out, "token=[REDACTED] value\n");
    }
}
