use std::fmt;

/// Errors surfaced by the time-series layer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O failure reported by the underlying ordered engine.
    #[error("engine error: {0}")]
    Engine(#[from] std::io::Error),

    /// A stored key did not decode to a `(namespace, timestamp)` pair.
    #[error("malformed key {}: {reason}", DisplayKey(.key))]
    MalformedKey { key: Vec<u8>, reason: &'static str },

    /// One or more namespaces could not be planned during `trim_all`.
    /// Nothing was committed.
    #[error("trim_all aborted; {} namespace(s) failed: {}", .failures.len(), DisplayFailures(.failures))]
    TrimAll { failures: Vec<NamespaceFailure> },
}

/// A failure tied to the namespace it happened in.
#[derive(Debug)]
pub struct NamespaceFailure {
    pub namespace: String,
    pub error: Error,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed_key(key: &[u8], reason: &'static str) -> Self {
        Error::MalformedKey {
            key: key.to_vec(),
            reason,
        }
    }
}

struct DisplayKey<'a>(&'a [u8]);

impl fmt::Display for DisplayKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.0))
    }
}

struct DisplayFailures<'a>(&'a [NamespaceFailure]);

impl fmt::Display for DisplayFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "[{}] {}", failure.namespace, failure.error)?;
        }
        Ok(())
    }
}
