//! Submission boundary: the wire shape and retry policy a crash collector
//! uses when it posts a triaged crash to the crash-management server.
//!
//! Nothing here performs I/O beyond reading a testcase file. A transport
//! builds a [`CrashRecord`], serializes it with `serde` and drives its
//! request loop with [`RetryPolicy::decide`].
//!
//! ```
//! use crashsig::submission::{CrashRecord, ProgramConfiguration, RetryPolicy, SubmitDecision};
//!
//! let config = ProgramConfiguration::new("x86-64", "mozilla-central", "linux");
//! let record = CrashRecord::builder(&config)
//!     .stderr(["==1==ERROR: AddressSanitizer: SEGV"])
//!     .client("worker-3")
//!     .tool("fuzzer")
//!     .build()
//!     .unwrap();
//! assert_eq!(record.product(), "mozilla-central");
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.decide(201, 0), SubmitDecision::Done);
//! ```

#![warn(missing_docs)]

mod record;
mod retry;

pub use record::{CrashRecord, CrashRecordBuilder, ProgramConfiguration, Testcase, LINE_SEPARATOR};
pub use retry::{RetryPolicy, SubmitDecision, HTTP_CREATED};

use std::path::PathBuf;

/// Errors from building a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// A field could not be JSON-encoded.
    #[error("failed to encode \"{field}\" as JSON")]
    Encode {
        /// Wire name of the field.
        field: &'static str,
        /// Encoder error.
        #[source]
        error: serde_json::Error,
    },

    /// A setting every submission must carry was never provided.
    #[error("submission setting \"{setting}\" is not set")]
    MissingSetting {
        /// Name of the setting.
        setting: &'static str,
    },

    /// A testcase file could not be read.
    #[error("failed to read testcase {}", path.display())]
    Testcase {
        /// Path that was read.
        path: PathBuf,
        /// I/O error.
        #[source]
        error: std::io::Error,
    },
}
