//! The crash record posted to the server.

use super::SubmissionError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Separator used when joining captured output lines.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Separator used when joining captured output lines.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Bytes that may appear in a text testcase.
fn is_text_byte(b: u8) -> bool {
    matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27 | 0x20..=0xff)
}

/// The program a crash was observed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramConfiguration {
    /// CPU architecture, e.g. `x86-64`.
    pub platform: String,
    /// Product name the server files the crash under.
    pub product: String,
    /// Operating system, e.g. `linux`.
    pub os: String,
    /// Product version, if known.
    pub version: Option<String>,
    /// Environment the program ran with.
    pub env: BTreeMap<String, String>,
    /// Command-line arguments, without the binary.
    pub args: Vec<String>,
    /// Metadata attached to every crash of this program.
    pub metadata: BTreeMap<String, String>,
}

impl ProgramConfiguration {
    /// A configuration with no version, environment, arguments or metadata.
    #[must_use]
    pub fn new(
        platform: impl Into<String>,
        product: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            product: product.into(),
            os: os.into(),
            ..Self::default()
        }
    }
}

/// A reproduction testcase attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testcase {
    data: Vec<u8>,
    ext: String,
    quality: i64,
}

impl Testcase {
    /// `ext` is the file extension without its leading dot; lower
    /// `quality` is better.
    #[must_use]
    pub fn from_bytes(data: impl Into<Vec<u8>>, ext: impl Into<String>, quality: i64) -> Self {
        Self {
            data: data.into(),
            ext: ext.into(),
            quality,
        }
    }

    /// Read a testcase file, taking the extension from its name.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Testcase`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>, quality: i64) -> Result<Self, SubmissionError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|error| SubmissionError::Testcase {
            path: path.to_path_buf(),
            error,
        })?;
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_bytes(data, ext, quality))
    }

    /// Whether `data` contains any byte outside the text byte table.
    #[must_use]
    pub fn is_binary(data: &[u8]) -> bool {
        data.iter().any(|&b| !is_text_byte(b))
    }

    /// Raw testcase contents.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Testcase quality; lower is better.
    #[must_use]
    pub fn quality(&self) -> i64 {
        self.quality
    }

    /// The payload as sent: base64 for binary data, text otherwise.
    fn encode(&self) -> (String, bool) {
        if Self::is_binary(&self.data) {
            (STANDARD.encode(&self.data), true)
        } else {
            (String::from_utf8_lossy(&self.data).into_owned(), false)
        }
    }
}

/// A crash in the form the server stores it.
///
/// Serializes to the server's form field names. Optional fields are omitted
/// when unset; `metadata`, `env` and `args` are JSON documents embedded as
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrashRecord {
    #[serde(rename = "rawStdout")]
    raw_stdout: String,
    #[serde(rename = "rawStderr")]
    raw_stderr: String,
    #[serde(rename = "rawCrashData")]
    raw_crash_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    testcase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    testcase_isbinary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    testcase_quality: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    testcase_ext: Option<String>,
    platform: String,
    product: String,
    os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_version: Option<String>,
    client: String,
    tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<String>,
}

impl CrashRecord {
    /// Start a record for a crash of the given program.
    #[must_use]
    pub fn builder(configuration: &ProgramConfiguration) -> CrashRecordBuilder<'_> {
        CrashRecordBuilder {
            configuration,
            stdout: Vec::new(),
            stderr: Vec::new(),
            crash_data: Vec::new(),
            testcase: None,
            metadata: BTreeMap::new(),
            client: None,
            tool: None,
        }
    }

    /// Captured stdout, lines joined with [`LINE_SEPARATOR`].
    #[must_use]
    pub fn raw_stdout(&self) -> &str {
        &self.raw_stdout
    }

    /// Captured stderr, lines joined with [`LINE_SEPARATOR`].
    #[must_use]
    pub fn raw_stderr(&self) -> &str {
        &self.raw_stderr
    }

    /// External crash report, lines joined with [`LINE_SEPARATOR`].
    #[must_use]
    pub fn raw_crash_data(&self) -> &str {
        &self.raw_crash_data
    }

    /// Product the crash is filed under.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Testcase payload as sent, if one is attached.
    #[must_use]
    pub fn testcase(&self) -> Option<&str> {
        self.testcase.as_deref()
    }

    /// Whether the attached testcase was base64-encoded.
    #[must_use]
    pub fn testcase_is_binary(&self) -> Option<bool> {
        self.testcase_isbinary
    }

    /// Merged metadata, JSON-encoded.
    #[must_use]
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }
}

/// Builder for [`CrashRecord`].
#[derive(Debug)]
pub struct CrashRecordBuilder<'a> {
    configuration: &'a ProgramConfiguration,
    stdout: Vec<String>,
    stderr: Vec<String>,
    crash_data: Vec<String>,
    testcase: Option<Testcase>,
    metadata: BTreeMap<String, String>,
    client: Option<String>,
    tool: Option<String>,
}

impl CrashRecordBuilder<'_> {
    /// Lines the program wrote to stdout.
    #[must_use]
    pub fn stdout<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdout.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Lines the program wrote to stderr.
    #[must_use]
    pub fn stderr<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stderr.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Lines of an external crash report (minidump output, etc.).
    #[must_use]
    pub fn crash_data<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crash_data.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Attach a reproduction testcase.
    #[must_use]
    pub fn testcase(mut self, testcase: Testcase) -> Self {
        self.testcase = Some(testcase);
        self
    }

    /// Add a metadata entry. Overrides an entry of the same key from the
    /// program configuration.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Identifier of the submitting client.
    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Name of the tool that found the crash.
    #[must_use]
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Assemble the record.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingSetting`] if `client` or `tool` was
    /// not provided, and [`SubmissionError::Encode`] if a JSON field cannot
    /// be encoded.
    pub fn build(self) -> Result<CrashRecord, SubmissionError> {
        let config = self.configuration;
        let client = self
            .client
            .ok_or(SubmissionError::MissingSetting { setting: "client" })?;
        let tool = self
            .tool
            .ok_or(SubmissionError::MissingSetting { setting: "tool" })?;

        let mut metadata = config.metadata.clone();
        metadata.extend(self.metadata);

        let (testcase, testcase_isbinary, testcase_quality, testcase_ext) = match &self.testcase {
            Some(tc) => {
                let (data, binary) = tc.encode();
                (Some(data), Some(binary), Some(tc.quality), Some(tc.ext.clone()))
            }
            None => (None, None, None, None),
        };

        let record = CrashRecord {
            raw_stdout: self.stdout.join(LINE_SEPARATOR),
            raw_stderr: self.stderr.join(LINE_SEPARATOR),
            raw_crash_data: self.crash_data.join(LINE_SEPARATOR),
            testcase,
            testcase_isbinary,
            testcase_quality,
            testcase_ext,
            platform: config.platform.clone(),
            product: config.product.clone(),
            os: config.os.clone(),
            product_version: config.version.clone(),
            client,
            tool,
            metadata: encode_unless_empty("metadata", &metadata, metadata.is_empty())?,
            env: encode_unless_empty("env", &config.env, config.env.is_empty())?,
            args: encode_unless_empty("args", &config.args, config.args.is_empty())?,
        };
        tracing::debug!(
            product = %record.product,
            testcase = record.testcase.is_some(),
            "built crash record"
        );
        Ok(record)
    }
}

fn encode_unless_empty<T: Serialize>(
    field: &'static str,
    value: &T,
    empty: bool,
) -> Result<Option<String>, SubmissionError> {
    if empty {
        return Ok(None);
    }
    serde_json::to_string(value)
        .map(Some)
        .map_err(|error| SubmissionError::Encode { field, error })
}
