use crate::SinkError;
use core::{fmt, str::FromStr};
use std::path::{Path, PathBuf};

/// Where a result should be written: a backend plus a bucket name.
///
/// Parsed from the user-facing destination string:
///
/// - `my-bucket` or `gs://my-bucket` - Google Cloud Storage
/// - `file:///var/lib/pi/my-bucket` - local directory `my-bucket` under
///   `/var/lib/pi`
/// - `memory://my-bucket` - process-local in-memory store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Gcs { bucket: String },
    Local { root: PathBuf, bucket: String },
    Memory { bucket: String },
}

impl Destination {
    /// The bucket passed to [`BlobSink::put`](crate::BlobSink::put).
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::Gcs { bucket } | Self::Local { bucket, .. } | Self::Memory { bucket } => bucket,
        }
    }

    /// Human-readable URI of `key` within this destination.
    #[must_use]
    pub fn location(&self, key: &str) -> String {
        match self {
            Self::Gcs { bucket } => format!("gs://{bucket}/{key}"),
            Self::Local { root, bucket } => {
                format!("file://{}", root.join(bucket).join(key).display())
            }
            Self::Memory { bucket } => format!("memory://{bucket}/{key}"),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gcs { bucket } => write!(f, "gs://{bucket}"),
            Self::Local { root, bucket } => write!(f, "file://{}", root.join(bucket).display()),
            Self::Memory { bucket } => write!(f, "memory://{bucket}"),
        }
    }
}

impl FromStr for Destination {
    type Err = SinkError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = |reason: &str| SinkError::InvalidDestination {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if let Some(rest) = trimmed.strip_prefix("gs://") {
            return Ok(Self::Gcs {
                bucket: bucket_name(rest).map_err(invalid)?,
            });
        }

        if let Some(rest) = trimmed.strip_prefix("memory://") {
            return Ok(Self::Memory {
                bucket: bucket_name(rest).map_err(invalid)?,
            });
        }

        if let Some(rest) = trimmed.strip_prefix("file://") {
            let path = Path::new(rest.trim_end_matches('/'));
            let bucket = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| invalid("path must end in a bucket directory"))?
                .to_string();
            let root = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(Self::Local { root, bucket });
        }

        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(invalid(&format!("unsupported scheme `{scheme}`")));
        }

        Ok(Self::Gcs {
            bucket: bucket_name(trimmed).map_err(invalid)?,
        })
    }
}

fn bucket_name(raw: &str) -> Result<String, &'static str> {
    let name = raw.trim_end_matches('/');
    if name.is_empty() {
        return Err("bucket name is empty");
    }
    if name.contains('/') {
        return Err("bucket name must not contain `/`");
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Destination {
        input.parse().unwrap()
    }

    #[test]
    fn bare_names_default_to_gcs() {
        assert_eq!(
            parse("pi-results"),
            Destination::Gcs {
                bucket: "pi-results".into()
            }
        );
        assert_eq!(parse("gs://pi-results/"), parse("pi-results"));
    }

    #[test]
    fn parses_memory_and_file() {
        assert_eq!(
            parse("memory://scratch"),
            Destination::Memory {
                bucket: "scratch".into()
            }
        );
        assert_eq!(
            parse("file:///var/lib/pi/results/"),
            Destination::Local {
                root: PathBuf::from("/var/lib/pi"),
                bucket: "results".into()
            }
        );
        assert_eq!(
            parse("file://results"),
            Destination::Local {
                root: PathBuf::from("."),
                bucket: "results".into()
            }
        );
    }

    #[test]
    fn rejects_malformed_destinations() {
        for input in ["", "   ", "gs://", "gs://a/b", "a/b", "memory://", "s3://bucket", "file://"] {
            let err = input.parse::<Destination>().unwrap_err();
            assert!(
                matches!(err, SinkError::InvalidDestination { .. }),
                "{input:?} -> {err}"
            );
        }
    }

    #[test]
    fn renders_locations() {
        let key = "pi-2026-10-18T09:30:00Z";
        assert_eq!(
            parse("bucket").location(key),
            "gs://bucket/pi-2026-10-18T09:30:00Z"
        );
        assert_eq!(
            parse("memory://m").location(key),
            "memory://m/pi-2026-10-18T09:30:00Z"
        );
        assert_eq!(
            parse("file:///tmp/out/b").location(key),
            "file:///tmp/out/b/pi-2026-10-18T09:30:00Z"
        );
        assert_eq!(parse("gs://bucket").to_string(), "gs://bucket");
        assert_eq!(parse("gs://bucket").bucket(), "bucket");
    }
}
