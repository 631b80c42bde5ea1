//! Typed lookup outcomes.

use crate::errors::LookupError;

/// Where the data in a successful outcome came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Parsed from a positive remote response.
    Live,
    /// Built-in catalog substituted after the remote lookup failed.
    Fallback(LookupError),
}

impl DataSource {
    pub fn fallback_reason(&self) -> Option<&LookupError> {
        match self {
            DataSource::Live => None,
            DataSource::Fallback(reason) => Some(reason),
        }
    }
}

/// Result of a lookup client operation.
///
/// Client operations never return `Err`; every failure becomes either an
/// `Ok` carrying fallback data or, when fallback is disabled, `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Ok { value: T, source: DataSource },
    Failed { reason: LookupError },
}

impl<T> LookupOutcome<T> {
    pub fn live(value: T) -> Self {
        Self::Ok {
            value,
            source: DataSource::Live,
        }
    }

    pub fn fallback(value: T, reason: LookupError) -> Self {
        Self::Ok {
            value,
            source: DataSource::Fallback(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// True when the value came straight from the remote.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            Self::Ok {
                source: DataSource::Live,
                ..
            }
        )
    }

    /// True when the value came from the built-in catalog.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Self::Ok {
                source: DataSource::Fallback(_),
                ..
            }
        )
    }

    /// The value, if any, regardless of its source.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    /// The failure behind this outcome: the `Failed` reason or the fallback cause.
    pub fn error(&self) -> Option<&LookupError> {
        match self {
            Self::Ok {
                source: DataSource::Fallback(reason),
                ..
            }
            | Self::Failed { reason } => Some(reason),
            Self::Ok { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LookupOutcome<U> {
        match self {
            Self::Ok { value, source } => LookupOutcome::Ok {
                value: f(value),
                source,
            },
            Self::Failed { reason } => LookupOutcome::Failed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_still_ok() {
        let reason = LookupError::Transport {
            reason: "connection refused".to_string(),
        };
        let outcome = LookupOutcome::fallback(vec![1, 2, 3], reason.clone());

        assert!(outcome.is_ok());
        assert!(outcome.is_fallback());
        assert_eq!(outcome.error(), Some(&reason));
        assert_eq!(outcome.value().map(Vec::len), Some(3));
    }

    #[test]
    fn test_map_preserves_source() {
        let outcome = LookupOutcome::live(vec![1, 2, 3]).map(|v| v.len());
        assert_eq!(outcome, LookupOutcome::live(3));

        let failed: LookupOutcome<Vec<u8>> = LookupOutcome::Failed {
            reason: LookupError::HttpStatus { status: 503 },
        };
        assert_eq!(failed.map(|v| v.len()).into_value(), None);
    }
}
