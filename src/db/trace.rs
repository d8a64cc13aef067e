//! SQL trace events
//!
//! A [`TraceSink`] attached to a database receives one event before and one
//! after every statement a connection executes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::orm::SqlValue;

#[derive(Debug)]
pub enum TraceEvent<'a> {
    BeforeExecute {
        sql: &'a str,
        params: &'a [SqlValue],
    },
    AfterExecute {
        sql: &'a str,
        elapsed: Duration,
        rows: usize,
    },
    Error {
        sql: &'a str,
        elapsed: Duration,
        error: &'a sqlx::Error,
    },
}

impl TraceEvent<'_> {
    pub fn sql(&self) -> &str {
        match self {
            TraceEvent::BeforeExecute { sql, .. }
            | TraceEvent::AfterExecute { sql, .. }
            | TraceEvent::Error { sql, .. } => sql,
        }
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::BeforeExecute { sql, params } => {
                writeln!(f, "-- BeforeExecute")?;
                for (i, param) in params.iter().enumerate() {
                    match param {
                        SqlValue::String(s) => writeln!(f, "-- ?{} = '{}'", i + 1, s)?,
                        other => writeln!(f, "-- ?{} = {}", i + 1, other)?,
                    }
                }
                write!(f, "{}", sql)
            }
            TraceEvent::AfterExecute { elapsed, rows, .. } => {
                write!(f, "-- AfterExecute: {} row(s) in {:?}", rows, elapsed)
            }
            TraceEvent::Error { elapsed, error, .. } => {
                write!(f, "-- Error after {:?}: {}", elapsed, error)
            }
        }
    }
}

/// Receiver of trace events.
pub type TraceSink = Arc<dyn Fn(&TraceEvent<'_>) + Send + Sync>;

/// Write every event to stdout, one block per event.
pub fn stdout_sink() -> TraceSink {
    Arc::new(|event| println!("{}", event))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_before_execute_lists_parameters() {
        let params = [SqlValue::String("B".to_string()), SqlValue::Float(0.06)];
        let event = TraceEvent::BeforeExecute {
            sql: "SELECT 1",
            params: &params,
        };
        assert_eq!(
            event.to_string(),
            "-- BeforeExecute\n-- ?1 = 'B'\n-- ?2 = 0.06\nSELECT 1"
        );
        assert_eq!(event.sql(), "SELECT 1");
    }
}
