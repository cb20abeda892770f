use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Who is logging, and for which run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    /// Component name (e.g., "feed", "pipeline", "notify")
    pub component: String,
    pub area: Option<String>,
    pub day: Option<NaiveDate>,
}

impl LogContext {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            area: None,
            day: None,
        }
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = Some(area.to_string());
        self
    }

    pub fn with_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }
}

/// `component=feed,area=NO1,day=2025-08-17`, omitting unset parts
impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component={}", self.component)?;
        if let Some(area) = &self.area {
            write!(f, ",area={}", area)?;
        }
        if let Some(day) = &self.day {
            write!(f, ",day={}", day)?;
        }
        Ok(())
    }
}

/// Logger that stamps every event with its context as a `fields` value
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    fields: String,
}

impl StructuredLogger {
    pub fn new(context: &LogContext) -> Self {
        Self {
            fields: context.to_string(),
        }
    }

    pub fn fields(&self) -> &str {
        &self.fields
    }

    pub fn info(&self, message: &str) {
        info!(fields = %self.fields, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(fields = %self.fields, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(fields = %self.fields, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!(fields = %self.fields, "{}", message);
    }
}

/// Logger for a component with no run context
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(&LogContext::new(component))
}

pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(&context)
}
