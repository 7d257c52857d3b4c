use crate::ports::reporter::{ReportLevel, Reporter};

/// Forwards sync progress to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Debug => log::debug!("{}", message),
            ReportLevel::Info => log::info!("{}", message),
            ReportLevel::Warning => log::warn!("{}", message),
            ReportLevel::Fatal => log::error!("{}", message),
        }
    }
}
