#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Debug,
    Info,
    Warning,
    Fatal,
}

/// Port trait for progress messages emitted by the sync passes.
///
/// The production implementation is `services::log_reporter::LogReporter`.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter {
    fn report(&self, level: ReportLevel, message: &str);
}

/// Convenience helpers so call sites read like the `log` macros.
pub trait ReporterExt: Reporter {
    fn debug(&self, message: &str) {
        self.report(ReportLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.report(ReportLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.report(ReportLevel::Warning, message);
    }

    fn fatal(&self, message: &str) {
        self.report(ReportLevel::Fatal, message);
    }
}

impl<R: Reporter + ?Sized> ReporterExt for R {}
