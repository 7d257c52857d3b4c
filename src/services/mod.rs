pub mod dry_run;
pub mod fs_actions;
pub mod log_reporter;
