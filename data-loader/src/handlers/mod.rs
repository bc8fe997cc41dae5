//! Chat handlers: greeting, report commands, and the spreadsheet document loader.

mod document;
mod report;
mod start;

pub use document::{DocumentLoader, DOC_SUCCESS_MSG, XLSX_MIME_TYPE};
pub use report::{
    clear_db_command, period_report_handler, report_commands, PeriodReportHandler, ReportCommand,
    REPORT_RULE,
};
pub use start::{start_command, START_MSG};
