pub mod blocks;
pub mod canonicalize;
pub mod init;
pub mod merge;
pub mod requests;
pub mod status;

pub use blocks::{blocks, BlocksArgs};
pub use canonicalize::{canonicalize, CanonicalizeArgs};
pub use init::{init, InitArgs};
pub use merge::{merge, MergeArgs};
pub use requests::{poll, submit, PollArgs, SubmitArgs};
pub use status::{status, StatusArgs};

use colored::Colorize;
use pagedraft_editor::ConsistencyReport;

/// Consistency warnings go to stderr so stdout stays a clean document
fn report_consistency(report: &ConsistencyReport) {
    if report.outside_drift {
        eprintln!(
            "{} content outside the editable regions changed",
            "⚠️".yellow()
        );
    }
    if report.serialized_blocks != report.reparsed_blocks {
        eprintln!(
            "{} serialized {} blocks but re-parsed {}",
            "⚠️".yellow(),
            report.serialized_blocks,
            report.reparsed_blocks
        );
    }
}
