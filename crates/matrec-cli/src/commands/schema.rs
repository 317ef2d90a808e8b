use matrec_audit::ReconciliationReport;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `matrec schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ReconciliationReport::json_schema(), flags.format)
}
