//! Output writers for balance reports.

use crate::balance::BalanceReport;
use crate::error::Result;
use std::io::Write;

/// Writes the report as pretty-printed JSON with the wire field names.
pub fn write_json<W: Write>(report: &BalanceReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the transfers as CSV, in settlement order.
///
/// All amounts are formatted with exactly 4 decimal places.
pub fn write_settlements_csv<W: Write>(report: &BalanceReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["from", "to", "amount"])?;

    for transfer in &report.settlements {
        csv_writer.write_record([
            transfer.from.as_str(),
            transfer.to.as_str(),
            transfer.amount.to_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
