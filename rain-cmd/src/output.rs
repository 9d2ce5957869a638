//! Report writers for the three output formats.

use crate::report::Report;
use crate::OutputFormat;
use rain_data::{DrySpell, RunningSeries};
use rain_utils::dates::format_date;
use std::io::Write;

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &Report,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)
                .map_err(|e| anyhow::anyhow!("Failed to write JSON report: {}", e))?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(writer, report)?,
        OutputFormat::Table => write_table(writer, report)?,
    }
    writer.flush()?;
    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, report: &Report) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    match report {
        Report::Totals { rows, .. } => {
            csv_writer.write_record(["period", "total_mm"])?;
            for row in rows {
                csv_writer.write_record([row.period.as_str(), &row.total.to_string()])?;
            }
        }
        Report::Comparison { rows, .. } => {
            csv_writer.write_record(["period", "average_mm", "trailing_total_mm"])?;
            for row in rows {
                csv_writer.write_record([
                    row.period.as_str(),
                    &row.average.to_string(),
                    &row.trailing_total.to_string(),
                ])?;
            }
        }
        Report::Progress { series, .. } => {
            csv_writer.write_record(["year", "day", "cumulative_mm"])?;
            for s in series {
                let year = s.year.to_string();
                for point in &s.points {
                    csv_writer.write_record([
                        year.as_str(),
                        point.day_label.as_str(),
                        &point.cumulative.to_string(),
                    ])?;
                }
            }
        }
        Report::DrySpells {
            longest, recent, ..
        } => {
            csv_writer.write_record(["list", "start", "end", "days"])?;
            let lists = [("longest", longest), ("recent", recent)];
            for (name, spells) in lists {
                for spell in spells {
                    csv_writer.write_record([
                        name,
                        &format_date(&spell.start),
                        &format_date(&spell.end),
                        &spell.days.to_string(),
                    ])?;
                }
            }
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, report: &Report) -> anyhow::Result<()> {
    match report {
        Report::Totals { title, rows } => {
            writeln!(writer, "{}", title)?;
            for row in rows {
                writeln!(writer, "{:<10} {:>10.1} mm", row.period, row.total)?;
            }
        }
        Report::Comparison {
            title,
            window_periods,
            window_start,
            window_end,
            rows,
        } => {
            writeln!(writer, "{}", title)?;
            if let (Some(start), Some(end)) = (window_start, window_end) {
                writeln!(
                    writer,
                    "Window: {} to {} ({} periods)",
                    format_date(start),
                    format_date(end),
                    window_periods
                )?;
            }
            for row in rows {
                writeln!(
                    writer,
                    "{}: {:.1}mm vs {:.1}mm",
                    row.period, row.average, row.trailing_total
                )?;
            }
        }
        Report::Progress { reference, series } => {
            writeln!(writer, "Year progress as of {}", format_date(reference))?;
            for s in series {
                write_series_line(writer, s)?;
            }
        }
        Report::DrySpells {
            min_rainfall,
            summary,
            longest,
            recent_from,
            recent_to,
            recent,
        } => {
            writeln!(writer, "Dry spells (rain day >= {} mm)", min_rainfall)?;
            writeln!(
                writer,
                "{} days, {} rain days, {} dry days in {} spells",
                summary.total_days, summary.rain_days, summary.dry_days, summary.spell_count
            )?;
            writeln!(writer, "Longest:")?;
            write_spells(writer, longest)?;
            writeln!(
                writer,
                "Between {} and {}:",
                format_date(recent_from),
                format_date(recent_to)
            )?;
            write_spells(writer, recent)?;
        }
    }
    Ok(())
}

fn write_series_line<W: Write>(writer: &mut W, series: &RunningSeries) -> std::io::Result<()> {
    let through = series
        .points
        .last()
        .map_or("-", |point| point.day_label.as_str());
    writeln!(
        writer,
        "{}: {:.1} mm through {} ({} days)",
        series.year,
        series.final_total(),
        through,
        series.points.len()
    )
}

fn write_spells<W: Write>(writer: &mut W, spells: &[DrySpell]) -> std::io::Result<()> {
    if spells.is_empty() {
        writeln!(writer, "  none")?;
    }
    for (rank, spell) in spells.iter().enumerate() {
        writeln!(
            writer,
            "  {:>2}. {} to {}: {} days",
            rank + 1,
            format_date(&spell.start),
            format_date(&spell.end),
            spell.days
        )?;
    }
    Ok(())
}
