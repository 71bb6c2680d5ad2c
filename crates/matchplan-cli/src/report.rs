//! Rendering of contribution schedules for the terminal.

use clap::ValueEnum;
use matchplan_calculator::format_cents;
use matchplan_types::{AllocationParameters, AllocationTotals, PaycheckLine};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A computed contribution schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub parameters: AllocationParameters,
    pub lines: Vec<PaycheckLine>,
    pub totals: AllocationTotals,
}

impl ScheduleReport {
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()?),
        }
    }

    fn render_text(&self) -> Result<String, std::fmt::Error> {
        let params = &self.parameters;
        let mut out = String::new();

        writeln!(
            out,
            "Strategy: {} (annual limit ${}, match {}%, max {}%)",
            params.strategy,
            format_cents(params.annual_limit_cents),
            params.match_rate_percent,
            params.max_rate_percent
        )?;
        writeln!(out, "{}", params.strategy.description())?;
        writeln!(out)?;
        writeln!(
            out,
            "{:>5}  {:>16}  {:>8}  {:>16}  {:>14}",
            "#", "Eligible pay", "Rate", "Contribution", "Match"
        )?;

        for line in &self.lines {
            writeln!(
                out,
                "{:>5}  {:>16}  {:>7}%  {:>16}  {:>14}",
                line.index + 1,
                format_cents(line.amount_cents),
                line.percentage,
                format_cents(line.contribution_cents),
                format_cents(line.match_cents)
            )?;
        }

        let totals = &self.totals;
        writeln!(
            out,
            "{:>5}  {:>16}  {:>7.2}%  {:>16}  {:>14}",
            "Total",
            format_cents(totals.gross_cents),
            totals.contribution_percentage,
            format_cents(totals.contribution_cents),
            format_cents(totals.match_cents)
        )?;

        Ok(out)
    }
}

/// One reconciled paycheck, rendered for the `reconcile` command.
pub fn render_line(line: &PaycheckLine, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(line)?),
        OutputFormat::Text => Ok(format!(
            "Eligible pay:  {}\nRate:          {}%\nContribution:  {}\nMatch:         {}\n",
            format_cents(line.amount_cents),
            line.percentage,
            format_cents(line.contribution_cents),
            format_cents(line.match_cents)
        )),
    }
}
