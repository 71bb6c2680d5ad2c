//! Command-line interface for the contribution planner.

use crate::config::PlanConfig;
use crate::report::{OutputFormat, ScheduleReport, render_line};
use crate::tracing_setup::LogFormat;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use matchplan_calculator::{
    AllocationError, MAX_PERCENTAGE, allocate, contribution, derive_lines, match_amount,
    parse_cents, percentage, summarize,
};
use matchplan_types::{PayFrequency, PaycheckLine, PaycheckSeries, Strategy};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Per-paycheck retirement contribution planner
#[derive(Parser, Debug)]
#[command(name = "matchplan")]
#[command(about = "Plan per-paycheck contributions that respect the annual limit and keep the employer match")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format written to stderr
    #[arg(long, value_enum, global = true, env = "MATCHPLAN_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Configuration file (defaults to $MATCHPLAN_CONFIG_PATH or ./matchplan.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a contribution percentage for every paycheck
    Allocate(AllocateArgs),
    /// Derive the remaining fields of a single paycheck
    Reconcile(ReconcileArgs),
    /// Describe the allocation strategies
    Explain {
        /// Only describe this strategy
        strategy: Option<Strategy>,
    },
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Eligible pay for the next paycheck, e.g. "8,333.33". Repeat in pay-period order;
    /// later periods reuse the last amount given.
    #[arg(long = "pay", value_name = "AMOUNT", required = true)]
    pub pay: Vec<String>,

    /// Number of paychecks in the plan year
    #[arg(long, conflicts_with = "frequency")]
    pub periods: Option<usize>,

    /// Pay frequency (weekly, biweekly, semimonthly, monthly, quarterly)
    #[arg(long)]
    pub frequency: Option<PayFrequency>,

    /// Annual contribution limit, e.g. "24,500"
    #[arg(long, value_name = "AMOUNT")]
    pub annual_limit: Option<String>,

    /// Employer match percentage
    #[arg(long)]
    pub match_rate: Option<i64>,

    /// Maximum percentage of any paycheck
    #[arg(long)]
    pub max_rate: Option<i64>,

    /// Allocation strategy (frontload, dca, uniform)
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Eligible pay, e.g. "8,333.33"
    #[arg(long, value_name = "AMOUNT")]
    pub pay: String,

    /// Contribution percentage
    #[arg(long, conflicts_with = "contribution", required_unless_present = "contribution")]
    pub percentage: Option<i64>,

    /// Contribution amount, e.g. "1,000"
    #[arg(long, value_name = "AMOUNT", required_unless_present = "percentage")]
    pub contribution: Option<String>,

    /// Employer match percentage
    #[arg(long)]
    pub match_rate: Option<i64>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl Cli {
    /// Runs the selected command, writing its report to `out`.
    pub fn execute(&self, config: &PlanConfig, out: &mut impl Write) -> Result<()> {
        match &self.command {
            Command::Allocate(args) => run_allocate(args, config, out),
            Command::Reconcile(args) => run_reconcile(args, config, out),
            Command::Explain { strategy } => run_explain(*strategy, out),
        }
    }
}

fn run_allocate(args: &AllocateArgs, config: &PlanConfig, out: &mut impl Write) -> Result<()> {
    let mut params = config.parameters();
    if let Some(limit) = &args.annual_limit {
        params.annual_limit_cents = parse_cents(limit);
    }
    if let Some(rate) = args.match_rate {
        params.match_rate_percent = rate;
    }
    if let Some(rate) = args.max_rate {
        params.max_rate_percent = rate;
    }
    if let Some(strategy) = args.strategy {
        params.strategy = strategy;
    }

    let periods = args
        .periods
        .or_else(|| args.frequency.map(PayFrequency::periods))
        .unwrap_or_else(|| config.plan.frequency.periods().max(args.pay.len()));

    let amounts: Vec<Option<i64>> = args.pay.iter().map(|text| Some(parse_cents(text))).collect();
    let series = PaycheckSeries::fill_forward(&amounts, periods)
        .context("could not build the paycheck series")?;
    if series.as_slice().iter().all(|&amount| amount == 0) {
        bail!("every paycheck amount is zero");
    }
    let total_cents = series
        .total_cents()
        .context("paycheck amounts add up to more than the supported range")?;
    debug!(periods, total_cents, "paycheck series assembled");

    let percentages = allocate(&params, series.as_slice())?;
    let lines = derive_lines(series.as_slice(), &percentages, params.match_rate_percent)?;
    let totals = summarize(&lines);
    info!(
        strategy = %params.strategy,
        contribution_cents = totals.contribution_cents,
        match_cents = totals.match_cents,
        "Allocation computed"
    );

    let report = ScheduleReport { parameters: params, lines, totals };
    let format = args.format.unwrap_or(config.output.format);
    write!(out, "{}", report.render(format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }
    Ok(())
}

fn run_reconcile(args: &ReconcileArgs, config: &PlanConfig, out: &mut impl Write) -> Result<()> {
    let amount_cents = parse_cents(&args.pay);
    let match_rate = checked_rate(
        "match_rate_percent",
        args.match_rate.unwrap_or(config.plan.match_rate_percent),
    )?;

    let (rate, contribution_cents) = match (args.percentage, &args.contribution) {
        (Some(rate), _) => {
            let rate = checked_rate("percentage", rate)?;
            (rate, contribution(amount_cents, rate))
        }
        (None, Some(text)) => {
            let derived = percentage(amount_cents, parse_cents(text));
            (derived.percentage, derived.contribution_cents)
        }
        (None, None) => bail!("either --percentage or --contribution is required"),
    };

    let line = PaycheckLine {
        index: 0,
        amount_cents,
        percentage: rate,
        contribution_cents,
        match_cents: match_amount(amount_cents, contribution_cents, match_rate),
    };

    let format = args.format.unwrap_or(config.output.format);
    writeln!(out, "{}", render_line(&line, format)?.trim_end())?;
    Ok(())
}

fn checked_rate(parameter: &'static str, rate: i64) -> Result<i64> {
    if !(0..=MAX_PERCENTAGE).contains(&rate) {
        return Err(AllocationError::invalid_parameter(
            parameter,
            format!("must be between 0 and {MAX_PERCENTAGE}, got {rate}"),
        )
        .into());
    }
    Ok(rate)
}

fn run_explain(strategy: Option<Strategy>, out: &mut impl Write) -> Result<()> {
    let strategies: Vec<Strategy> = match strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };

    for strategy in strategies {
        writeln!(out, "{strategy}\n    {}\n", strategy.description())?;
    }
    Ok(())
}
