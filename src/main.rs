use std::{
	io::{self, BufRead, IsTerminal, Write},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use formula_calc::{CalcError, Options, DEFAULT_CLAMP_MAX, DEFAULT_CLAMP_MIN, DEFAULT_MAX_NUMBER_DIGIT};
use tracing_subscriber::EnvFilter;

/// Validates and calculates arithmetic formulas made of digits, + - * / ^, parentheses and spaces
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
	/// Formula to calculate. All arguments are joined with spaces, so it can be left unquoted.
	/// When omitted, formulas are read from stdin, one per line.
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	formula: Vec<String>,

	/// Lower bound to clamp results to
	#[arg(long, default_value_t = DEFAULT_CLAMP_MIN, allow_negative_numbers = true)]
	min: f64,

	/// Upper bound to clamp results to
	#[arg(long, default_value_t = DEFAULT_CLAMP_MAX, allow_negative_numbers = true)]
	max: f64,

	/// Don't clamp results at all
	#[arg(long, conflicts_with_all = ["min", "max"])]
	unclamped: bool,

	/// Evaluate without validating first
	#[arg(long)]
	skip_validation: bool,

	/// Maximum number of consecutive digits in a single number
	#[arg(long, default_value_t = DEFAULT_MAX_NUMBER_DIGIT)]
	max_digits: u8,

	/// Only check whether the formulas are valid
	#[arg(long)]
	check: bool,

	/// Log at debug level (RUST_LOG takes precedence)
	#[arg(short, long)]
	verbose: bool,
}

impl Args {
	/// Builds the calculation options from the flags.
	fn options(&self) -> Options {
		let (min, max) = if self.unclamped {
			(f64::NEG_INFINITY, f64::INFINITY)
		} else {
			(self.min, self.max)
		};

		Options::builder()
			.clamp(min, max)
			.skip_validation(self.skip_validation)
			.max_number_digit(self.max_digits)
			.build()
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();

	let opts = args.options();
	tracing::debug!(?opts, "options");

	let mut ok = true;
	if args.formula.is_empty() {
		let stdin = io::stdin();

		// If there isn't already input being piped in, display a prompt for it
		if stdin.is_terminal() {
			print!("Enter formula: ");
			if let Err(err) = io::stdout().flush() {
				tracing::warn!(%err, "unable to flush stdout");
			}
		}

		for line in stdin.lock().lines() {
			match line {
				Ok(line) if line.trim().is_empty() => {}
				Ok(line) => ok &= run(&line, &opts, args.check),
				Err(err) => {
					eprintln!("Unable to read stdin: {err}");
					return ExitCode::FAILURE;
				}
			}
		}
	} else {
		ok = run(&args.formula.join(" "), &opts, args.check);
	}

	if ok {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

/// Checks or calculates a single formula, printing the outcome. Returns whether it succeeded.
fn run(formula: &str, opts: &Options, check_only: bool) -> bool {
	let result = if check_only {
		formula_calc::try_validate(formula, opts.max_number_digit).map_err(CalcError::from)
	} else {
		opts.try_calculate(formula).map(|val| {
			println!("{val}");
		})
	};

	match result {
		Ok(()) => {
			if check_only {
				println!("valid");
			}
			true
		}
		Err(err) => {
			report(formula, &err);
			false
		}
	}
}

/// Prints an error, pointing at the offending character of the formula when the error has a position.
fn report(formula: &str, err: &CalcError) {
	let Some(pos) = err.pos() else {
		eprintln!("Error: {err}");
		return;
	};

	let span = ("formula", pos..pos.saturating_add(1));
	let printed = Report::build(ReportKind::Error, span.clone())
		.with_message(err.to_string())
		.with_label(Label::new(span).with_message(label(err)).with_color(Color::Red))
		.finish()
		.eprint(("formula", Source::from(formula)));

	if let Err(io_err) = printed {
		tracing::warn!(%io_err, "unable to render error report");
		eprintln!("Error: {err}");
	}
}

/// Gets a short label for the character an error points at.
fn label(err: &CalcError) -> &'static str {
	use formula_calc::ValidationError as V;

	match err {
		CalcError::Invalid(V::InvalidChar { .. }) => "not allowed in a formula",
		CalcError::Invalid(V::NumberBeforeGroup { .. } | V::NumberAfterGroup { .. } | V::AdjacentGroups { .. }) => {
			"an operator is needed here"
		}
		CalcError::Invalid(V::NumberTooLong { .. }) => "too many digits",
		CalcError::Invalid(V::UnmatchedClose { .. }) | CalcError::UnmatchedClose { .. } => "never opened",
		CalcError::Invalid(V::UnclosedGroup { .. }) | CalcError::UnclosedGroup { .. } => "never closed",
		CalcError::Invalid(V::EmptyGroup { .. }) => "group has no number",
		CalcError::DivisionByZero { .. } => "divisor is zero",
		CalcError::PowerDomain { .. } => "no real result",
		_ => "here",
	}
}
