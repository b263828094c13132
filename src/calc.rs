//! The public entry points tying compression, validation, evaluation and clamping together.

use crate::{
	eval::{evaluate, CalcError},
	formula::Formula,
	validate::{validate, ValidationError},
};

/// Default lower clamping bound (`i16::MIN`)
pub const DEFAULT_CLAMP_MIN: f64 = -32768.0;

/// Default upper clamping bound (`i16::MAX`)
pub const DEFAULT_CLAMP_MAX: f64 = 32767.0;

/// Default maximum number of consecutive digits in a single number
pub const DEFAULT_MAX_NUMBER_DIGIT: u8 = 8;

/// Checks whether a formula is syntactically valid.
///
/// `max_number_digit` limits how many consecutive digits may be concatenated into a single number
/// ([`DEFAULT_MAX_NUMBER_DIGIT`] is the conventional choice).
///
/// # Examples
/// ```
/// use formula_calc::is_valid_formula;
///
/// assert!(is_valid_formula("1 + 2 * (3 - 4)", 8));
/// assert!(!is_valid_formula("2(3+4)", 8));
/// assert!(!is_valid_formula("123456789", 8));
/// ```
#[must_use]
pub fn is_valid_formula(text: &str, max_number_digit: u8) -> bool {
	try_validate(text, max_number_digit).is_ok()
}

/// Calculates the result of a formula, clamped into `[clamp_min, clamp_max]`.
///
/// Returns NaN when the formula is invalid (unless `skip_validation` is set), when the calculation fails (division by
/// zero, a power without a real result), or when the clamping bounds don't form a range. NaN results are never clamped.
///
/// # Examples
/// ```
/// use formula_calc::{calculate, DEFAULT_CLAMP_MAX, DEFAULT_CLAMP_MIN};
///
/// assert_eq!(calculate("(1+2)*3", DEFAULT_CLAMP_MIN, DEFAULT_CLAMP_MAX, false, 8), 9.0);
/// assert_eq!(calculate("2^3^2", 0.0, 100.0, false, 8), 100.0);
/// assert!(calculate("1/(2-2)", DEFAULT_CLAMP_MIN, DEFAULT_CLAMP_MAX, false, 8).is_nan());
/// ```
#[must_use]
pub fn calculate(text: &str, clamp_min: f64, clamp_max: f64, skip_validation: bool, max_number_digit: u8) -> f64 {
	Options::builder()
		.clamp(clamp_min, clamp_max)
		.skip_validation(skip_validation)
		.max_number_digit(max_number_digit)
		.build()
		.calculate(text)
}

/// Validates a formula, reporting why it is invalid.
///
/// # Errors
/// The first rule the formula breaks is returned.
pub fn try_validate(text: &str, max_number_digit: u8) -> Result<(), ValidationError> {
	let result = Formula::new(text).and_then(|formula| validate(&formula, max_number_digit));
	if let Err(err) = &result {
		tracing::trace!(formula = text, error = %err, "rejected formula");
	}
	result
}

/// Settings for calculating formulas
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Options {
	/// Lower bound results are clamped to
	pub clamp_min: f64,

	/// Upper bound results are clamped to
	pub clamp_max: f64,

	/// Whether to evaluate without validating first. Malformed formulas may then produce a meaningless value rather
	/// than NaN.
	pub skip_validation: bool,

	/// Maximum number of consecutive digits in a single number (only checked during validation)
	pub max_number_digit: u8,
}

impl Options {
	/// Creates options with the default settings, but without any clamping.
	#[must_use]
	pub const fn unclamped() -> Self {
		Self::builder().clamp(f64::NEG_INFINITY, f64::INFINITY).build()
	}

	/// Creates a new options builder starting from the defaults.
	#[must_use]
	#[inline]
	pub const fn builder() -> Builder {
		Builder(Self::DEFAULT)
	}

	/// Default settings: clamping to the `i16` range, validation enabled, and up to 8 digits per number
	pub const DEFAULT: Self = Self {
		clamp_min: DEFAULT_CLAMP_MIN,
		clamp_max: DEFAULT_CLAMP_MAX,
		skip_validation: false,
		max_number_digit: DEFAULT_MAX_NUMBER_DIGIT,
	};

	/// Calculates the result of a formula, collapsing any failure into NaN. See [`calculate()`].
	#[must_use]
	pub fn calculate(&self, text: &str) -> f64 {
		self.try_calculate(text).unwrap_or(f64::NAN)
	}

	/// Calculates the result of a formula and clamps it.
	///
	/// # Errors
	/// If the formula is invalid (and validation isn't skipped), the calculation fails, or the clamping bounds are
	/// unusable, an error variant describing the first problem is returned.
	pub fn try_calculate(&self, text: &str) -> Result<f64, CalcError> {
		let result = self.calculate_unclamped(text).and_then(|val| self.clamp(val));
		if let Err(err) = &result {
			tracing::trace!(formula = text, error = %err, "calculation failed");
		}
		result
	}

	/// Runs everything up to (but not including) clamping.
	fn calculate_unclamped(&self, text: &str) -> Result<f64, CalcError> {
		let formula = Formula::new(text)?;
		if !self.skip_validation {
			validate(&formula, self.max_number_digit)?;
		}
		evaluate(&formula)
	}

	/// Clamps a value into the configured range.
	///
	/// # Errors
	/// If either bound is NaN or the lower bound exceeds the upper one, [`CalcError::ClampRange`] is returned.
	pub fn clamp(&self, val: f64) -> Result<f64, CalcError> {
		let (min, max) = (self.clamp_min, self.clamp_max);
		if min.is_nan() || max.is_nan() || min > max {
			return Err(CalcError::ClampRange { min, max });
		}

		Ok(if val.is_nan() { val } else { val.clamp(min, max) })
	}
}

impl Default for Options {
	/// Creates the default options (see [`Options::DEFAULT`]).
	#[inline]
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Builds [`Options`] starting from the defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Builder(Options);

impl Builder {
	/// Sets both clamping bounds.
	#[must_use]
	pub const fn clamp(mut self, min: f64, max: f64) -> Self {
		self.0.clamp_min = min;
		self.0.clamp_max = max;
		self
	}

	/// Sets whether validation is skipped.
	#[must_use]
	pub const fn skip_validation(mut self, skip: bool) -> Self {
		self.0.skip_validation = skip;
		self
	}

	/// Sets the maximum number of consecutive digits in a single number.
	#[must_use]
	pub const fn max_number_digit(mut self, max: u8) -> Self {
		self.0.max_number_digit = max;
		self
	}

	/// Finalizes the options.
	#[must_use]
	pub const fn build(self) -> Options {
		self.0
	}
}

impl Default for Builder {
	#[inline]
	fn default() -> Self {
		Options::builder()
	}
}
