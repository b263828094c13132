//! Two-stack precedence-climbing evaluation of compressed formulas.
//!
//! The evaluator does not re-check the grammar. Formulas that [`validate()`](crate::validate::validate) would reject
//! either still produce a value or fail with a [`CalcError`], but never panic.

use core::iter::Peekable;

use num_traits::Float;
use smallvec::SmallVec;

use crate::{
	formula::{Formula, Symbols},
	symbol::{Operator, Paren, Symbol},
	validate::ValidationError,
};

/// Number of stack entries kept inline before spilling onto the heap
const INLINE_STACK: usize = 32;

/// Maximum distance of an exponent from its nearest integer for it to still be treated as an integer
pub const INTEGER_TOLERANCE: f64 = 1e-12;

/// Evaluates a compressed formula.
///
/// # Errors
/// Arithmetic failures (division by zero, powers without a real result) and structural problems that slipped past a
/// skipped validation (unmatched parentheses, missing operands, leftover values) are returned as [`CalcError`]s.
pub fn evaluate(formula: &Formula<'_>) -> Result<f64, CalcError> {
	Evaluator::new().run(Tokens::new(formula).peekable())
}

/// Single element of a scanned formula
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::exhaustive_enums)]
pub enum Token {
	/// Unsigned integer literal built from a run of consecutive digits
	Num(f64),

	/// Operator (binary, or a sign when in a unary position)
	Op(Operator),

	/// `(`
	Open,

	/// `)`
	Close,
}

/// Scanner turning compressed characters into [`Token`]s, each paired with the position of its first character
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
	/// Classified compressed characters
	symbols: Peekable<Symbols<'a>>,
}

impl<'a> Tokens<'a> {
	/// Creates a token scanner over a formula.
	#[must_use]
	pub fn new(formula: &Formula<'a>) -> Self {
		Self {
			symbols: formula.symbols().peekable(),
		}
	}
}

impl Iterator for Tokens<'_> {
	type Item = Result<(usize, Token), ValidationError>;

	fn next(&mut self) -> Option<Self::Item> {
		let (pos, sym) = match self.symbols.next()? {
			Ok(item) => item,
			Err(err) => return Some(Err(err)),
		};

		let token = match sym {
			Symbol::Digit(d) => {
				// Concatenate the whole digit run, most significant digit first
				let mut val = f64::from(d);
				while let Some(&Ok((_, Symbol::Digit(next)))) = self.symbols.peek() {
					val = val * 10.0 + f64::from(next);
					self.symbols.next();
				}
				Token::Num(val)
			}
			Symbol::Operator(op) => Token::Op(op),
			Symbol::Paren(Paren::Open) => Token::Open,
			Symbol::Paren(Paren::Close) => Token::Close,
			Symbol::Ignorable => return self.next(),
		};

		Some(Ok((pos, token)))
	}
}

/// Entry of the operator stack
#[derive(Debug, Clone, Copy)]
enum Pending {
	/// Barrier left by `(`
	Group(usize),

	/// Binary operator waiting for its right operand, with its position
	Binary(Operator, usize),
}

/// Value and operator stacks of a single evaluation
#[derive(Debug)]
struct Evaluator {
	/// Operands and intermediate results
	values: SmallVec<[f64; INLINE_STACK]>,

	/// Operators and group barriers not yet applied
	ops: SmallVec<[Pending; INLINE_STACK]>,
}

impl Evaluator {
	/// Creates empty stacks. They only spill onto the heap once more than [`INLINE_STACK`] entries are pending.
	fn new() -> Self {
		Self {
			values: SmallVec::new(),
			ops: SmallVec::new(),
		}
	}

	/// Runs the scan to completion and extracts the single remaining value.
	fn run(mut self, mut tokens: Peekable<Tokens<'_>>) -> Result<f64, CalcError> {
		// A sign is unary at the very start and right after `(`
		let mut unary_allowed = true;

		while let Some(item) = tokens.next() {
			let (pos, token) = item?;

			match token {
				Token::Num(val) => self.values.push(val),
				Token::Open => self.ops.push(Pending::Group(pos)),
				Token::Close => self.close_group(pos)?,
				Token::Op(op) if op.is_sign() && unary_allowed => self.sign(op, pos, &mut tokens)?,
				Token::Op(op) => {
					self.reduce_while(|stacked| stacked.reduces_before(op))?;
					self.ops.push(Pending::Binary(op, pos));
				}
			}

			unary_allowed = matches!(token, Token::Open);
		}

		while let Some(pending) = self.ops.pop() {
			match pending {
				Pending::Group(pos) => return Err(CalcError::UnclosedGroup { pos }),
				Pending::Binary(op, pos) => self.apply(op, pos)?,
			}
		}

		match self.values.as_slice() {
			&[result] => Ok(result),
			values => Err(CalcError::Residual(values.len())),
		}
	}

	/// Handles a leading `+`/`-`. Before `(`, or before a literal that is the base of a power, the sign becomes a
	/// multiplication by ±1 so that it applies to the whole group/power. Otherwise it is folded into the literal.
	fn sign(&mut self, op: Operator, pos: usize, tokens: &mut Peekable<Tokens<'_>>) -> Result<(), CalcError> {
		let sign = if op == Operator::Sub { -1.0 } else { 1.0 };

		match tokens.peek() {
			Some(Ok((_, Token::Open))) => {
				self.values.push(sign);
				self.ops.push(Pending::Binary(Operator::Mul, pos));
			}
			Some(&Ok((_, Token::Num(val)))) => {
				tokens.next();
				if matches!(tokens.peek(), Some(Ok((_, Token::Op(Operator::Pow))))) {
					self.values.push(sign);
					self.ops.push(Pending::Binary(Operator::Mul, pos));
					self.values.push(val);
				} else {
					self.values.push(sign * val);
				}
			}
			Some(Err(err)) => return Err((*err).into()),
			Some(Ok(..)) | None => {
				return Err(CalcError::MissingOperand {
					op: op.as_char(),
					pos,
				});
			}
		}

		Ok(())
	}

	/// Applies every operator back to the innermost `(`, then removes that barrier.
	fn close_group(&mut self, pos: usize) -> Result<(), CalcError> {
		self.reduce_while(|_| true)?;
		match self.ops.pop() {
			Some(Pending::Group(..)) => Ok(()),
			Some(Pending::Binary(..)) | None => Err(CalcError::UnmatchedClose { pos }),
		}
	}

	/// Applies stacked operators for as long as the top one satisfies `cond`, stopping at any group barrier.
	fn reduce_while(&mut self, cond: impl Fn(Operator) -> bool) -> Result<(), CalcError> {
		while let Some(&Pending::Binary(op, pos)) = self.ops.last() {
			if !cond(op) {
				break;
			}

			self.ops.pop();
			self.apply(op, pos)?;
		}

		Ok(())
	}

	/// Pops two operands, applies the operator to them and pushes the result.
	fn apply(&mut self, op: Operator, pos: usize) -> Result<(), CalcError> {
		let missing = || CalcError::MissingOperand { op: op.as_char(), pos };
		let b = self.values.pop().ok_or_else(missing)?;
		let a = self.values.pop().ok_or_else(missing)?;
		self.values.push(binary(op, a, b, pos)?);
		Ok(())
	}
}

/// Calculates `a op b`.
///
/// # Errors
/// Division by zero and powers without a real result fail.
pub fn binary(op: Operator, a: f64, b: f64, pos: usize) -> Result<f64, CalcError> {
	match op {
		Operator::Add => Ok(a + b),
		Operator::Sub => Ok(a - b),
		Operator::Mul => Ok(a * b),
		Operator::Div => {
			if b == 0.0 {
				Err(CalcError::DivisionByZero { pos })
			} else {
				Ok(a / b)
			}
		}
		Operator::Pow => power(a, b).ok_or(CalcError::PowerDomain { base: a, exp: b, pos }),
	}
}

/// Raises `base` to `exp` within the real numbers, returning [`None`] if the result is undefined there.
///
/// - a zero base only accepts positive exponents (`0^0` and `0^-n` are undefined)
/// - integer exponents (within [`INTEGER_TOLERANCE`]) use exponentiation by squaring, negative ones the reciprocal
/// - fractional exponents of negative bases are undefined
#[must_use]
pub fn power(base: f64, exp: f64) -> Option<f64> {
	if base == 0.0 {
		return (exp > 0.0).then_some(0.0);
	}

	let rounded = Float::round(exp);
	if Float::abs(exp - rounded) <= INTEGER_TOLERANCE {
		#[allow(
			clippy::cast_possible_truncation,
			clippy::cast_sign_loss,
			reason = "float to int casts saturate, and any exponent that large over/underflows anyway"
		)]
		let magnitude = Float::abs(rounded) as u64;
		let result = powi_by_squaring(base, magnitude);
		return Some(if rounded < 0.0 { 1.0 / result } else { result });
	}

	if base < 0.0 {
		return None;
	}

	Some(Float::powf(base, exp))
}

/// Computes `base^exp` for a non-negative integer exponent by repeated squaring.
fn powi_by_squaring(mut base: f64, mut exp: u64) -> f64 {
	let mut result = 1.0;
	while exp > 0 {
		if exp & 1 == 1 {
			result *= base;
		}
		exp >>= 1;
		if exp > 0 {
			base *= base;
		}
	}
	result
}

/// Error that can occur during [`evaluate()`] or a full calculation
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum CalcError {
	/// Formula failed validation
	#[error(transparent)]
	Invalid(#[from] ValidationError),

	/// Division by an operand that is exactly zero
	#[error("division by zero at {pos}")]
	DivisionByZero {
		/// Position of the `/`
		pos: usize,
	},

	/// Power without a real result (`0^0`, zero to a negative power, or a negative base to a fractional power)
	#[error("{base}^{exp} at {pos} has no real result")]
	PowerDomain {
		/// Base of the power
		base: f64,
		/// Exponent of the power
		exp: f64,
		/// Position of the `^`
		pos: usize,
	},

	/// Operator that didn't have two operands to work with
	#[error("operator '{op}' at {pos} is missing an operand")]
	MissingOperand {
		/// Operator character
		op: char,
		/// Position of the operator
		pos: usize,
	},

	/// `)` without a matching `(`
	#[error("unmatched closing parenthesis at {pos}")]
	UnmatchedClose {
		/// Position of the `)`
		pos: usize,
	},

	/// `(` that is never closed
	#[error("unclosed parenthesis at {pos}")]
	UnclosedGroup {
		/// Position of the `(`
		pos: usize,
	},

	/// Evaluation ended with something other than a single value
	#[error("evaluation left {0} values instead of one")]
	Residual(usize),

	/// Clamping bounds that don't describe a range
	#[error("invalid clamp range [{min}, {max}]")]
	ClampRange {
		/// Lower bound
		min: f64,
		/// Upper bound
		max: f64,
	},
}

impl CalcError {
	/// Gets the character position in the raw text the error points at, if there is one.
	#[must_use]
	pub const fn pos(&self) -> Option<usize> {
		match self {
			Self::Invalid(err) => err.pos(),
			Self::DivisionByZero { pos }
			| Self::PowerDomain { pos, .. }
			| Self::MissingOperand { pos, .. }
			| Self::UnmatchedClose { pos }
			| Self::UnclosedGroup { pos } => Some(*pos),
			Self::Residual(..) | Self::ClampRange { .. } => None,
		}
	}
}
