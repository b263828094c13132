//! Grammar checking of compressed formulas in a single left-to-right pass.

use smallvec::SmallVec;

use crate::{
	formula::Formula,
	symbol::{Paren, Symbol},
};

/// Number of nesting levels tracked without spilling onto the heap
const INLINE_DEPTH: usize = 32;

/// Checks a compressed formula against every grammar rule, stopping at the first violation.
///
/// The rules, all evaluated on the compressed characters:
/// - every character is a digit, an operator, or a parenthesis
/// - a digit is never directly followed by `(`, and `)` is never directly followed by a digit or `(`
/// - no run of consecutive digits is longer than `max_number_digit`
/// - `+` and `-` are preceded by nothing, a digit, `(` or `)`; `*`, `/` and `^` are preceded by a digit or `)`
/// - every operator is followed by a digit or `(`
/// - parentheses are balanced, never closed before being opened, and every group contains at least one digit
///
/// # Errors
/// The first rule violation found is returned as the matching [`ValidationError`] variant.
pub fn validate(formula: &Formula<'_>, max_number_digit: u8) -> Result<(), ValidationError> {
	let mut scan = Scan::new(max_number_digit);
	for item in formula.symbols() {
		let (pos, sym) = item?;
		scan.step(pos, sym)?;
	}
	scan.finish()
}

/// State carried through a validation pass
#[derive(Debug)]
struct Scan {
	/// Previous compressed symbol and its position
	prev: Option<(usize, Symbol)>,

	/// Length of the digit run currently being read
	run: usize,

	/// Digit limit for a single run
	max_run: u8,

	/// One flag per open group: whether a digit has been seen inside of it (or any group nested within it)
	groups: SmallVec<[(usize, bool); INLINE_DEPTH]>,
}

impl Scan {
	/// Creates the scan state. The group stack only spills onto the heap when nesting exceeds [`INLINE_DEPTH`].
	fn new(max_run: u8) -> Self {
		Self {
			prev: None,
			run: 0,
			max_run,
			groups: SmallVec::new(),
		}
	}

	/// Feeds the next compressed symbol into the scan.
	fn step(&mut self, pos: usize, sym: Symbol) -> Result<(), ValidationError> {
		let prev = self.prev.map(|(_, prev)| prev);

		// Whatever follows an operator must start an operand
		if let Some((op_pos, Symbol::Operator(op))) = self.prev {
			if !(sym.is_digit() || sym.is_open()) {
				return Err(ValidationError::MissingRightOperand {
					op: op.as_char(),
					pos: op_pos,
				});
			}
		}

		match sym {
			Symbol::Digit(..) => {
				if prev.is_some_and(Symbol::is_close) {
					return Err(ValidationError::NumberAfterGroup { pos });
				}

				self.run = self.run.saturating_add(1);
				if self.run > usize::from(self.max_run) {
					return Err(ValidationError::NumberTooLong { pos, max: self.max_run });
				}

				if let Some((_, has_digit)) = self.groups.last_mut() {
					*has_digit = true;
				}
			}

			Symbol::Operator(op) => {
				let left_ok = match prev {
					None => op.is_sign(),
					Some(Symbol::Digit(..) | Symbol::Paren(Paren::Close)) => true,
					Some(Symbol::Paren(Paren::Open)) => op.is_sign(),
					Some(Symbol::Operator(..) | Symbol::Ignorable) => false,
				};
				if !left_ok {
					return Err(ValidationError::MissingLeftOperand { op: op.as_char(), pos });
				}
			}

			Symbol::Paren(Paren::Open) => {
				match prev {
					Some(Symbol::Digit(..)) => return Err(ValidationError::NumberBeforeGroup { pos }),
					Some(Symbol::Paren(Paren::Close)) => return Err(ValidationError::AdjacentGroups { pos }),
					_ => {}
				}
				self.groups.push((pos, false));
			}

			Symbol::Paren(Paren::Close) => {
				let (_, has_digit) = self.groups.pop().ok_or(ValidationError::UnmatchedClose { pos })?;
				if !has_digit {
					return Err(ValidationError::EmptyGroup { pos });
				}

				// Digits of a nested group count for its parent as well
				if let Some((_, parent_has_digit)) = self.groups.last_mut() {
					*parent_has_digit = true;
				}
			}

			// Formula::symbols() never yields spacing
			Symbol::Ignorable => return Ok(()),
		}

		if !sym.is_digit() {
			self.run = 0;
		}
		self.prev = Some((pos, sym));
		Ok(())
	}

	/// Completes the scan once every symbol has been fed in.
	fn finish(self) -> Result<(), ValidationError> {
		match self.prev {
			None => return Err(ValidationError::Empty),
			Some((pos, Symbol::Operator(op))) => {
				return Err(ValidationError::MissingRightOperand { op: op.as_char(), pos });
			}
			Some(..) => {}
		}

		match self.groups.last() {
			Some(&(pos, _)) => Err(ValidationError::UnclosedGroup { pos }),
			None => Ok(()),
		}
	}
}

/// Reason a formula is not well-formed. Positions are character indices into the raw (uncompressed) text.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
	/// Nothing but spacing (or nothing at all)
	#[error("formula is empty")]
	Empty,

	/// Character outside of `0123456789+-*/^() `
	#[error("invalid character {ch:?} at {pos}")]
	InvalidChar {
		/// Offending character
		ch: char,
		/// Position of the character
		pos: usize,
	},

	/// Number directly followed by `(`
	#[error("number directly followed by a parenthesized group at {pos} (missing operator)")]
	NumberBeforeGroup {
		/// Position of the `(`
		pos: usize,
	},

	/// `)` directly followed by a number
	#[error("parenthesized group directly followed by a number at {pos} (missing operator)")]
	NumberAfterGroup {
		/// Position of the digit
		pos: usize,
	},

	/// `)` directly followed by `(`
	#[error("two parenthesized groups without an operator between them at {pos}")]
	AdjacentGroups {
		/// Position of the `(`
		pos: usize,
	},

	/// Run of digits longer than the configured limit
	#[error("number exceeds {max} digits at {pos}")]
	NumberTooLong {
		/// Position of the first digit past the limit
		pos: usize,
		/// Configured digit limit
		max: u8,
	},

	/// Operator without a valid left-hand side
	#[error("operator '{op}' at {pos} is missing its left operand")]
	MissingLeftOperand {
		/// Operator character
		op: char,
		/// Position of the operator
		pos: usize,
	},

	/// Operator not followed by a number or `(`
	#[error("operator '{op}' at {pos} is missing its right operand")]
	MissingRightOperand {
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

	/// Parenthesized group with no digit anywhere inside of it
	#[error("parenthesized group ending at {pos} contains no number")]
	EmptyGroup {
		/// Position of the `)`
		pos: usize,
	},
}

impl ValidationError {
	/// Gets the character position in the raw text the error points at, if there is one.
	#[must_use]
	pub const fn pos(&self) -> Option<usize> {
		match *self {
			Self::Empty => None,
			Self::InvalidChar { pos, .. }
			| Self::NumberBeforeGroup { pos }
			| Self::NumberAfterGroup { pos }
			| Self::AdjacentGroups { pos }
			| Self::NumberTooLong { pos, .. }
			| Self::MissingLeftOperand { pos, .. }
			| Self::MissingRightOperand { pos, .. }
			| Self::UnmatchedClose { pos }
			| Self::UnclosedGroup { pos }
			| Self::EmptyGroup { pos } => Some(pos),
		}
	}
}
