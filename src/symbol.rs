//! Classification of the individual characters a formula may be built from.

use core::fmt;

/// Class of a single formula character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Symbol {
	/// Decimal digit with its value (0-9)
	Digit(u8),

	/// Arithmetic operator
	Operator(Operator),

	/// Opening or closing parenthesis
	Paren(Paren),

	/// Spacing that is dropped before a formula is looked at any further
	Ignorable,
}

impl Symbol {
	/// Classifies a character, returning [`None`] for anything outside of the accepted character domain
	/// (`0123456789+-*/^() `).
	#[must_use]
	pub const fn classify(c: char) -> Option<Self> {
		Some(match c {
			'0'..='9' => Self::Digit((c as u8).wrapping_sub(b'0')),
			'+' => Self::Operator(Operator::Add),
			'-' => Self::Operator(Operator::Sub),
			'*' => Self::Operator(Operator::Mul),
			'/' => Self::Operator(Operator::Div),
			'^' => Self::Operator(Operator::Pow),
			'(' => Self::Paren(Paren::Open),
			')' => Self::Paren(Paren::Close),
			' ' => Self::Ignorable,
			_ => return None,
		})
	}

	/// Checks whether the symbol is a digit.
	#[must_use]
	#[inline]
	pub const fn is_digit(self) -> bool {
		matches!(self, Self::Digit(..))
	}

	/// Checks whether the symbol is an opening parenthesis.
	#[must_use]
	#[inline]
	pub const fn is_open(self) -> bool {
		matches!(self, Self::Paren(Paren::Open))
	}

	/// Checks whether the symbol is a closing parenthesis.
	#[must_use]
	#[inline]
	pub const fn is_close(self) -> bool {
		matches!(self, Self::Paren(Paren::Close))
	}

	/// Gets the character this symbol was classified from.
	#[must_use]
	pub const fn as_char(self) -> char {
		match self {
			#[allow(clippy::arithmetic_side_effects, reason = "digit values never exceed 9")]
			Self::Digit(d) => (b'0' + d) as char,
			Self::Operator(op) => op.as_char(),
			Self::Paren(Paren::Open) => '(',
			Self::Paren(Paren::Close) => ')',
			Self::Ignorable => ' ',
		}
	}
}

impl TryFrom<char> for Symbol {
	type Error = char;

	/// Classifies a character, handing it back as the error if it isn't part of the accepted domain.
	#[inline]
	fn try_from(c: char) -> Result<Self, Self::Error> {
		Self::classify(c).ok_or(c)
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_char())
	}
}

/// Parenthesis direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Paren {
	/// `(`
	Open,

	/// `)`
	Close,
}

/// Binary (and, for [`Operator::Add`]/[`Operator::Sub`], unary) arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Operator {
	/// Sum (`+`)
	Add,

	/// Difference (`-`)
	Sub,

	/// Product (`*`)
	Mul,

	/// Quotient (`/`)
	Div,

	/// Power (`^`)
	Pow,
}

impl Operator {
	/// Gets the binding strength of the operator. Higher binds tighter.
	#[must_use]
	pub const fn precedence(self) -> u8 {
		match self {
			Self::Add | Self::Sub => 1,
			Self::Mul | Self::Div => 2,
			Self::Pow => 3,
		}
	}

	/// Gets the direction chains of equal-precedence operators group in.
	#[must_use]
	pub const fn associativity(self) -> Associativity {
		match self {
			Self::Pow => Associativity::Right,
			Self::Add | Self::Sub | Self::Mul | Self::Div => Associativity::Left,
		}
	}

	/// Checks whether the operator may also appear as a leading sign (`+` or `-`).
	#[must_use]
	#[inline]
	pub const fn is_sign(self) -> bool {
		matches!(self, Self::Add | Self::Sub)
	}

	/// Decides whether this operator, already sitting on the operator stack, must be applied before `incoming` is
	/// pushed on top of it.
	#[must_use]
	pub const fn reduces_before(self, incoming: Self) -> bool {
		let (stacked, next) = (self.precedence(), incoming.precedence());
		stacked > next || (stacked == next && matches!(incoming.associativity(), Associativity::Left))
	}

	/// Gets the character representing the operator.
	#[must_use]
	pub const fn as_char(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::Div => '/',
			Self::Pow => '^',
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_char())
	}
}

/// Grouping direction of operators with equal precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Associativity {
	/// `a - b - c` is `(a - b) - c`
	Left,

	/// `a ^ b ^ c` is `a ^ (b ^ c)`
	Right,
}
