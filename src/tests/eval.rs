use super::assert_close;
use crate::{
	eval::{binary, evaluate, power, CalcError, Token, Tokens},
	formula::Formula,
	symbol::Operator,
	validate::ValidationError,
};

/// Evaluates a formula without validating or clamping it.
fn eval(text: &str) -> Result<f64, CalcError> {
	evaluate(&Formula::new(text).unwrap())
}

#[test]
fn tokens_concatenate_digits() {
	let formula = Formula::new("12 3+(45)").unwrap();
	let tokens = Tokens::new(&formula).map(Result::unwrap).collect::<Vec<_>>();
	assert_eq!(
		tokens,
		vec![
			(0, Token::Num(123.0)),
			(4, Token::Op(Operator::Add)),
			(5, Token::Open),
			(6, Token::Num(45.0)),
			(8, Token::Close),
		]
	);
}

#[test]
fn tokens_stop_at_invalid_chars() {
	let formula = Formula::new("1+x").unwrap();
	let mut tokens = Tokens::new(&formula);
	assert_eq!(tokens.next(), Some(Ok((0, Token::Num(1.0)))));
	assert_eq!(tokens.next(), Some(Ok((1, Token::Op(Operator::Add)))));
	assert_eq!(
		tokens.next(),
		Some(Err(ValidationError::InvalidChar { ch: 'x', pos: 2 }))
	);
}

#[test]
fn precedence() {
	assert_close(eval("1+2*3").unwrap(), 7.0);
	assert_close(eval("(1+2)*3").unwrap(), 9.0);
	assert_close(eval("1+2* 3-4/5").unwrap(), 6.2);
	assert_close(eval("1+2*3-4/5+(6-7*8+9)/10").unwrap(), 2.1);
	assert_close(eval("10-4-3").unwrap(), 3.0);
	assert_close(eval("64/4/2").unwrap(), 8.0);
}

#[test]
fn signs() {
	assert_close(eval("-1").unwrap(), -1.0);
	assert_close(eval("+12-21").unwrap(), -9.0);
	assert_close(eval("( +(  1+2) *3-4) /5").unwrap(), 1.0);
	assert_close(eval("-(2+3)*2").unwrap(), -10.0);
	assert_close(eval("2*(-3)").unwrap(), -6.0);
	assert_close(eval("-(-(3))").unwrap(), 3.0);
	assert_close(eval("-9999*9999*9999").unwrap(), -9999.0 * 9999.0 * 9999.0);
}

#[test]
fn power_associativity() {
	assert_close(eval("2^3").unwrap(), 8.0);
	assert_close(eval("2^3^2").unwrap(), 512.0);
	assert_close(eval("(2^3)^2").unwrap(), 64.0);
	assert_close(eval("2^(3^2)").unwrap(), 512.0);
	assert_close(eval("2*3^2").unwrap(), 18.0);
	assert_close(eval("2^3*2").unwrap(), 16.0);
}

#[test]
fn sign_binds_looser_than_power() {
	assert_close(eval("-2^2").unwrap(), -4.0);
	assert_close(eval("(-2)^2").unwrap(), 4.0);
	assert_close(eval("-2^3^2").unwrap(), -512.0);
	assert_close(eval("+1^2").unwrap(), 1.0);
	assert_close(eval("1-(-2^2)").unwrap(), 5.0);
	assert_close(eval("-(2)^2").unwrap(), -4.0);
}

#[test]
fn powers() {
	assert_close(eval("3^(-2)").unwrap(), 1.0 / 9.0);
	assert_close(eval("0^1").unwrap(), 0.0);
	assert_close(eval("0^2").unwrap(), 0.0);
	assert_close(eval("4^(1/2)").unwrap(), 2.0);
	assert_close(eval("4^( 1 / 2 )").unwrap(), 2.0);
	assert_close(eval("2^(3/10)").unwrap(), 2.0_f64.powf(0.3));
	assert_close(eval("(73/23)^(11/3)").unwrap(), (73.0_f64 / 23.0).powf(11.0 / 3.0));
	assert_close(eval("(-2)^3").unwrap(), -8.0);
	assert_close(eval("(-2)^(-1)").unwrap(), -0.5);
	assert_close(eval("(-8)^(6/3)").unwrap(), 64.0);
}

#[test]
fn undefined_powers() {
	for formula in ["0^0", "(0)^0", "0^(0)", "(3-3)^0", "(4-2*2)^(3-3)", "0^(-1)", "(0)^(1-2)", "(-8)^(1/3)"] {
		assert!(
			matches!(eval(formula), Err(CalcError::PowerDomain { .. })),
			"{formula} should have no real result"
		);
	}
}

#[test]
fn division_by_zero() {
	assert_eq!(eval("1/0"), Err(CalcError::DivisionByZero { pos: 1 }));
	assert_eq!(eval("1/(2-2)"), Err(CalcError::DivisionByZero { pos: 1 }));
	assert!(matches!(eval("1+2*3-4/5+(6-7*8+9)/0"), Err(CalcError::DivisionByZero { .. })));
	assert!(matches!(eval("1/(0^1)"), Err(CalcError::DivisionByZero { .. })));
	assert!(matches!(eval("1/(0^0)"), Err(CalcError::PowerDomain { .. })));
}

#[test]
fn deep_groups() {
	assert_close(eval("((((((((((1+2))))))))))").unwrap(), 3.0);
	assert_close(eval("((((((((((1+2)*3-4/5+(6-7*8+9)/10)))))))))").unwrap(), 4.1);

	let deep = format!("{}7{}", "(".repeat(200), ")".repeat(200));
	assert_close(eval(&deep).unwrap(), 7.0);
}

#[test]
fn malformed_formulas_fail_without_panicking() {
	assert_eq!(eval("(1"), Err(CalcError::UnclosedGroup { pos: 0 }));
	assert_eq!(eval("1)"), Err(CalcError::UnmatchedClose { pos: 1 }));
	assert_eq!(eval("()"), Err(CalcError::Residual(0)));
	assert_eq!(eval("(1)(2)"), Err(CalcError::Residual(2)));
	assert_eq!(eval("-"), Err(CalcError::MissingOperand { op: '-', pos: 0 }));
	assert_eq!(eval("*2"), Err(CalcError::MissingOperand { op: '*', pos: 0 }));
	assert_eq!(eval("1+"), Err(CalcError::MissingOperand { op: '+', pos: 1 }));
	assert!(eval("1++2").is_err());
	assert!(eval("1**2").is_err());
}

#[test]
fn juxtaposition_is_not_multiplication() {
	// Only caught by validation; the evaluator treats each group as a separate value
	assert!(eval("2(3)").is_err());
}

#[test]
fn binary_operators() {
	assert_eq!(binary(Operator::Add, 2.0, 3.0, 0), Ok(5.0));
	assert_eq!(binary(Operator::Sub, 2.0, 3.0, 0), Ok(-1.0));
	assert_eq!(binary(Operator::Mul, 2.0, 3.0, 0), Ok(6.0));
	assert_eq!(binary(Operator::Div, 3.0, 2.0, 0), Ok(1.5));
	assert_eq!(binary(Operator::Div, 3.0, 0.0, 7), Err(CalcError::DivisionByZero { pos: 7 }));
	assert_eq!(binary(Operator::Div, 3.0, -0.0, 7), Err(CalcError::DivisionByZero { pos: 7 }));
	assert_eq!(binary(Operator::Pow, 2.0, 10.0, 0), Ok(1024.0));
}

#[test]
fn power_function() {
	assert_eq!(power(0.0, 3.0), Some(0.0));
	assert_eq!(power(0.0, 0.0), None);
	assert_eq!(power(0.0, -2.0), None);
	assert_eq!(power(5.0, 0.0), Some(1.0));
	assert_eq!(power(2.0, -2.0), Some(0.25));
	assert_eq!(power(-3.0, 3.0), Some(-27.0));
	assert_eq!(power(-3.0, 2.0 + 1e-13), Some(9.0));
	assert_eq!(power(-3.0, 0.5), None);
	assert_eq!(power(10.0, 400.0), Some(f64::INFINITY));
	assert_close(power(9.0, 0.5).unwrap(), 3.0);
}
