use crate::{is_valid_formula, try_validate, validate::ValidationError};

/// Asserts that a formula passes validation with the default digit limit.
#[track_caller]
fn valid(formula: &str) {
	assert_eq!(try_validate(formula, 8), Ok(()), "should be valid: {formula:?}");
}

/// Asserts that a formula fails validation with the default digit limit.
#[track_caller]
fn invalid(formula: &str) {
	assert!(!is_valid_formula(formula, 8), "should be invalid: {formula:?}");
}

#[test]
fn whole_formula() {
	invalid("");
	invalid(" ");
	invalid("1+2a");
	invalid("1+2_3");
	invalid("1+2?3");
	invalid("1+2.3");
	invalid("1+2,3");
	valid("1+2*3");
	valid(" 1 + 2 * 3 ");
}

#[test]
fn invalid_char_is_located() {
	assert_eq!(
		try_validate("1 + 2a", 8),
		Err(ValidationError::InvalidChar { ch: 'a', pos: 5 })
	);
}

#[test]
fn numbers_next_to_groups() {
	invalid("2(3+4)");
	invalid("(1+2)(3+4)");
	invalid("(1+2)3");
	valid("2*(3+4)");
	valid("(1+2)*(3+4)");
	assert_eq!(try_validate("2 (3)", 8), Err(ValidationError::NumberBeforeGroup { pos: 2 }));
	assert_eq!(try_validate("(3)4", 8), Err(ValidationError::NumberAfterGroup { pos: 3 }));
	assert_eq!(try_validate("(1)(2)", 8), Err(ValidationError::AdjacentGroups { pos: 3 }));
}

#[test]
fn spaces_inside_numbers_concatenate() {
	valid("1 23");
	valid("12 3");
	valid("1 2 3");
	valid("+12-21");
	valid("-123 4");
}

#[test]
fn digit_limit() {
	valid("12345678");
	invalid("123456789");
	valid("12345678+1");
	invalid("123456789+1");
	invalid("1+123456789");
	invalid("1234 56789");
	assert_eq!(
		try_validate("123456789", 8),
		Err(ValidationError::NumberTooLong { pos: 8, max: 8 })
	);
}

#[test]
fn custom_digit_limit() {
	assert!(is_valid_formula("123", 3));
	assert!(!is_valid_formula("1234", 3));
	assert!(is_valid_formula("123+456", 3));
	assert!(!is_valid_formula("1", 0));
	assert!(is_valid_formula("1234567890", 10));
}

#[test]
fn operator_placement() {
	for op in ["+", "-", "*", "/", "^"] {
		invalid(op);
		invalid(&format!("1{op}"));
	}

	valid("+1");
	valid("-1");
	invalid("*1");
	invalid("/1");
	invalid("^1");

	valid("1+2");
	valid("1-2");
	valid("1*2");
	valid("1/2");
	valid("1^2");

	invalid("1++2");
	invalid("1+*2");
	invalid("1*-2");
	invalid("1^)");
}

#[test]
fn operator_errors_are_located() {
	assert_eq!(
		try_validate("*1", 8),
		Err(ValidationError::MissingLeftOperand { op: '*', pos: 0 })
	);
	assert_eq!(
		try_validate("1 +", 8),
		Err(ValidationError::MissingRightOperand { op: '+', pos: 2 })
	);
	assert_eq!(
		try_validate("1+*2", 8),
		Err(ValidationError::MissingRightOperand { op: '+', pos: 1 })
	);
}

#[test]
fn power_placement() {
	valid("1^(2)");
	valid("(1)^2");
	valid("1^(-2)");
	valid("1^(+2)");
	valid("+1^2");
	valid("-1^2");
	invalid("(^1)");
	invalid("1^-2");
	invalid("1^+2");
	invalid("1^+");
	invalid("1^-");
}

#[test]
fn parenthesis_order() {
	invalid(")(");
	invalid("(()");
	invalid("())");
	invalid("((()))())");
	invalid("((()))(()");
	assert_eq!(try_validate("1)+(2", 8), Err(ValidationError::UnmatchedClose { pos: 1 }));
	assert_eq!(try_validate("(1+(2)", 8), Err(ValidationError::UnclosedGroup { pos: 0 }));
}

#[test]
fn empty_groups() {
	invalid("()");
	invalid("( )");
	invalid("(+)");
	invalid("(-)");
	invalid("(*)");
	invalid("(/)");
	invalid("(+ )");
	invalid("(- )");
	invalid("(* )");
	invalid("(/ )");
	invalid("1+(())");
	valid("(3)");
	valid("(+3)");
	valid("(-3)");
	assert_eq!(try_validate("( )", 8), Err(ValidationError::EmptyGroup { pos: 2 }));
}

#[test]
fn trailing_and_leading_operators_in_groups() {
	invalid("(+3-4*)");
	invalid("(-3+4/)");
	invalid("(*3-4+)");
	invalid("(/3+4-)");
}

#[test]
fn nested_groups() {
	valid("((1+2))");
	valid("((2+3)*4)");
	valid("((2+3)*(4-1))");
	valid("((((((((((1+2))))))))))");
	valid("(1)*(2)");
	valid("-(-(3))");
}
