//! Functions provided by the host.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::{error::interpreter::InterpreterError, interpreter::{Interpreter, callable::NativeFunction, value::Value}};

/// Every native registered in a fresh interpreter's globals.
pub(crate) fn globals() -> Vec<NativeFunction> { vec![NativeFunction::new("clock", 0, clock)] }

/// Seconds since the Unix epoch.
fn clock(_: &mut Interpreter, _: &[Value]) -> Result<Value, InterpreterError> {
	let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).context("System clock is before the Unix epoch")?;
	Ok(Value::Num(elapsed.as_secs_f64()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clock_is_monotonic_enough() {
		let mut interpreter = Interpreter::with_output(Vec::new());
		let Value::Num(first) = clock(&mut interpreter, &[]).unwrap() else { panic!("clock returned a non-number") };
		let Value::Num(second) = clock(&mut interpreter, &[]).unwrap() else { panic!("clock returned a non-number") };
		assert!(first > 1_000_000_000.0);
		assert!(second >= first);
	}
}
