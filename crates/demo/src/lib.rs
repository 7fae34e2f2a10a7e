//! A small calculation over a stack of numbers, written to `output.txt`.

use std::ops::Index;
use std::path::Path;

use thiserror::Error;
use tracing::{error, info, info_span};

/// Default output file of [`process_data`].
pub const OUTPUT_FILE: &str = "output.txt";

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("failed to write result: {0}")]
    Io(#[from] std::io::Error),
}

/// Numbers with a length, indexed access and a single-pass iterator.
///
/// Iterating advances an internal cursor that is never rewound, so a stack
/// can be walked only once. `len` and indexing always see every element.
#[derive(Debug, Clone)]
pub struct NumberStack {
    data: Vec<i64>,
    position: usize,
}

impl NumberStack {
    pub fn new(data: Vec<i64>) -> Self {
        Self { data, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.data.get(index).copied()
    }
}

impl Index<usize> for NumberStack {
    type Output = i64;

    fn index(&self, index: usize) -> &i64 {
        &self.data[index]
    }
}

impl Iterator for NumberStack {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let value = self.data.get(self.position).copied()?;
        self.position += 1;
        Some(value)
    }
}

/// Checked addition, the default combining step.
pub fn add(a: i64, b: i64) -> Result<i64, DemoError> {
    a.checked_add(b).ok_or(DemoError::Overflow)
}

/// Checked division.
pub fn divide(a: i64, b: i64) -> Result<i64, DemoError> {
    if b == 0 {
        return Err(DemoError::DivisionByZero);
    }
    a.checked_div(b).ok_or(DemoError::Overflow)
}

/// Run `f` inside a span, logging when it starts and ends.
pub fn logged<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let span = info_span!("call", function = name);
    let _guard = span.enter();
    info!(">>> start: {name}");
    let result = f();
    info!("<<< end: {name}");
    result
}

/// Fold `values`, each scaled by `multiplier`, into `initial` with `calc`,
/// then write `Calculation Result: <value>` to `output`.
pub fn process_data<C>(
    initial: i64,
    values: impl IntoIterator<Item = i64>,
    multiplier: i64,
    calc: C,
    output: impl AsRef<Path>,
) -> Result<i64, DemoError>
where
    C: Fn(i64, i64) -> Result<i64, DemoError>,
{
    let result = accumulate(initial, values, multiplier, calc)
        .and_then(|value| {
            std::fs::write(output.as_ref(), format!("Calculation Result: {value}"))?;
            Ok(value)
        })
        .inspect_err(|e| error!("processing failed: {e}"));

    info!("processing finished");
    result
}

fn accumulate<C>(
    initial: i64,
    values: impl IntoIterator<Item = i64>,
    multiplier: i64,
    calc: C,
) -> Result<i64, DemoError>
where
    C: Fn(i64, i64) -> Result<i64, DemoError>,
{
    values
        .into_iter()
        .map(|x| x.checked_mul(multiplier).ok_or(DemoError::Overflow))
        .try_fold(initial, |acc, scaled| calc(acc, scaled?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_length_and_indexing() {
        let stack = NumberStack::new(vec![10, 20, 30]);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack[1], 20);
        assert_eq!(stack.get(3), None);
    }

    #[test]
    fn stack_iterates_once() {
        let mut stack = NumberStack::new(vec![10, 20, 30]);
        assert_eq!(stack.by_ref().collect::<Vec<_>>(), [10, 20, 30]);
        assert_eq!(stack.next(), None);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn process_data_writes_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        let stack = NumberStack::new(vec![10, 20, 30]);

        let result = logged("process_data", || process_data(100, stack, 2, add, &path)).unwrap();

        assert_eq!(result, 220);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Calculation Result: 220");
    }

    #[test]
    fn output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        std::fs::write(&path, "Calculation Result: 999999 and some stale text").unwrap();

        process_data(1, [2], 3, |a, b| Ok(a * b), &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Calculation Result: 6");
    }

    #[test]
    fn division_by_zero_is_reported_and_nothing_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);

        let err = process_data(100, [0], 1, divide, &path).unwrap_err();

        assert!(matches!(err, DemoError::DivisionByZero));
        assert!(!path.exists());
    }

    #[test]
    fn overflow_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_data(0, [i64::MAX], 2, add, dir.path().join(OUTPUT_FILE)).unwrap_err();
        assert!(matches!(err, DemoError::Overflow));
    }
}
