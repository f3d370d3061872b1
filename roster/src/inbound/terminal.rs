//! Terminal adapter for the `roster` binary.
//!
//! Prompts are written to the output handle supplied by the caller (stderr in
//! the binary) so stdout stays reserved for roster output.

use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::domain::ports::DeletionConfirmation;
use crate::domain::{Employee, EmployeeField, EmployeeId, UnknownFieldError};

/// Confirmation that asks a yes/no question on a terminal.
///
/// Only `y` or `yes` (any case) confirms; anything else, including end of
/// input or an I/O failure, declines.
pub struct PromptConfirmation<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> PromptConfirmation<R, W> {
    /// Prompt on `output` and read answers from `input`.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

/// Prompt on stderr and read answers from stdin.
#[must_use]
pub fn stdin_confirmation() -> PromptConfirmation<BufReader<Stdin>, Stderr> {
    PromptConfirmation::new(BufReader::new(io::stdin()), io::stderr())
}

impl<R, W> DeletionConfirmation for PromptConfirmation<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm_removal(&self, employee_id: EmployeeId) -> bool {
        let mut guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *guard;

        let prompted = write!(output, "Are you sure to delete employee {employee_id}? [y/N] ")
            .and_then(|()| output.flush());
        if let Err(error) = prompted {
            warn!(%employee_id, error = %error, "could not write delete prompt");
            return false;
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) => false,
            Ok(_) => is_affirmative(&answer),
            Err(error) => {
                warn!(%employee_id, error = %error, "could not read delete confirmation");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Errors raised while parsing `field=value` assignments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    /// The argument had no `=`.
    #[error("expected field=value, got '{0}'")]
    MissingEquals(String),
    /// The field name is unknown.
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),
}

/// Parse a `field=value` argument.
///
/// # Examples
/// ```
/// use roster::domain::EmployeeField;
/// use roster::inbound::terminal::parse_assignment;
///
/// let (field, value) = parse_assignment("salary=55000").expect("valid assignment");
/// assert_eq!(field, EmployeeField::Salary);
/// assert_eq!(value, "55000");
/// ```
///
/// # Errors
///
/// Returns [`AssignmentError`] when the `=` is missing or the field is unknown.
pub fn parse_assignment(raw: &str) -> Result<(EmployeeField, String), AssignmentError> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| AssignmentError::MissingEquals(raw.to_owned()))?;
    Ok((field.parse()?, value.to_owned()))
}

const HEADER: [&str; 6] = ["ID", "NAME", "AGE", "SALARY", "DEPT", "MANAGER"];

/// Render employees as an aligned text table, header first.
#[must_use]
pub fn render_roster(employees: &[Employee]) -> String {
    let rows: Vec<[String; 6]> = employees.iter().map(row).collect();
    let mut widths = HEADER.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut rendered = format_line(&HEADER.map(str::to_owned), &widths);
    for cells in &rows {
        rendered.push('\n');
        rendered.push_str(&format_line(cells, &widths));
    }
    rendered
}

fn row(employee: &Employee) -> [String; 6] {
    [
        employee.employee_id.to_string(),
        employee.name.clone(),
        employee.age.to_string(),
        employee.salary.to_string(),
        employee.department_id.to_string(),
        employee
            .manager_id
            .map_or_else(|| "-".to_owned(), |manager| manager.to_string()),
    ]
}

fn format_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
mod tests {
    //! Coverage for terminal prompts and rendering.

    use super::*;
    use crate::test_support::employees::employee;
    use rstest::rstest;
    use std::io::Cursor;

    fn ask(answer: &str) -> (bool, String) {
        let confirmation = PromptConfirmation::new(Cursor::new(answer.to_owned()), Vec::new());
        let confirmed = confirmation.confirm_removal(EmployeeId::new(2));
        let (_, output) = confirmation
            .io
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (confirmed, String::from_utf8(output).expect("prompt is UTF-8"))
    }

    #[rstest]
    #[case::yes("y\n", true)]
    #[case::long_yes(" YES \n", true)]
    #[case::no("n\n", false)]
    #[case::empty("\n", false)]
    #[case::eof("", false)]
    #[case::other("sure\n", false)]
    fn only_explicit_yes_confirms(#[case] answer: &str, #[case] expected: bool) {
        let (confirmed, prompt) = ask(answer);
        assert_eq!(confirmed, expected);
        assert_eq!(prompt, "Are you sure to delete employee 2? [y/N] ");
    }

    #[rstest]
    #[case("salary=55000", EmployeeField::Salary, "55000")]
    #[case("manager_id=", EmployeeField::ManagerId, "")]
    #[case("name=Ann=Marie", EmployeeField::Name, "Ann=Marie")]
    fn parses_assignments(#[case] raw: &str, #[case] field: EmployeeField, #[case] value: &str) {
        assert_eq!(parse_assignment(raw), Ok((field, value.to_owned())));
    }

    #[rstest]
    #[case::no_equals("salary")]
    #[case::unknown_field("title=Boss")]
    fn rejects_bad_assignments(#[case] raw: &str) {
        assert!(parse_assignment(raw).is_err());
    }

    #[test]
    fn renders_aligned_table() {
        let mut managed = employee(12, "Bea");
        managed.manager_id = Some(EmployeeId::new(1));
        let rendered = render_roster(&[employee(1, "A"), managed]);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID  NAME  AGE  SALARY  DEPT  MANAGER",
                "1   A     30   50000   10    -",
                "12  Bea   30   50000   10    1",
            ]
        );
    }

    #[test]
    fn renders_header_for_empty_roster() {
        assert_eq!(render_roster(&[]), "ID  NAME  AGE  SALARY  DEPT  MANAGER");
    }
}
