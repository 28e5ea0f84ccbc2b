//! Interactive profile setup.
//!
//! Asks for occupation, income band, monthly expenses, and location before the
//! conversation starts. Every question shows the current answer, and pressing
//! Enter keeps it.

use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::types::{IncomeBand, Occupation, UserProfile, validate_expenses};

/// A source of typed lines.
///
/// `Ok(None)` means the user ended input (Ctrl-D or Ctrl-C).
pub trait Prompter {
    /// Show `prompt` and read one line.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl Prompter for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(Error::io("failed to read input", err)),
            Err(err) => Err(Error::io("failed to read input", io::Error::other(err))),
        }
    }
}

/// Walk the user through the profile form.
///
/// Returns the submitted profile, or `None` if input ended before the form was
/// complete; `current` is left untouched in that case.
pub fn run_profile_setup(
    prompter: &mut dyn Prompter,
    renderer: &mut dyn Renderer,
    current: &UserProfile,
) -> Result<Option<UserProfile>> {
    renderer.print_info("Tell MoneyMitra about yourself. Press Enter to keep the value shown.");

    renderer.print_info("What do you do?");
    for (idx, occupation) in Occupation::ALL.iter().enumerate() {
        renderer.print_info(&menu_line(idx, occupation.label(), *occupation == current.occupation));
    }
    let Some(occupation) = ask(
        prompter,
        renderer,
        &format!("Occupation [1-{}]: ", Occupation::ALL.len()),
        current.occupation,
        parse_occupation,
    )?
    else {
        return Ok(None);
    };

    renderer.print_info("Monthly income?");
    for (idx, band) in IncomeBand::ALL.iter().enumerate() {
        renderer.print_info(&menu_line(idx, band.label(), *band == current.income));
    }
    let Some(income) = ask(
        prompter,
        renderer,
        &format!("Income [1-{}]: ", IncomeBand::ALL.len()),
        current.income,
        parse_income,
    )?
    else {
        return Ok(None);
    };

    let Some(expenses) = ask(
        prompter,
        renderer,
        &format!("Monthly expenses in ₹ [{}]: ", current.expenses),
        current.expenses.clone(),
        |input| validate_expenses(input).map_err(|e| e.to_string()),
    )?
    else {
        return Ok(None);
    };

    let Some(location) = ask(
        prompter,
        renderer,
        &format!("Location [{}]: ", current.location),
        current.location.clone(),
        |input| Ok(input.to_string()),
    )?
    else {
        return Ok(None);
    };

    UserProfile::new(occupation, income, expenses, location).map(Some)
}

fn menu_line(idx: usize, label: &str, selected: bool) -> String {
    if selected {
        format!("  {}. {label} (current)", idx + 1)
    } else {
        format!("  {}. {label}", idx + 1)
    }
}

/// Ask until the answer parses. Blank input keeps `current`.
fn ask<T, F>(
    prompter: &mut dyn Prompter,
    renderer: &mut dyn Renderer,
    prompt: &str,
    current: T,
    parse: F,
) -> Result<Option<T>>
where
    F: Fn(&str) -> std::result::Result<T, String>,
{
    loop {
        let Some(line) = prompter.read_line(prompt)? else {
            return Ok(None);
        };
        let input = line.trim();
        if input.is_empty() {
            return Ok(Some(current));
        }
        match parse(input) {
            Ok(value) => return Ok(Some(value)),
            Err(err) => renderer.print_error(&err),
        }
    }
}

fn parse_menu_choice<T: Copy>(input: &str, options: &[T]) -> Option<T> {
    let n = input.parse::<usize>().ok()?;
    options.get(n.checked_sub(1)?).copied()
}

fn parse_occupation(input: &str) -> std::result::Result<Occupation, String> {
    match parse_menu_choice(input, &Occupation::ALL) {
        Some(occupation) => Ok(occupation),
        None => input.parse::<Occupation>().map_err(|e| e.to_string()),
    }
}

fn parse_income(input: &str) -> std::result::Result<IncomeBand, String> {
    match parse_menu_choice(input, &IncomeBand::ALL) {
        Some(band) => Ok(band),
        None => input.parse::<IncomeBand>().map_err(|e| e.to_string()),
    }
}
