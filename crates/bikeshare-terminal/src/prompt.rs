//! Interactive questions with validation and re-prompting
//!
//! [`Prompter`] is generic over its input and output so the question flow can
//! be driven from a byte buffer in tests. Invalid answers print the accepted
//! values and ask again; end of input is reported as an error instead of
//! looping.

use bikeshare_core::input::{
    CITY_CHOICES, MONTH_CHOICES, WEEKDAY_CHOICES, YES_NO_CHOICES, describe_choices,
    validate_choice,
};
use bikeshare_core::{BikeshareError, City, MonthChoice, Result, WeekdayChoice};
use console::{Term, style};
use std::io::{self, BufRead, StdinLock, Write};
use tracing::debug;

/// Asks questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Term> {
    /// Prompter on the process's terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), Term::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print a line to the prompt output
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", style(question).bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BikeshareError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer is in `allowed`; an empty answer picks `default`
    pub fn ask<T: Copy>(
        &mut self,
        question: &str,
        allowed: &[(&str, T)],
        default: Option<T>,
    ) -> Result<T> {
        loop {
            let answer = self.read_answer(question)?;
            if let (true, Some(value)) = (answer.is_empty(), default) {
                return Ok(value);
            }
            match validate_choice(&answer, allowed) {
                Ok(value) => return Ok(value),
                Err(BikeshareError::InvalidInput { input, expected }) => {
                    debug!("Rejected answer '{}'", input);
                    let message = format!("Invalid value '{input}'. Valid values are {expected}");
                    writeln!(self.output, "{}", style(message).yellow())?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn ask_city(&mut self) -> Result<City> {
        let question = format!(
            "Which city would you like to explore ({})?",
            describe_choices(CITY_CHOICES)
        );
        self.ask(&question, CITY_CHOICES, None)
    }

    pub fn ask_month(&mut self) -> Result<MonthChoice> {
        self.ask(
            "Which month? Type a month name or press Enter for all:",
            MONTH_CHOICES,
            Some(MonthChoice::All),
        )
    }

    pub fn ask_weekday(&mut self) -> Result<WeekdayChoice> {
        self.ask(
            "Which day of the week? Type a weekday name or press Enter for all:",
            WEEKDAY_CHOICES,
            Some(WeekdayChoice::All),
        )
    }

    /// Yes/no question where Enter means yes
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let question = format!("{question} [Y/n]");
        self.ask(&question, YES_NO_CHOICES, Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn transcript(p: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(p.into_parts().1).unwrap()
    }

    #[test]
    fn test_city_reprompts_until_valid() {
        let mut p = prompter("boston\n\nChicago\n");
        assert_eq!(p.ask_city().unwrap(), City::Chicago);
        let out = transcript(p);
        assert!(out.contains("Invalid value 'boston'"));
        assert!(out.contains("'new york city'"));
        assert_eq!(out.matches("Which city").count(), 3);
    }

    #[test]
    fn test_enter_defaults_to_all() {
        let mut p = prompter("\n\n");
        assert_eq!(p.ask_month().unwrap(), MonthChoice::All);
        assert_eq!(p.ask_weekday().unwrap(), WeekdayChoice::All);
    }

    #[test]
    fn test_month_is_case_insensitive() {
        let mut p = prompter("  MARCH \n");
        assert_eq!(p.ask_month().unwrap(), MonthChoice::Only(Month::March));
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("\nno\nmaybe\ny\n");
        assert!(p.confirm("Another calculation?").unwrap());
        assert!(!p.confirm("Another calculation?").unwrap());
        assert!(p.confirm("Another calculation?").unwrap());
        assert!(transcript(p).contains("Invalid value 'maybe'"));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let mut p = prompter("boston\n");
        assert!(matches!(p.ask_city(), Err(BikeshareError::Io(_))));
    }
}
