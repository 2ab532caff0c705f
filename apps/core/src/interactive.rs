//! Line-oriented prompt form.
//!
//! Asks for every field in turn. An empty answer keeps the shown default; an
//! invalid or out-of-range answer is reported and the question asked again. End
//! of input keeps the defaults for all remaining fields.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{Choice, UserProfile};

pub struct PromptForm<R, W> {
    input: R,
    output: W,
    eof: bool,
}

impl<R: BufRead, W: Write> PromptForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            eof: false,
        }
    }

    /// Fills a profile, starting from `defaults`.
    pub fn fill(&mut self, defaults: &UserProfile) -> Result<UserProfile, AppError> {
        writeln!(self.output, "Basic Information")?;
        let age = self.number("Age", defaults.age, 10..=100)?;
        let weight_kg = self.number("Weight (kg)", defaults.weight_kg, 30.0..=200.0)?;
        let gender = self.choice("Gender", defaults.gender)?;
        let height_cm = self.number("Height (cm)", defaults.height_cm, 100.0..=250.0)?;
        let fitness_goal = self.choice("Fitness Goal", defaults.fitness_goal)?;

        writeln!(self.output, "Health Information")?;
        let conditions = self.multi("Medical Conditions", &defaults.conditions)?;
        let severity = self.choice("Condition Severity", defaults.severity)?;
        let activity_level = self.choice("Physical Activity Level", defaults.activity_level)?;

        writeln!(self.output, "Dietary Preferences")?;
        let dietary_restrictions =
            self.multi("Dietary Restrictions", &defaults.dietary_restrictions)?;
        let allergies = self.multi("Allergies", &defaults.allergies)?;
        let preferred_cuisine = self.multi("Preferred Cuisine", &defaults.preferred_cuisine)?;

        Ok(UserProfile {
            age,
            weight_kg,
            gender,
            height_cm,
            fitness_goal,
            conditions,
            severity,
            activity_level,
            dietary_restrictions,
            allergies,
            preferred_cuisine,
        })
    }

    /// Yes/no question; end of input answers no.
    pub fn confirm(&mut self, question: &str) -> Result<bool, AppError> {
        match self.ask(&format!("{} [y/N]", question))? {
            Some(answer) => Ok(answer.to_lowercase().starts_with('y')),
            None => Ok(false),
        }
    }

    /// Reads one trimmed answer; `None` for an empty line or end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        if self.eof {
            return Ok(None);
        }
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.eof = true;
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn retry<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, AppError>,
        default: T,
    ) -> Result<T, AppError> {
        loop {
            match self.ask(prompt)? {
                None => return Ok(default),
                Some(answer) => match parse(&answer) {
                    Ok(value) => return Ok(value),
                    Err(e) => writeln!(self.output, "  {}", e)?,
                },
            }
        }
    }

    /// Numeric field limited to `range`. NaN never falls inside a range.
    fn number<T>(
        &mut self,
        label: &str,
        default: T,
        range: RangeInclusive<T>,
    ) -> Result<T, AppError>
    where
        T: FromStr + Display + PartialOrd + Copy,
    {
        let prompt = format!("{} ({}-{}) [{}]", label, range.start(), range.end(), default);
        self.retry(
            &prompt,
            |s| {
                let value = s
                    .parse::<T>()
                    .map_err(|_| AppError::Validation(format!("'{}' is not a number", s)))?;
                if range.contains(&value) {
                    Ok(value)
                } else {
                    Err(AppError::Validation(format!(
                        "{} must be between {} and {}",
                        value,
                        range.start(),
                        range.end()
                    )))
                }
            },
            default,
        )
    }

    fn choice<T: Choice>(&mut self, label: &str, default: T) -> Result<T, AppError> {
        let options: Vec<&str> = T::ALL.iter().map(|c| c.label()).collect();
        let prompt = format!("{} ({}) [{}]", label, options.join("/"), default.label());
        self.retry(&prompt, T::parse_label, default)
    }

    fn multi<T: Choice>(&mut self, label: &str, default: &[T]) -> Result<Vec<T>, AppError> {
        let options: Vec<&str> = T::ALL.iter().map(|c| c.label()).collect();
        let current: Vec<&str> = default.iter().map(|c| c.label()).collect();
        let prompt = format!(
            "{}, comma separated ({}) [{}]",
            label,
            options.join("/"),
            current.join(", ")
        );
        self.retry(
            &prompt,
            |s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(T::parse_label)
                    .collect::<Result<Vec<T>, AppError>>()
            },
            default.to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, Cuisine, FitnessGoal, Gender};
    use std::io::Cursor;

    #[test]
    fn test_empty_answers_keep_defaults() {
        let input = Cursor::new("\n".repeat(11));
        let mut form = PromptForm::new(input, Vec::new());
        let profile = form.fill(&UserProfile::default()).unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn test_answers_override_defaults() {
        let answers = "40\n82.5\nfemale\n165\ngain muscle\nDiabetes, Hypertension\n\n\n\n\nItalian,Mexican\n";
        let mut form = PromptForm::new(Cursor::new(answers), Vec::new());
        let profile = form.fill(&UserProfile::default()).unwrap();

        assert_eq!(profile.age, 40);
        assert_eq!(profile.weight_kg, 82.5);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.fitness_goal, FitnessGoal::GainMuscle);
        assert_eq!(
            profile.conditions,
            vec![Condition::Diabetes, Condition::Hypertension]
        );
        assert_eq!(profile.preferred_cuisine, vec![Cuisine::Italian, Cuisine::Mexican]);
    }

    #[test]
    fn test_invalid_answer_is_asked_again() {
        let answers = "forty\n41\n";
        let mut output = Vec::new();
        let profile = {
            let mut form = PromptForm::new(Cursor::new(answers), &mut output);
            form.fill(&UserProfile::default()).unwrap()
        };
        assert_eq!(profile.age, 41);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("'forty' is not a number"));
    }

    #[test]
    fn test_out_of_range_answer_is_asked_again() {
        let answers = "5\n101\n30\n10\nNaN\n\n";
        let mut output = Vec::new();
        let profile = {
            let mut form = PromptForm::new(Cursor::new(answers), &mut output);
            form.fill(&UserProfile::default()).unwrap()
        };
        assert_eq!(profile.age, 30);
        assert_eq!(profile.weight_kg, UserProfile::default().weight_kg);
        assert!(profile.check().is_ok());

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("5 must be between 10 and 100"));
        assert!(printed.contains("101 must be between 10 and 100"));
        assert!(printed.contains("10 must be between 30 and 200"));
        assert!(printed.contains("NaN must be between 30 and 200"));
    }

    #[test]
    fn test_confirm_defaults_to_no_at_eof() {
        let mut form = PromptForm::new(Cursor::new(""), Vec::new());
        assert!(!form.confirm("Submit again?").unwrap());
    }
}
