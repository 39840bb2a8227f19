use std::fmt::Display;
use std::str::FromStr;

use dialoguer::theme::Theme;
use dialoguer::{Confirm, Input};

/// Coerce text typed into a numeric field.
pub fn parse_number<T: FromStr>(input: &str) -> Result<T, String> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", trimmed))
}

/// Coerce a quantum efficiency, a fraction between 0 and 1.
pub fn parse_qe(input: &str) -> Result<f64, String> {
    let value: f64 = parse_number(input)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} is outside 0..1", value));
    }
    Ok(value)
}

/// Prompt until the answer passes `parse`. With no default the field is required.
pub fn prompt_field<T, P>(
    theme: &dyn Theme,
    label: &str,
    default: Option<T>,
    parse: P,
) -> anyhow::Result<T>
where
    T: Display,
    P: Fn(&str) -> Result<T, String>,
{
    let mut input = Input::<String>::with_theme(theme).with_prompt(label);
    if let Some(value) = default {
        input = input.default(value.to_string());
    }
    let text = input
        .validate_with(|s: &String| parse(s).map(|_| ()))
        .interact_text()?;
    parse(&text).map_err(anyhow::Error::msg)
}

/// Numeric field with a prefilled default.
pub fn prompt_number<T>(theme: &dyn Theme, label: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
{
    prompt_field(theme, label, Some(default), parse_number::<T>)
}

pub fn prompt_toggle(theme: &dyn Theme, label: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(label)
        .default(default)
        .interact()?)
}
