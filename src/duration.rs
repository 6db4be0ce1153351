/// Best-effort parsing of free-form experience durations ("5+ years",
/// "3-5 yrs") into a number of years.
///
/// Never fails: anything unparseable is 0.0.

use regex::Regex;

/// Years expressed by `text`, or 0.0 when no figure can be read.
pub fn parse_years(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    parse_years_inner(text).unwrap_or(0.0)
}

fn parse_years_inner(text: &str) -> Option<f64> {
    let text = text.to_lowercase().replace("yrs", "years").replace("yr", "year");
    let number = Regex::new(r"\d+\.?\d*").ok()?;

    if text.contains('-') {
        // A range needs exactly two figures
        let figures: Vec<f64> = number
            .find_iter(&text)
            .map(|m| m.as_str().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        return match figures.as_slice() {
            [low, high] => Some((low + high) / 2.0),
            _ => None,
        };
    }

    let with_unit = Regex::new(r"(\d+\.?\d*)\s*(?:\+|years?)").ok()?;
    let caps = with_unit.captures(&text)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}
