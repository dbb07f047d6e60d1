//! Chart titles, axis labels and output file names.
//!
//! File names are derived from the title, so two runs with the same metric pair
//! and suffix overwrite each other's PNG.

use crate::domain::ChartSpec;

const TIME_AXIS_LABEL: &str = "time since first infection (days)";

/// Human-facing text for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
}

impl ChartLabels {
    pub fn for_spec(spec: &ChartSpec) -> Self {
        let x = if spec.is_time_axis() {
            title_case(TIME_AXIS_LABEL)
        } else {
            field_label(&spec.x_field)
        };
        let y = field_label(&spec.y_field);
        let title = format!("COVID-19 {y} vs. {x}");

        Self {
            title,
            x_axis: title_case(&x),
            y_axis: title_case(&y),
        }
    }

    /// `"<title>-<suffix>.png"`.
    pub fn file_name(&self, suffix: &str) -> String {
        format!("{}-{suffix}.png", self.title)
    }
}

/// Field names use `_` as a word separator; labels use spaces.
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DATE_FIELD, Scale, TraceStyle};

    fn spec(x: &str, y: &str) -> ChartSpec {
        ChartSpec::new(x, y, Scale::Log, Scale::Log, TraceStyle::Markers { size: 1 })
    }

    #[test]
    fn title_case_handles_punctuation() {
        assert_eq!(title_case("time since first infection (days)"), "Time Since First Infection (Days)");
        assert_eq!(title_case("daily new cases"), "Daily New Cases");
        assert_eq!(title_case("COVID-19 cases"), "Covid-19 Cases");
    }

    #[test]
    fn metric_pair_labels_and_file_name() {
        let labels = ChartLabels::for_spec(&spec("running total", "daily_new_cases"));
        assert_eq!(labels.title, "COVID-19 daily new cases vs. running total");
        assert_eq!(labels.x_axis, "Running Total");
        assert_eq!(labels.y_axis, "Daily New Cases");
        assert_eq!(
            labels.file_name("by country"),
            "COVID-19 daily new cases vs. running total-by country.png"
        );
    }

    #[test]
    fn time_axis_uses_days_since_first_infection() {
        let labels = ChartLabels::for_spec(&spec(DATE_FIELD, "new_tests"));
        assert_eq!(
            labels.title,
            "COVID-19 new tests vs. Time Since First Infection (Days)"
        );
        assert_eq!(labels.x_axis, "Time Since First Infection (Days)");
    }
}
