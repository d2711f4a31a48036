use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{parse_sugar_reading, validate_win_ansi};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SUGAR_MIN: u16 = 0;
pub const SUGAR_MAX: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Goal {
    #[default]
    #[serde(rename = "Maintain Weight")]
    MaintainWeight,
    #[serde(rename = "Lose Weight")]
    LoseWeight,
    #[serde(rename = "Gain Weight")]
    GainWeight,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::MaintainWeight, Goal::LoseWeight, Goal::GainWeight];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::MaintainWeight => "Maintain Weight",
            Goal::LoseWeight => "Lose Weight",
            Goal::GainWeight => "Gain Weight",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Goal {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Goal::ALL
            .into_iter()
            .find(|goal| goal.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                PlanError::validation(
                    "goal",
                    trimmed,
                    "Goal must be one of: Maintain Weight, Lose Weight, Gain Weight",
                )
            })
    }
}

/// The form exactly as the browser submitted it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanForm {
    pub name: String,
    pub goal: String,
    pub fasting_sugar: String,
    pub pre_meal_sugar: String,
    pub post_meal_sugar: String,
    pub dietary_preferences: String,
    pub exclusions: String,
}

impl PlanForm {
    /// Validates the raw fields. A blank name is checked first so that an
    /// empty form always reports the same error. A blank goal means
    /// `Maintain Weight`, the form's preselected option.
    pub fn to_request(&self) -> Result<PlanRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PlanError::MissingName);
        }
        // PDF 以內建 Helvetica 輸出，名字必須可完整印出
        validate_win_ansi("name", name)?;

        let goal = if self.goal.trim().is_empty() {
            Goal::default()
        } else {
            self.goal.parse()?
        };

        Ok(PlanRequest {
            name: name.to_string(),
            goal,
            fasting_sugar: parse_sugar_reading("fasting_sugar", &self.fasting_sugar)?,
            pre_meal_sugar: parse_sugar_reading("pre_meal_sugar", &self.pre_meal_sugar)?,
            post_meal_sugar: parse_sugar_reading("post_meal_sugar", &self.post_meal_sugar)?,
            dietary_preferences: self.dietary_preferences.trim().to_string(),
            exclusions: self.exclusions.trim().to_string(),
        })
    }
}

/// A validated submission. Lives for one request/render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    pub goal: Goal,
    pub fasting_sugar: u16,
    pub pre_meal_sugar: u16,
    pub post_meal_sugar: u16,
    pub dietary_preferences: String,
    pub exclusions: String,
}

impl PlanRequest {
    pub fn preferences(&self) -> Vec<String> {
        self.dietary_preferences
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&PlanRequest> for PlanForm {
    fn from(request: &PlanRequest) -> Self {
        PlanForm {
            name: request.name.clone(),
            goal: request.goal.label().to_string(),
            fasting_sugar: request.fasting_sugar.to_string(),
            pre_meal_sugar: request.pre_meal_sugar.to_string(),
            post_meal_sugar: request.post_meal_sugar.to_string(),
            dietary_preferences: request.dietary_preferences.clone(),
            exclusions: request.exclusions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceShare {
    pub label: String,
    pub percent: f64,
}

/// Equal-weight breakdown of the listed preferences, rounded to one decimal.
pub fn preference_shares(preferences: &[String]) -> Vec<PreferenceShare> {
    if preferences.is_empty() {
        return Vec::new();
    }

    let share = 100.0 / preferences.len() as f64;
    let rounded = (share * 10.0).round() / 10.0;
    preferences
        .iter()
        .map(|label| PreferenceShare {
            label: label.clone(),
            percent: rounded,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    #[serde(alias = "text")]
    Txt,
}

impl OutputFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Txt => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pdf" => Ok(OutputFormat::Pdf),
            "txt" | "text" => Ok(OutputFormat::Txt),
            other => Err(PlanError::validation("format", other, "Format must be pdf or txt")),
        }
    }
}

/// Title line plus the plan text split on newline boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    pub name: String,
    pub title: String,
    pub plan_text: String,
    pub body_lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
}
