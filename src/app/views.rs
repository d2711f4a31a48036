use crate::core::engine::PlanOutcome;
use crate::domain::model::{Goal, OutputFormat, PlanForm, PreferenceShare, SUGAR_MAX, SUGAR_MIN};
use crate::utils::error::{PlanError, Result};
use serde::Serialize;
use tera::{Context, Tera};

const BASE_TEMPLATE: &str = include_str!("templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Message shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn from_error(error: &PlanError) -> Self {
        match error {
            PlanError::MissingName | PlanError::ValidationError { .. } => {
                Notice::Warning(error.user_friendly_message())
            }
            _ => Notice::Error(error.user_friendly_message()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResultView<'a> {
    name: &'a str,
    greeting: String,
    plan_text: &'a str,
    plan_lines: Vec<&'a str>,
    shares: &'a [PreferenceShare],
    advice: &'a str,
}

#[derive(Debug, Serialize)]
struct FormatChoice {
    value: &'static str,
    label: &'static str,
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    fn base_context(&self, form: &PlanForm, planner: &str) -> Context {
        let mut context = Context::new();
        context.insert("form", form);
        context.insert(
            "goals",
            &Goal::ALL.iter().map(Goal::label).collect::<Vec<_>>(),
        );
        context.insert("sugar_min", &SUGAR_MIN);
        context.insert("sugar_max", &SUGAR_MAX);
        context.insert("planner", planner);
        context
    }

    /// Blank form: goal preselected, readings at the widget minimum.
    pub fn empty_form() -> PlanForm {
        PlanForm {
            goal: Goal::default().label().to_string(),
            fasting_sugar: SUGAR_MIN.to_string(),
            pre_meal_sugar: SUGAR_MIN.to_string(),
            post_meal_sugar: SUGAR_MIN.to_string(),
            ..PlanForm::default()
        }
    }

    pub fn form_page(&self, form: &PlanForm, notice: Option<&Notice>, planner: &str) -> Result<String> {
        let mut context = self.base_context(form, planner);
        match notice {
            Some(Notice::Warning(message)) => context.insert("warning", message),
            Some(Notice::Error(message)) => context.insert("error", message),
            None => {}
        }
        Ok(self.tera.render("index.html", &context)?)
    }

    /// The submitted values stay in the form; nothing is reset.
    pub fn result_page(
        &self,
        form: &PlanForm,
        outcome: &PlanOutcome,
        planner: &str,
        default_format: OutputFormat,
    ) -> Result<String> {
        let mut context = self.base_context(form, planner);
        let result = ResultView {
            name: &outcome.request.name,
            greeting: format!(
                "Hi {}, based on your input, here is a personalized meal plan to help you achieve your goal:",
                outcome.request.name
            ),
            plan_text: &outcome.plan_text,
            plan_lines: outcome.document.body_lines.iter().map(String::as_str).collect(),
            shares: &outcome.preference_shares,
            advice: outcome.activity_advice,
        };
        context.insert("result", &result);
        context.insert("formats", &format_choices(default_format));
        Ok(self.tera.render("index.html", &context)?)
    }
}

fn format_choices(default_format: OutputFormat) -> Vec<FormatChoice> {
    let pdf = FormatChoice {
        value: "pdf",
        label: "PDF",
    };
    let txt = FormatChoice {
        value: "txt",
        label: "Text",
    };
    match default_format {
        OutputFormat::Pdf => vec![pdf, txt],
        OutputFormat::Txt => vec![txt, pdf],
    }
}
