use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Name is required")]
    MissingName,

    #[error("Invalid value for '{field}': {value} ({reason})")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Plan unavailable: {reason}")]
    PlanUnavailable { reason: String },

    #[error("Document rendering error: {message}")]
    RenderError { message: String },

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    External,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlanError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        PlanError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        PlanError::PlanUnavailable {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlanError::MissingName | PlanError::ValidationError { .. } => ErrorCategory::Input,
            PlanError::InvalidConfigValueError { .. }
            | PlanError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            PlanError::PlanUnavailable { .. } | PlanError::ApiError(_) => ErrorCategory::External,
            PlanError::RenderError { .. } | PlanError::TemplateError(_) => {
                ErrorCategory::Rendering
            }
            PlanError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Rendering => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 使用者可以自行修正或重試的錯誤
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::External
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlanError::MissingName => {
                "Please enter your name to personalize your experience.".to_string()
            }
            PlanError::ValidationError { field, reason, .. } => {
                format!("{}: {}", field_label(field), reason)
            }
            PlanError::PlanUnavailable { .. } | PlanError::ApiError(_) => {
                "Plan unavailable, please retry.".to_string()
            }
            PlanError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            PlanError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' could not be loaded: {}", field, message)
            }
            PlanError::RenderError { .. } | PlanError::TemplateError(_) => {
                "The meal plan could not be rendered.".to_string()
            }
            PlanError::IoError(_) => "An internal error occurred.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the highlighted field and submit the form again",
            ErrorCategory::External => {
                "Wait a moment and retry; check the API key and network access if it keeps failing"
            }
            ErrorCategory::Configuration => "Fix the configuration file and restart",
            ErrorCategory::Rendering => "Retry with a different output format",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "name" => "Your Name",
        "goal" => "Health Goal",
        "fasting_sugar" => "Fasting Sugar Levels (mg/dL)",
        "pre_meal_sugar" => "Pre-Meal Sugar Levels (mg/dL)",
        "post_meal_sugar" => "Post-Meal Sugar Levels (mg/dL)",
        "format" => "Format",
        other => other,
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
