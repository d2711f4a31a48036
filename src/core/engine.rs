use crate::core::document::{DocumentRenderer, DEFAULT_TITLE_SUFFIX};
use crate::core::prompt::PHYSICAL_ACTIVITY_ADVICE;
use crate::domain::model::{
    preference_shares, OutputFormat, PlanDocument, PlanForm, PlanRequest, PreferenceShare,
    RenderedDocument,
};
use crate::domain::ports::PlanRequester;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub request: PlanRequest,
    pub plan_text: String,
    pub document: PlanDocument,
    pub preference_shares: Vec<PreferenceShare>,
    pub activity_advice: &'static str,
}

/// collect → request → render
pub struct PlanEngine<R: PlanRequester> {
    requester: R,
    renderer: DocumentRenderer,
    title_suffix: String,
}

impl<R: PlanRequester> PlanEngine<R> {
    pub fn new(requester: R) -> Self {
        Self {
            requester,
            renderer: DocumentRenderer::default(),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
        }
    }

    pub fn with_renderer(mut self, renderer: DocumentRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffix = suffix.into();
        self
    }

    pub fn requester_kind(&self) -> &'static str {
        self.requester.kind()
    }

    pub async fn run(&self, form: &PlanForm) -> Result<PlanOutcome> {
        // Collect
        let request = form.to_request().inspect_err(|e| {
            tracing::info!("📝 Form rejected: {}", e);
        })?;
        tracing::info!(
            "📝 Plan requested for goal '{}' via {} planner",
            request.goal,
            self.requester.kind()
        );

        // Request
        let plan_text = self.requester.request_plan(&request).await.inspect_err(|e| {
            tracing::error!("❌ Plan request failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        })?;
        tracing::debug!("Received plan with {} line(s)", plan_text.split('\n').count());

        // Render
        let document = self.document(&request.name, &plan_text);
        let preference_shares = preference_shares(&request.preferences());

        Ok(PlanOutcome {
            request,
            plan_text,
            document,
            preference_shares,
            activity_advice: PHYSICAL_ACTIVITY_ADVICE,
        })
    }

    pub fn document(&self, name: &str, plan_text: &str) -> PlanDocument {
        PlanDocument::with_title_suffix(name, plan_text, &self.title_suffix)
    }

    pub fn render(&self, document: &PlanDocument, format: OutputFormat) -> Result<RenderedDocument> {
        let rendered = self.renderer.render(document, format)?;
        tracing::info!(
            "📄 Rendered {} ({} bytes)",
            rendered.file_name,
            rendered.bytes.len()
        );
        Ok(rendered)
    }
}
