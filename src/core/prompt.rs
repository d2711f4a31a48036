use crate::domain::model::PlanRequest;

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "none"
    } else {
        value
    }
}

/// Natural-language prompt sent to the LLM.
pub fn build_prompt(request: &PlanRequest) -> String {
    format!(
        "Create a personalized one-day meal plan for {name}, who is managing diabetes.\n\
         Blood sugar readings:\n\
         - Fasting: {fasting} mg/dL\n\
         - Pre-meal: {pre} mg/dL\n\
         - Post-meal: {post} mg/dL\n\
         Dietary preferences: {prefs}\n\
         Foods to avoid: {exclusions}\n\
         Health goal: {goal}\n\
         Suggest breakfast, lunch, dinner and a snack with portion guidance, \
         keeping the glycemic load low. Answer in plain text without markdown tables.",
        name = request.name,
        fasting = request.fasting_sugar,
        pre = request.pre_meal_sugar,
        post = request.post_meal_sugar,
        prefs = or_none(&request.dietary_preferences),
        exclusions = or_none(&request.exclusions),
        goal = request.goal,
    )
}

/// Deterministic plan used when no API key is configured.
pub fn mock_plan(request: &PlanRequest) -> String {
    format!(
        "Hi {name}, here is a mock meal plan for you based on your input:\n\n\
         Fasting Sugar: {fasting} mg/dL\n\
         Pre-Meal Sugar: {pre} mg/dL\n\
         Post-Meal Sugar: {post} mg/dL\n\
         Dietary Preferences: {prefs}\n\
         Foods to Avoid: {exclusions}\n\n\
         Your goal is {goal}, so we suggest maintaining a balanced diet rich in vegetables, \
         whole grains, and lean proteins. Stay hydrated, and avoid foods high in sugar. \
         Consider engaging in light physical activities such as walking or yoga.",
        name = request.name,
        fasting = request.fasting_sugar,
        pre = request.pre_meal_sugar,
        post = request.post_meal_sugar,
        prefs = request.dietary_preferences,
        exclusions = request.exclusions,
        goal = request.goal,
    )
}

pub const PHYSICAL_ACTIVITY_ADVICE: &str = "Regular physical activity is crucial for managing \
diabetes. Consider incorporating daily walks, yoga, or light resistance training into your routine.";
