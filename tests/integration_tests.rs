use diaplate::core::requester::MockPlanRequester;
use diaplate::domain::ports::Storage;
use diaplate::{LocalStorage, OutputFormat, PlanEngine, PlanError, PlanForm};
use tempfile::TempDir;

fn form(name: &str, post_meal: &str) -> PlanForm {
    PlanForm {
        name: name.to_string(),
        goal: "Gain Weight".to_string(),
        fasting_sugar: "92".to_string(),
        pre_meal_sugar: "118".to_string(),
        post_meal_sugar: post_meal.to_string(),
        dietary_preferences: "high-protein".to_string(),
        exclusions: String::new(),
    }
}

#[tokio::test]
async fn test_end_to_end_render_to_local_storage() {
    // Setup temporary directory for output
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().join("plans"));
    let engine = PlanEngine::new(MockPlanRequester);

    let outcome = engine.run(&form("Hamza Ali", "165")).await.unwrap();

    for format in [OutputFormat::Pdf, OutputFormat::Txt] {
        let rendered = engine.render(&outcome.document, format).unwrap();
        let output_path = storage
            .write_file(&rendered.file_name, &rendered.bytes)
            .await
            .unwrap();

        assert!(output_path.ends_with(&format!("Hamza_Ali_DiaPlate_Meal_Plan.{}", format.extension())));
        assert!(std::path::Path::new(&output_path).exists());
    }

    let text = storage
        .read_file("Hamza_Ali_DiaPlate_Meal_Plan.txt")
        .await
        .unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.starts_with("Hamza Ali's DiaPlate Meal Plan\n\n"));
    assert!(text.contains("Post-Meal Sugar: 165 mg/dL"));
    assert_eq!(text.split('\n').count(), outcome.document.line_count() + 1);
}

#[tokio::test]
async fn test_end_to_end_rejects_invalid_submission() {
    let engine = PlanEngine::new(MockPlanRequester);

    let err = engine.run(&form("", "165")).await.unwrap_err();
    assert!(matches!(err, PlanError::MissingName));

    let err = engine.run(&form("Hamza", "abc")).await.unwrap_err();
    match err {
        PlanError::ValidationError { field, .. } => assert_eq!(field, "post_meal_sugar"),
        other => panic!("unexpected error: {:?}", other),
    }
}
