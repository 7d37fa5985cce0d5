use blogdraft_core::{BlogPostForm, FormError, FormStep};
use serde_json::json;

fn filled_basic_info() -> BlogPostForm {
    BlogPostForm {
        title: "First post".to_string(),
        description: "About things".to_string(),
        nickname: "writer".to_string(),
        ..BlogPostForm::default()
    }
}

#[test]
fn untyped_payload_parses_with_defaults_and_tag_normalization() {
    let form = BlogPostForm::from_json(json!({
        "title": "Hello",
        "tags": " rust, #blog ,rust,",
        "mainImage": "img_1",
        "isEditorCompleted": false
    }))
    .unwrap();

    assert_eq!(form.title, "Hello");
    assert_eq!(form.tags, vec!["rust", "blog"]);
    assert_eq!(form.main_image.as_deref(), Some("img_1"));
    assert!(form.media.is_empty());
}

#[test]
fn wrongly_shaped_field_is_rejected() {
    let err = BlogPostForm::from_json_str(r#"{"title": 12}"#).unwrap_err();
    assert!(matches!(err, FormError::InvalidPayload(_)));
}

#[test]
fn basic_info_step_names_first_missing_field() {
    let mut form = filled_basic_info();
    form.description = "   ".to_string();

    assert_eq!(
        form.validate_step(FormStep::BasicInfo),
        Err(FormError::MissingField {
            step: FormStep::BasicInfo,
            field: "description",
        })
    );
}

#[test]
fn completed_editor_content_satisfies_content_step() {
    let mut form = filled_basic_info();
    assert!(form.validate_step(FormStep::Content).is_err());

    form.editor_completed_content = "## Intro\n\nHello\n\n".to_string();
    assert!(form.validate_step(FormStep::Content).is_err());

    form.is_editor_completed = true;
    assert_eq!(form.advance(FormStep::Content), Ok(Some(FormStep::Media)));
    assert_eq!(form.preview_content(), "## Intro\n\nHello\n\n");
}

#[test]
fn plain_body_is_used_when_editor_output_is_blank() {
    let mut form = filled_basic_info();
    form.content = "plain body".to_string();
    form.is_editor_completed = true;
    form.editor_completed_content = "  ".to_string();

    assert_eq!(form.preview_content(), "plain body");
}

#[test]
fn preview_step_checks_every_earlier_step() {
    let mut form = BlogPostForm {
        content: "body".to_string(),
        ..BlogPostForm::default()
    };
    assert!(matches!(
        form.validate_step(FormStep::Preview),
        Err(FormError::MissingField {
            step: FormStep::BasicInfo,
            field: "title",
        })
    ));

    form.title = "t".to_string();
    form.description = "d".to_string();
    form.nickname = "n".to_string();
    assert_eq!(form.advance(FormStep::Preview), Ok(None));
}
