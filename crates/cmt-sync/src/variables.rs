//! The variable set issue templates are expanded against.

use cmt_core::entities::BRIEF_SUMMARY_LEN;
use cmt_core::{Comment, CommentSheet};

use crate::template::{TemplateValue, TemplateVariables};

/// Full name of a comment type code. Known codes match case-insensitively;
/// other codes pass through and an empty code is `Unknown`.
#[must_use]
pub fn expand_comment_type(code: &str) -> String {
    match code.to_ascii_lowercase().as_str() {
        "ge" => "General".to_string(),
        "te" => "Technical".to_string(),
        "ed" => "Editorial".to_string(),
        "" => "Unknown".to_string(),
        _ => code.to_string(),
    }
}

/// Variables for one comment of `sheet`. Absent values are empty strings.
#[must_use]
pub fn template_variables(comment: &Comment, sheet: &CommentSheet) -> TemplateVariables {
    let text = |value: Option<&str>| TemplateValue::from(value.unwrap_or_default());
    let locality = &comment.locality;

    let mut vars = TemplateVariables::new();
    vars.insert(
        "stage".into(),
        text(sheet.stage.as_ref().map(cmt_core::Stage::as_str)),
    );
    vars.insert("document".into(), text(sheet.document.as_deref()));
    vars.insert("project".into(), text(sheet.project.as_deref()));
    vars.insert("date".into(), text(sheet.date.as_deref()));
    vars.insert("version".into(), sheet.version.as_str().into());

    vars.insert("comment_id".into(), comment.id.as_str().into());
    vars.insert("body".into(), comment.body.as_str().into());
    vars.insert("type".into(), comment.comment_type.as_str().into());
    vars.insert(
        "type_full_name".into(),
        expand_comment_type(&comment.comment_type).into(),
    );
    vars.insert("comments".into(), comment.comments.as_str().into());
    vars.insert(
        "proposed_change".into(),
        text(comment.proposed_change.as_deref()),
    );
    vars.insert("observations".into(), text(comment.observations.as_deref()));
    vars.insert(
        "brief_summary".into(),
        comment.brief_summary(BRIEF_SUMMARY_LEN).into(),
    );

    vars.insert("clause".into(), text(locality.clause.as_deref()));
    vars.insert("element".into(), text(locality.element.as_deref()));
    vars.insert("line_number".into(), text(locality.line_number.as_deref()));
    vars.insert("locality_summary".into(), comment.locality_summary().into());

    vars.insert("has_observations".into(), comment.has_observations().into());
    vars.insert(
        "has_proposed_change".into(),
        comment.has_proposed_change().into(),
    );
    vars
}
