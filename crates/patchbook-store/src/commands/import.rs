use crate::error::{Result, StoreError};
use crate::model::ProjectDraft;
use serde_json::Value;

/// Name given to imports whose document has no usable name.
pub const PLACEHOLDER_NAME: &str = "Imported Project";

/// Parse an exported document into a draft.
///
/// The document must be a JSON object; anything else is a
/// [`StoreError::Format`]. Within the object the parser is lenient:
/// - missing, blank or non-string `name` becomes [`PLACEHOLDER_NAME`]
/// - missing or non-string `code` becomes `""`
/// - missing, blank or non-string `description` becomes `None`
///
/// `exportedAt` and `version` are informational and not checked. The draft
/// never carries an id, so saving it always creates a new project.
pub fn run(text: &str) -> Result<ProjectDraft> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| StoreError::Format(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(StoreError::Format(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let text_field = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let name = text_field("name")
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
    let code = text_field("code").unwrap_or_default();
    let description = text_field("description").filter(|d| !d.trim().is_empty());

    Ok(ProjectDraft {
        id: None,
        name,
        code,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::export;
    use crate::error::ErrorKind;
    use crate::model::{Id, Project};

    #[test]
    fn test_import_reads_exported_fields() {
        let project = Project {
            id: Id::from("p1"),
            name: "Sine".into(),
            code: "osc(440)\n  .gain(0.3)".into(),
            description: Some("A \"plain\" sine".into()),
            created_at: 1,
            updated_at: 2,
        };
        let draft = run(&export::run(&project, 5).unwrap()).unwrap();

        assert_eq!(draft.id, None);
        assert_eq!(draft.name, project.name);
        assert_eq!(draft.code, project.code);
        assert_eq!(draft.description, project.description);
    }

    #[test]
    fn test_missing_name_and_code_get_defaults() {
        let draft = run(r#"{"description": "no name"}"#).unwrap();
        assert_eq!(draft.name, PLACEHOLDER_NAME);
        assert_eq!(draft.code, "");
        assert_eq!(draft.description.as_deref(), Some("no name"));
    }

    #[test]
    fn test_malformed_name_gets_placeholder() {
        let draft = run(r#"{"name": 42, "code": "x"}"#).unwrap();
        assert_eq!(draft.name, PLACEHOLDER_NAME);
        assert_eq!(draft.code, "x");

        let draft = run(r#"{"name": "   ", "code": "x"}"#).unwrap();
        assert_eq!(draft.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = run("name: Sine").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_non_object_is_format_error() {
        assert!(matches!(run("[1, 2]"), Err(StoreError::Format(_))));
        assert!(matches!(run("\"Sine\""), Err(StoreError::Format(_))));
    }
}
