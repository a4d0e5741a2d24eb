//! RFC 6902 patch application.
//!
//! The patch applier is an external collaborator: the [`json_patch`] crate
//! parses and applies patch documents. This module only adapts it to the
//! store's error taxonomy and copy semantics.

use json_patch::Patch;
use serde_json::Value;

use crate::collection::Document;
use crate::errors::{ErrorKind, IceCaveError, IceCaveResult};

/// Applies an RFC 6902 patch to a copy of `document` and returns the new
/// document.
///
/// The input document is never mutated; the stored value is replaced by
/// the caller only on a successful result, so a failing patch leaves no
/// partial mutation observable.
///
/// # Errors
///
/// Returns `PatchError` if `patch` is not a valid patch document, or if
/// applying it fails (invalid path, unsupported operation, failed test).
pub fn apply_patch(patch: &Value, document: &Document) -> IceCaveResult<Document> {
    let operations: Patch = serde_json::from_value(patch.clone()).map_err(|e| {
        log::error!("Malformed patch document: {}", e);
        IceCaveError::new(
            &format!("Malformed patch document: {}", e),
            ErrorKind::PatchError,
        )
    })?;

    let mut updated = document.clone();
    json_patch::patch(&mut updated, &operations).map_err(|e| {
        log::error!("Failed to apply patch: {}", e);
        IceCaveError::new(
            &format!("Failed to apply patch: {}", e),
            ErrorKind::PatchError,
        )
    })?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replace_operation() {
        let document = json!({ "foo": "bar", "baz": "buzz" });
        let patch = json!([{ "op": "replace", "path": "/baz", "value": "boo" }]);

        let updated = apply_patch(&patch, &document).unwrap();
        assert_eq!(updated, json!({ "foo": "bar", "baz": "boo" }));
    }

    #[test]
    fn test_add_and_remove_operations() {
        let document = json!({ "foo": "bar" });
        let patch = json!([
            { "op": "add", "path": "/hello", "value": ["world"] },
            { "op": "remove", "path": "/foo" }
        ]);

        let updated = apply_patch(&patch, &document).unwrap();
        assert_eq!(updated, json!({ "hello": ["world"] }));
    }

    #[test]
    fn test_original_document_is_untouched() {
        let document = json!({ "foo": "bar" });
        let patch = json!([{ "op": "replace", "path": "/foo", "value": "boo" }]);

        let _ = apply_patch(&patch, &document).unwrap();
        assert_eq!(document, json!({ "foo": "bar" }));
    }

    #[test]
    fn test_invalid_path_fails() {
        let document = json!({ "foo": "bar" });
        let patch = json!([{ "op": "replace", "path": "/missing/deep", "value": 1 }]);

        let result = apply_patch(&patch, &document);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::PatchError);
    }

    #[test]
    fn test_malformed_patch_fails() {
        let document = json!({ "foo": "bar" });

        let result = apply_patch(&json!("not a patch"), &document);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::PatchError);

        let result = apply_patch(&json!([{ "op": "frobnicate", "path": "/foo" }]), &document);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::PatchError);
    }

    #[test]
    fn test_nested_patch_target() {
        let document = json!({ "outer": { "inner": [1, 2, 3] } });
        let patch = json!([{ "op": "replace", "path": "/outer/inner/1", "value": 99 }]);

        let updated = apply_patch(&patch, &document).unwrap();
        assert_eq!(updated, json!({ "outer": { "inner": [1, 99, 3] } }));
    }
}
