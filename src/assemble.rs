use crate::argument::LogArgument;
use crate::classify::classify;
use crate::context::ContextSnapshot;
use crate::payload::MergingPayload;
use serde_json::Value;

/// Reconcile a variadic console call into one payload and one message.
///
/// - text fragments are joined with single spaces, in order, and the
///   running message is left-trimmed after each fragment;
/// - objects and arrays are collected into `objects`, omitted when empty;
/// - the last error argument becomes `err`.
///
/// Each predicate is applied independently to every argument. Context
/// fields are merged only when a snapshot is given.
pub fn assemble(args: &[LogArgument], ctx: Option<&ContextSnapshot>) -> (MergingPayload, String) {
    let mut message = String::new();
    let mut objects = Vec::new();
    let mut err = None;

    for arg in args {
        let class = classify(arg);
        if class.message {
            if let LogArgument::Value(Value::String(fragment)) = arg {
                push_fragment(&mut message, fragment);
            }
        }
        if class.data {
            if let LogArgument::Value(value) = arg {
                objects.push(value.clone());
            }
        }
        if class.error {
            if let LogArgument::Error(e) = arg {
                err = Some(e.clone());
            }
        }
    }

    let mut payload = MergingPayload {
        objects: (!objects.is_empty()).then_some(objects),
        err,
        ..Default::default()
    };
    if let Some(ctx) = ctx {
        payload.merge_context(ctx);
    }

    (payload, message)
}

// Equivalent to `message = (message + " " + fragment).trim_start()`: the
// running message is already left-trimmed, so only the first non-empty
// contribution needs trimming.
fn push_fragment(message: &mut String, fragment: &str) {
    if message.is_empty() {
        message.push_str(fragment.trim_start_matches(is_js_whitespace));
    } else {
        message.push(' ');
        message.push_str(fragment);
    }
}

// ECMAScript whitespace: Rust's `White_Space` plus U+FEFF, minus U+0085.
fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ErrorValue;
    use crate::context::IdentityType;
    use serde_json::json;

    fn args(list: Vec<LogArgument>) -> Vec<LogArgument> {
        list
    }

    #[test]
    fn text_only_joins_with_spaces() {
        let (payload, message) = assemble(&args(vec!["a".into(), "b".into(), "c".into()]), None);
        assert_eq!(message, "a b c");
        assert!(payload.objects.is_none());
        assert!(payload.err.is_none());
    }

    #[test]
    fn leading_whitespace_is_trimmed() {
        let (_, message) = assemble(&args(vec!["  padded".into(), " tail ".into()]), None);
        assert_eq!(message, "padded  tail ");
    }

    #[test]
    fn trimming_follows_ecmascript_whitespace() {
        let (_, message) = assemble(&args(vec!["\u{FEFF}\t bom".into()]), None);
        assert_eq!(message, "bom");

        let (_, message) = assemble(&args(vec!["\u{0085}nel".into()]), None);
        assert_eq!(message, "\u{0085}nel");
    }

    #[test]
    fn empty_fragments_do_not_leave_leading_spaces() {
        let (_, message) = assemble(&args(vec!["".into(), "".into(), "x".into(), "".into()]), None);
        assert_eq!(message, "x ");
    }

    #[test]
    fn single_object_without_text() {
        let (payload, message) = assemble(&args(vec![json!({"x": 1}).into()]), None);
        assert_eq!(message, "");
        assert_eq!(payload.objects, Some(vec![json!({"x": 1})]));
    }

    #[test]
    fn last_error_wins() {
        let e1 = ErrorValue::new("first");
        let e2 = ErrorValue::new("second");
        let (payload, _) = assemble(&args(vec![e1.into(), e2.clone().into()]), None);
        assert_eq!(payload.err, Some(e2));
    }

    #[test]
    fn mixed_arguments() {
        let list = args(vec![
            "User logged in".into(),
            json!({"userId": 7}).into(),
            ErrorValue::new("x").into(),
        ]);
        let (payload, message) = assemble(&list, None);

        assert_eq!(message, "User logged in");
        assert_eq!(payload.objects, Some(vec![json!({"userId": 7})]));
        assert_eq!(payload.err, Some(ErrorValue::new("x")));
    }

    #[test]
    fn primitives_are_dropped_and_order_is_kept() {
        let list = args(vec![
            1.into(),
            "one".into(),
            json!([1, 2]).into(),
            false.into(),
            "two".into(),
            json!({"k": "v"}).into(),
        ]);
        let (payload, message) = assemble(&list, None);

        assert_eq!(message, "one two");
        assert_eq!(payload.objects, Some(vec![json!([1, 2]), json!({"k": "v"})]));
    }

    #[test]
    fn context_is_merged_when_given() {
        let ctx = ContextSnapshot {
            app_id: Some("app_1".into()),
            identity_type: Some(IdentityType::App),
            ..Default::default()
        };
        let (payload, _) = assemble(&args(vec!["hi".into()]), Some(&ctx));
        assert_eq!(payload.app_id.as_deref(), Some("app_1"));
        assert_eq!(payload.identity_type, Some(IdentityType::App));
        assert_eq!(payload.tenant_id, None);
    }

    #[test]
    fn assembly_is_pure() {
        let list = args(vec!["same".into(), json!({"n": 1}).into()]);
        assert_eq!(assemble(&list, None), assemble(&list, None));
    }
}
