// Instruction template resolution
//
// Templates contain `{key}` placeholders resolved against the pipeline
// state. A placeholder naming a key that has not been written yet is a
// contract violation: state keys are always produced by a predecessor
// stage before anything reads them.

use super::state::PipelineState;
use crate::error::{PipelineError, Result};

/// Resolve every `{key}` placeholder in `template` against `state`.
pub fn resolve_template(template: &str, state: &PipelineState) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            // No closing brace; keep the tail verbatim
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let key = &after_open[..close];
        if is_placeholder_key(key) {
            let value = state.get(key).ok_or_else(|| {
                PipelineError::Protocol(format!(
                    "instruction placeholder {{{key}}} has no value in pipeline state"
                ))
            })?;
            out.push_str(value);
        } else {
            // Literal braces (e.g. JSON examples inside an instruction)
            out.push('{');
            out.push_str(key);
            out.push('}');
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::state::PipelineState;

    #[test]
    fn test_resolves_known_keys() {
        let mut state = PipelineState::new();
        state.set_draft("Fresh sour cream, 200g.");
        let resolved =
            resolve_template("Review this:\n{current_product_description}\nThanks.", &state)
                .unwrap();
        assert_eq!(resolved, "Review this:\nFresh sour cream, 200g.\nThanks.");
    }

    #[test]
    fn test_multiple_placeholders() {
        let mut state = PipelineState::new();
        state.set_draft("D");
        state.set_criticism("C");
        let resolved =
            resolve_template("{current_product_description} / {criticism}", &state).unwrap();
        assert_eq!(resolved, "D / C");
    }

    #[test]
    fn test_unwritten_key_is_an_error() {
        let state = PipelineState::new();
        let err = resolve_template("{criticism}", &state).unwrap_err();
        assert!(matches!(err, PipelineError::Protocol(_)));
    }

    #[test]
    fn test_literal_braces_pass_through() {
        let state = PipelineState::new();
        let resolved = resolve_template(r#"Return JSON like {"name": "..."}"#, &state).unwrap();
        assert_eq!(resolved, r#"Return JSON like {"name": "..."}"#);
    }

    #[test]
    fn test_unclosed_brace_kept_verbatim() {
        let state = PipelineState::new();
        let resolved = resolve_template("dangling {brace", &state).unwrap();
        assert_eq!(resolved, "dangling {brace");
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let state = PipelineState::new();
        let resolved = resolve_template("plain text", &state).unwrap();
        assert_eq!(resolved, "plain text");
    }
}
