const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Strips Markdown code-fence wrapping from model output so it can be handed to the JSON parser.
///
/// Only a matched pair is removed: an opening ```` ```json ```` or ```` ``` ```` together with a
/// closing ```` ``` ````. Nested pairs are peeled until none is left, so sanitizing twice
/// yields the same text.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.trim();
    while let Some(inner) = strip_fence_pair(current) {
        current = inner.trim();
    }
    current.to_string()
}

fn strip_fence_pair(text: &str) -> Option<&str> {
    let body = text
        .strip_prefix(JSON_FENCE)
        .or_else(|| text.strip_prefix(FENCE))?;
    body.strip_suffix(FENCE)
}
