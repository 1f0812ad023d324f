use serde::Serialize;

/// Render a value for stdout, compact unless `pretty` is set
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
