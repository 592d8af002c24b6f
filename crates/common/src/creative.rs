use serde_json::Value as Json;

use crate::constants::RENDERER_SCRIPT_URL;

/// Build the banner markup for an RFP ad response.
///
/// The markup is a placeholder element tagged with the ad spot, the whole
/// response embedded as a JSON data block, the renderer script, and an inline
/// call that renders the ad into the placeholder's parent from the embedded
/// data (`offline:true` keeps the renderer from fetching the ad again).
#[must_use]
pub fn make_creative(adspot_id: &str, body: &Json) -> String {
    let payload =
        safe_json_string(&serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string()));

    format!(
        concat!(
            r#"<div><ins data-rfp-display-adspot-id="{id}"></ins></div>"#,
            r#"<script id="rfp-ad-response-{id}" type="application/json">{payload}</script>"#,
            r#"<script src="{script}"></script>"#,
            r#"<script>RFP.Display.Default.lazyLoading(document.querySelector("[data-rfp-display-adspot-id={id}]").parentElement, {{offline:true}})</script>"#,
        ),
        id = adspot_id,
        payload = payload,
        script = RENDERER_SCRIPT_URL,
    )
}

/// Escape serialized JSON so it can sit inside a `<script>` element.
///
/// `<`, `>` and `&` cannot close the element or start markup, and `'` cannot
/// end an attribute if the payload is ever copied into one. The result is
/// still valid JSON with the same value.
#[must_use]
pub fn safe_json_string(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('>', "\\u003e")
        .replace('<', "\\u003c")
        .replace('\'', "\\u0027")
}
