//! Share cards: the embed page social clients unfurl, and the image it points at.

use crate::{config::AppConfig, public_endpoint};

pub const DEFAULT_FRAME_TITLE: &str = "Music NFT on ZAOUNZ";
pub const DEFAULT_OG_TITLE: &str = "ZAOUNZ";
pub const OG_TITLE_MAX_CHARS: usize = 30;

/// Escapes text for HTML/SVG attribute and element content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Cuts titles longer than 30 characters and appends `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > OG_TITLE_MAX_CHARS {
        let head: String = title.chars().take(OG_TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

fn or_default<'a>(title: Option<&'a str>, default: &'a str) -> &'a str {
    title.filter(|t| !t.is_empty()).unwrap_or(default)
}

/// Embed document for a minted token.
pub fn render_frame(app: &AppConfig, contract: &str, token_id: &str, title: Option<&str>) -> String {
    let title = or_default(title, DEFAULT_FRAME_TITLE);
    let image = escape(&public_endpoint::og_image_url(app, title));
    let collect = escape(&public_endpoint::collect_url(app, contract, token_id));
    let home = escape(&public_endpoint::app_url(app));
    let title = escape(title);
    // the redirect target lands inside a JS string literal
    let redirect = serde_json::to_string(&public_endpoint::collect_url(app, contract, token_id))
        .unwrap_or_else(|_| "\"/\"".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta property="og:title" content="{title}" />
  <meta property="og:description" content="Collect this track on Base via Zora" />
  <meta property="og:image" content="{image}" />
  <meta property="fc:frame" content="vNext" />
  <meta property="fc:frame:image" content="{image}" />
  <meta property="fc:frame:button:1" content="Collect" />
  <meta property="fc:frame:button:1:action" content="link" />
  <meta property="fc:frame:button:1:target" content="{collect}" />
  <meta property="fc:frame:button:2" content="Open ZAOUNZ" />
  <meta property="fc:frame:button:2:action" content="link" />
  <meta property="fc:frame:button:2:target" content="{home}" />
</head>
<body>
  <script>window.location.href = {redirect};</script>
</body>
</html>"#
    )
}

/// 1200x630 SVG card.
pub fn render_og(title: Option<&str>) -> String {
    let title = escape(&truncate_title(or_default(title, DEFAULT_OG_TITLE)));

    format!(
        r#"<svg width="1200" height="630" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#0F0F1A" />
      <stop offset="100%" style="stop-color:#1A1A2E" />
    </linearGradient>
    <linearGradient id="accent" x1="0%" y1="0%" x2="100%" y2="0%">
      <stop offset="0%" style="stop-color:#8B5CF6" />
      <stop offset="100%" style="stop-color:#EC4899" />
    </linearGradient>
  </defs>
  <rect width="1200" height="630" fill="url(#bg)" />
  <rect x="50" y="500" width="200" height="6" rx="3" fill="url(#accent)" />
  <text x="50" y="250" fill="white" font-family="system-ui, sans-serif" font-size="64" font-weight="bold">{title}</text>
  <text x="50" y="310" fill="rgba(255,255,255,0.5)" font-family="system-ui, sans-serif" font-size="28">Music NFT on Base via Zora</text>
  <text x="50" y="540" fill="url(#accent)" font-family="system-ui, sans-serif" font-size="36" font-weight="bold">ZAOUNZ</text>
  <text x="50" y="580" fill="rgba(255,255,255,0.3)" font-family="system-ui, sans-serif" font-size="20">Create. Discover. Own.</text>
</svg>"#
    )
}
