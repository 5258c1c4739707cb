use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Monospace-ish text estimate used to keep labels inside fixed-width cards.
pub struct TextMetrics {
    pub char_width: f64,
    pub ellipsis: &'static str,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            // ~11px system font
            char_width: 6.6,
            ellipsis: "…",
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Truncate `text` with an ellipsis so it fits `max_width`.
    pub fn fit<'a>(&self, text: &'a str, max_width: f64) -> std::borrow::Cow<'a, str> {
        if self.text_width(text) <= max_width {
            return text.into();
        }
        let budget = max_width - self.text_width(self.ellipsis);
        let mut used = 0.0;
        let mut out = String::new();
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as f64 * self.char_width;
            if used + w > budget {
                break;
            }
            used += w;
            out.push(ch);
        }
        out.push_str(self.ellipsis);
        out.into()
    }
}
