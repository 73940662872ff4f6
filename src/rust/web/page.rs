use std::fmt::Write;

use crate::classifier::{Prediction, Verdict};
use crate::history::HistoryView;

pub const EMPTY_INPUT_WARNING: &str = "Please enter a news article!";
pub const NO_HISTORY: &str = "No history yet.";

/// What the result area shows after a request
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Input rejected before classification
    Warning(String),
    Verdict(Prediction),
    /// Classification or storage failed for this request
    Error(String),
}

/// Everything needed to render the single page of the app
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub input: &'a str,
    pub outcome: Option<Outcome>,
    pub history: HistoryView,
    pub diagnostics: bool,
}

/// Escapes text for inclusion in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn verdict_message(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Real => "✅ This news seems REAL.",
        Verdict::Fake => "❌ This news seems FAKE.",
    }
}

impl Page<'_> {
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Fake News Detection</title>\n</head>\n<body>\n\
             <h1 style=\"text-align:center;\">📰 Fake News Detection</h1>\n\
             <h3>📌 Enter a news article:</h3>\n\
             <form method=\"post\" action=\"/classify\">\n",
        );
        let _ = writeln!(
            html,
            "<textarea name=\"text\" rows=\"8\" cols=\"80\" placeholder=\"Write news content here 👇\">{}</textarea><br>",
            escape_html(self.input)
        );
        html.push_str("<button type=\"submit\">🔍 Classify</button>\n</form>\n");

        if let Some(outcome) = &self.outcome {
            self.render_outcome(&mut html, outcome);
        }

        html.push_str("<hr>\n<details>\n<summary>📜 View Classification History</summary>\n");
        self.render_history(&mut html);
        html.push_str("</details>\n</body>\n</html>\n");
        html
    }

    fn render_outcome(&self, html: &mut String, outcome: &Outcome) {
        match outcome {
            Outcome::Warning(message) => {
                let _ = writeln!(html, "<p class=\"warning\">⚠️ {}</p>", escape_html(message));
            }
            Outcome::Error(message) => {
                let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
            }
            Outcome::Verdict(prediction) => {
                if self.diagnostics {
                    let _ = writeln!(html, "<p>🧪 Raw prediction: {}</p>", prediction.raw_class);
                }
                let _ = writeln!(
                    html,
                    "<p>📊 Probabilities → FAKE: {:.4}, REAL: {:.4}</p>",
                    prediction.probabilities.fake, prediction.probabilities.real
                );
                if self.diagnostics {
                    let classes: Vec<String> = prediction.classes.iter().map(|c| c.to_string()).collect();
                    let _ = writeln!(html, "<p>🧠 Model classes: [{}]</p>", classes.join(" "));
                }
                let _ = writeln!(
                    html,
                    "<p class=\"success\"><strong>{}</strong></p>",
                    verdict_message(prediction.verdict)
                );
            }
        }
    }

    fn render_history(&self, html: &mut String) {
        match &self.history {
            HistoryView::Empty => {
                let _ = writeln!(html, "<p class=\"info\">{}</p>", NO_HISTORY);
            }
            HistoryView::Entries(entries) => {
                html.push_str("<ul class=\"history\">\n");
                for entry in entries {
                    let _ = writeln!(
                        html,
                        "<li>🕒 <strong>{}</strong><br>📝 <em>{}</em><br>🔎 <strong>Result</strong>: {}</li>",
                        escape_html(&entry.timestamp),
                        escape_html(&entry.excerpt),
                        entry.result
                    );
                }
                html.push_str("</ul>\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassProbabilities;
    use crate::history::HistoryEntryView;

    fn prediction(verdict: Verdict) -> Prediction {
        Prediction {
            verdict,
            raw_class: if verdict == Verdict::Real { 1 } else { 0 },
            probabilities: ClassProbabilities { fake: 0.12, real: 0.88 },
            classes: vec![0, 1],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_empty_page() {
        let html = Page { input: "", outcome: None, history: HistoryView::Empty, diagnostics: false }.render();
        assert!(html.contains("Fake News Detection"));
        assert!(html.contains("<details>"));
        assert!(html.contains(NO_HISTORY));
    }

    #[test]
    fn test_verdict_with_diagnostics() {
        let html = Page {
            input: "Breaking",
            outcome: Some(Outcome::Verdict(prediction(Verdict::Real))),
            history: HistoryView::Empty,
            diagnostics: true,
        }
        .render();
        assert!(html.contains("This news seems REAL."));
        assert!(html.contains("FAKE: 0.1200, REAL: 0.8800"));
        assert!(html.contains("Raw prediction: 1"));
        assert!(html.contains("Model classes: [0 1]"));
    }

    #[test]
    fn test_diagnostics_hidden_by_default() {
        let html = Page {
            input: "",
            outcome: Some(Outcome::Verdict(prediction(Verdict::Fake))),
            history: HistoryView::Empty,
            diagnostics: false,
        }
        .render();
        assert!(html.contains("This news seems FAKE."));
        assert!(html.contains("📊 Probabilities → FAKE: 0.1200, REAL: 0.8800"));
        assert!(!html.contains("Raw prediction"));
        assert!(!html.contains("Model classes"));
    }

    #[test]
    fn test_history_entries_are_escaped() {
        let html = Page {
            input: "<b>",
            outcome: None,
            history: HistoryView::Entries(vec![HistoryEntryView {
                timestamp: "2024-01-01 00:00:00".into(),
                excerpt: "<img src=x>...".into(),
                result: Verdict::Fake,
            }]),
            diagnostics: false,
        }
        .render();
        assert!(html.contains("&lt;img src=x&gt;..."));
        assert!(html.contains(">&lt;b&gt;</textarea>"));
        assert!(!html.contains("<img src=x>"));
        assert!(html.contains("<strong>Result</strong>: FAKE"));
    }
}
