//! Box layout of a `VisualDocument` on a fixed-width canvas.
//!
//! Units are CSS pixels. The canvas is 794 px wide (A4 at 96 dpi) and as tall
//! as its content. Text uses a monospaced bitmap face, so a glyph advances by
//! exactly its font size and line breaking is a plain greedy word wrap.

use crate::preview::VisualDocument;

pub const CANVAS_WIDTH: f32 = 794.0;
pub const PADDING: f32 = 32.0;
const CONTENT_WIDTH: f32 = CANVAS_WIDTH - 2.0 * PADDING;
const LINE_HEIGHT: f32 = 1.5;
const BULLET_INDENT: f32 = 20.0;
const COLUMN_GAP: f32 = 16.0;

pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];
const ACCENT: Color = [30, 64, 175];
const TEXT: Color = [31, 41, 55];
const MUTED: Color = [75, 85, 99];
const RULE: Color = [229, 231, 235];
const BADGE: Color = [243, 244, 246];

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    color: Color,
}

const TITLE: TextStyle = TextStyle { size: 24.0, color: ACCENT };
const SUBTITLE: TextStyle = TextStyle { size: 16.0, color: TEXT };
const HEADING: TextStyle = TextStyle { size: 14.0, color: ACCENT };
const STRONG: TextStyle = TextStyle { size: 12.0, color: TEXT };
const BODY: TextStyle = TextStyle { size: 11.0, color: TEXT };
const SMALL: TextStyle = TextStyle { size: 10.0, color: MUTED };

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text; `y` is the top of the glyph cell.
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub ops: Vec<DrawOp>,
    pub width: f32,
    pub height: f32,
}

pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size
}

/// Cuts `text` to what fits in `max_width`, marking the cut with `..`.
pub fn fit_text(text: &str, size: f32, max_width: f32) -> String {
    let max_chars = (max_width / size).floor().max(0.0) as usize;
    let len = text.chars().count();
    if len <= max_chars {
        return text.to_string();
    }
    if max_chars <= 2 {
        return text.chars().take(max_chars).collect();
    }
    let mut cut: String = text.chars().take(max_chars - 2).collect();
    cut.push_str("..");
    cut
}

/// Greedy word wrap. Words longer than a whole line are split by character.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / size).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

struct Builder {
    ops: Vec<DrawOp>,
    y: f32,
}

impl Builder {
    fn gap(&mut self, h: f32) {
        self.y += h;
    }

    fn line(&mut self, x: f32, text: String, style: TextStyle) {
        let line_h = style.size * LINE_HEIGHT;
        self.ops.push(DrawOp::Text {
            x,
            y: self.y + (line_h - style.size) / 2.0,
            size: style.size,
            color: style.color,
            text,
        });
        self.y += line_h;
    }

    fn paragraph(&mut self, x: f32, width: f32, text: &str, style: TextStyle) {
        for line in wrap_text(text, style.size, width) {
            self.line(x, line, style);
        }
    }

    fn rule(&mut self, height: f32, color: Color) {
        self.ops.push(DrawOp::Rect {
            x: PADDING,
            y: self.y,
            w: CONTENT_WIDTH,
            h: height,
            color,
        });
        self.y += height;
    }

    /// Left text wraps in the space the right-aligned text leaves free.
    fn split_row(&mut self, left: &str, left_style: TextStyle, right: Option<&str>, right_style: TextStyle) {
        // The right column never takes more than half the row.
        let right = right
            .filter(|r| !r.trim().is_empty())
            .map(|r| fit_text(r, right_style.size, CONTENT_WIDTH / 2.0));
        let right_w = right
            .as_deref()
            .map(|r| text_width(r, right_style.size))
            .unwrap_or(0.0);
        let top = self.y;

        if let Some(right) = &right {
            let line_h = right_style.size * LINE_HEIGHT;
            self.ops.push(DrawOp::Text {
                x: (PADDING + CONTENT_WIDTH - right_w).max(PADDING),
                y: top + (line_h - right_style.size) / 2.0,
                size: right_style.size,
                color: right_style.color,
                text: right.clone(),
            });
        }

        let left_width = (CONTENT_WIDTH - right_w - COLUMN_GAP).max(left_style.size);
        self.paragraph(PADDING, left_width, left, left_style);

        let right_bottom = if right.is_some() {
            top + right_style.size * LINE_HEIGHT
        } else {
            top
        };
        self.y = self.y.max(right_bottom);
    }

    fn section_heading(&mut self, title: &str) {
        self.line(PADDING, title.to_string(), HEADING);
        self.gap(2.0);
        self.rule(1.0, RULE);
        self.gap(10.0);
    }

    fn bullets(&mut self, items: &[String]) {
        let x = PADDING + BULLET_INDENT;
        let width = CONTENT_WIDTH - BULLET_INDENT;
        for item in items {
            let marker = BODY.size * 0.35;
            let line_h = BODY.size * LINE_HEIGHT;
            self.ops.push(DrawOp::Rect {
                x: PADDING + 6.0,
                y: self.y + (line_h - marker) / 2.0,
                w: marker,
                h: marker,
                color: TEXT,
            });
            self.paragraph(x, width, item, BODY);
            self.gap(2.0);
        }
    }

    fn badges(&mut self, names: &[String]) {
        let pad_x = 8.0;
        let pad_y = 4.0;
        let badge_h = SMALL.size + 2.0 * pad_y;
        let mut x = PADDING;

        for name in names {
            let label = fit_text(name, SMALL.size, CONTENT_WIDTH - 2.0 * pad_x);
            let w = text_width(&label, SMALL.size) + 2.0 * pad_x;
            if x > PADDING && x + w > PADDING + CONTENT_WIDTH {
                x = PADDING;
                self.y += badge_h + 8.0;
            }
            self.ops.push(DrawOp::Rect {
                x,
                y: self.y,
                w,
                h: badge_h,
                color: BADGE,
            });
            self.ops.push(DrawOp::Text {
                x: x + pad_x,
                y: self.y + pad_y,
                size: SMALL.size,
                color: SMALL.color,
                text: label,
            });
            x += w + 8.0;
        }
        self.y += badge_h;
    }
}

pub fn layout(visual: &VisualDocument) -> LayoutResult {
    let mut b = Builder {
        ops: Vec::new(),
        y: PADDING,
    };

    let header = &visual.header;
    b.paragraph(PADDING, CONTENT_WIDTH, &header.name, TITLE);
    b.paragraph(PADDING, CONTENT_WIDTH, &header.job_title, SUBTITLE);
    if let Some(address) = &header.address {
        b.paragraph(PADDING, CONTENT_WIDTH, address, SMALL);
    }
    if !header.contacts.is_empty() {
        b.paragraph(PADDING, CONTENT_WIDTH, &header.contacts.join("    "), SMALL);
    }
    b.gap(8.0);
    b.rule(2.0, ACCENT);
    b.gap(20.0);

    if let Some(summary) = &visual.summary {
        b.paragraph(PADDING, CONTENT_WIDTH, summary, BODY);
        b.gap(20.0);
    }

    if let Some(experience) = &visual.experience {
        b.section_heading("Professional Experience");
        for block in experience {
            b.split_row(&block.position, STRONG, Some(&block.dates), SMALL);
            b.split_row(&block.company, BODY, block.location.as_deref(), SMALL);
            if let Some(bullets) = &block.bullets {
                b.gap(4.0);
                b.bullets(bullets);
            }
            b.gap(14.0);
        }
        b.gap(6.0);
    }

    if let Some(education) = &visual.education {
        b.section_heading("Education");
        for block in education {
            b.split_row(&block.degree_line, STRONG, Some(&block.dates), SMALL);
            b.split_row(&block.institution, BODY, block.location.as_deref(), SMALL);
            b.gap(14.0);
        }
        b.gap(6.0);
    }

    if let Some(skills) = &visual.skills {
        b.section_heading("Skills");
        b.badges(skills);
    }

    LayoutResult {
        ops: b.ops,
        width: CANVAS_WIDTH,
        height: b.y + PADDING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, ResumeDocument, SkillEntry};
    use crate::preview::project;

    fn texts(result: &LayoutResult) -> Vec<String> {
        result
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        assert_eq!(wrap_text("hello world", 10.0, 200.0), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_breaks_at_word_boundary() {
        // 10 chars per line
        let lines = wrap_text("alpha beta gamma", 10.0, 100.0);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let lines = wrap_text("abcdefghijkl xy", 10.0, 50.0);
        assert_eq!(lines, vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn test_wrap_blank_text_has_no_lines() {
        assert!(wrap_text("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_layout_empty_document_is_short() {
        let result = layout(&project(&ResumeDocument::default()));
        assert_eq!(result.width, CANVAS_WIDTH);
        assert!(result.height < 200.0, "height was {}", result.height);
    }

    #[test]
    fn test_layout_includes_section_text() {
        let mut doc = ResumeDocument::default();
        doc.personal_info.first_name = "Ada".into();
        doc.experiences.push(ExperienceEntry {
            position: "Engineer".into(),
            start_date: "01/2020".into(),
            description: vec!["Built things".into()],
            ..ExperienceEntry::blank("1".into())
        });
        doc.skills.push(SkillEntry {
            id: "2".into(),
            name: "Rust".into(),
        });

        let all = texts(&layout(&project(&doc)));
        for expected in ["Ada", "Professional Experience", "Engineer", "01/2020", "Built things", "Skills", "Rust"] {
            assert!(all.iter().any(|t| t == expected), "missing {expected:?} in {all:?}");
        }
        assert!(!all.iter().any(|t| t == "Education"));
    }

    #[test]
    fn test_layout_height_grows_with_content() {
        let mut doc = ResumeDocument::default();
        let short = layout(&project(&doc)).height;
        doc.personal_info.summary = "word ".repeat(400);
        let long = layout(&project(&doc)).height;
        assert!(long > short + 100.0);
    }

    #[test]
    fn test_all_ops_within_canvas_width() {
        let mut doc = ResumeDocument::default();
        doc.personal_info.summary = "x".repeat(500);
        doc.skills = (0..40)
            .map(|i| SkillEntry {
                id: i.to_string(),
                name: format!("skill-{i}"),
            })
            .collect();
        let result = layout(&project(&doc));
        for op in &result.ops {
            match op {
                DrawOp::Text { x, size, text, .. } => {
                    assert!(x + text_width(text, *size) <= CANVAS_WIDTH - PADDING + 0.01, "{text:?} overflows");
                }
                DrawOp::Rect { x, w, .. } => assert!(x + w <= CANVAS_WIDTH - PADDING + 0.01),
            }
        }
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("short", 10.0, 100.0), "short");
        assert_eq!(fit_text("abcdefghijkl", 10.0, 60.0), "abcd..");
        assert_eq!(fit_text("abc", 10.0, 20.0), "ab");
        assert_eq!(fit_text("abc", 10.0, 0.0), "");
    }

    #[test]
    fn test_long_labels_stay_inside_their_boxes() {
        let mut doc = ResumeDocument::default();
        doc.experiences.push(ExperienceEntry {
            position: "Engineer".into(),
            start_date: "a very long start date description ".repeat(4),
            ..ExperienceEntry::blank("1".into())
        });
        doc.skills.push(SkillEntry {
            id: "2".into(),
            name: "x".repeat(200),
        });
        let result = layout(&project(&doc));

        let badge = result
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rect { x, w, color, .. } if *color == BADGE => Some((*x, *w)),
                _ => None,
            })
            .unwrap();
        for op in &result.ops {
            if let DrawOp::Text { x, size, text, .. } = op {
                let right = x + text_width(text, *size);
                assert!(right <= CANVAS_WIDTH - PADDING + 0.01, "{text:?} overflows the canvas");
                if text.starts_with("xxx") {
                    assert!(right <= badge.0 + badge.1 + 0.01, "skill label overflows its badge");
                    assert!(text.ends_with(".."));
                }
            }
        }
        assert!(texts(&result).iter().any(|t| t.starts_with("a very long") && t.ends_with("..")));
    }
}
