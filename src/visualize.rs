//! Colors, highlighted transcripts and SVG charts.

use std::f64::consts::PI;
use std::fmt::Write as _;

use serde::Serialize;

use crate::emotion::{Emotion, EmotionScores, WordScores, dominant_of};

pub const DEFAULT_RADAR_TITLE: &str = "Emotion Profile";

pub fn emotion_color(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Joy => "#FFD700",
        Emotion::Anger => "#FF4444",
        Emotion::Sadness => "#4488FF",
        Emotion::Fear => "#9944CC",
        Emotion::Surprise => "#FF8800",
        Emotion::Disgust => "#44AA44",
    }
}

/// Color of the word's dominant emotion, `None` for unscored words.
pub fn word_color(scores: &WordScores) -> Option<&'static str> {
    dominant_of(scores).map(emotion_color)
}

/// An unstemmed word paired with the weights its stem contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayWord {
    pub word: String,
    pub scores: WordScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Plain,
    Ansi,
    Html,
}

fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    (channel(1), channel(3), channel(5))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One line per sentence, words separated by single spaces.
pub fn render_transcript(sentences: &[Vec<DisplayWord>], mode: Highlight) -> String {
    let mut out = String::new();
    if mode == Highlight::Html {
        out.push_str("<div class=\"transcript\">\n");
    }
    for sentence in sentences {
        let words: Vec<String> = sentence
            .iter()
            .map(|w| match (mode, word_color(&w.scores)) {
                (Highlight::Ansi, Some(color)) => {
                    let (r, g, b) = hex_to_rgb(color);
                    format!("\x1b[38;2;{r};{g};{b}m{}\x1b[0m", w.word)
                }
                (Highlight::Html, Some(color)) => format!(
                    "<span style=\"color:{color}\">{}</span>",
                    escape_xml(&w.word)
                ),
                (Highlight::Html, None) => escape_xml(&w.word),
                _ => w.word.clone(),
            })
            .collect();
        if mode == Highlight::Html {
            let _ = writeln!(out, "<p>{}</p>", words.join(" "));
        } else {
            out.push_str(&words.join(" "));
            out.push('\n');
        }
    }
    if mode == Highlight::Html {
        out.push_str("</div>\n");
    }
    out
}

/// Standalone HTML page: summary and highlighted transcript with a legend.
pub fn render_html_page(title: &str, summary: &str, sentences: &[Vec<DisplayWord>]) -> String {
    let mut legend = String::new();
    for emotion in Emotion::ALL {
        let _ = write!(
            legend,
            "<span style=\"color:{}\">&#9632; {}</span> ",
            emotion_color(emotion),
            emotion
        );
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{t}</title></head>\n<body>\n<h1>{t}</h1>\n<pre>{s}</pre>\n<p>{legend}</p>\n{body}</body>\n</html>\n",
        t = escape_xml(title),
        s = escape_xml(summary),
        body = render_transcript(sentences, Highlight::Html),
    )
}

const RADAR_SIZE: f64 = 500.0;
const RADAR_RADIUS: f64 = 170.0;

/// Six-axis radar chart of a 0..1 profile as an SVG document.
pub fn radar_svg(profile: &EmotionScores, title: &str) -> String {
    let c = RADAR_SIZE / 2.0;
    let n = Emotion::ALL.len() as f64;
    // first axis points straight up, then clockwise
    let point = |i: usize, r: f64| {
        let angle = 2.0 * PI * i as f64 / n - PI / 2.0;
        (c + r * angle.cos(), c + 20.0 + r * angle.sin())
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{s}\" height=\"{h}\" viewBox=\"0 0 {s} {h}\">",
        s = RADAR_SIZE,
        h = RADAR_SIZE + 20.0
    );
    let _ = writeln!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");
    let _ = writeln!(
        svg,
        "<text x=\"{c}\" y=\"30\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"18\">{}</text>",
        escape_xml(title)
    );

    for ring in [0.25, 0.5, 0.75, 1.0] {
        let pts: Vec<String> = (0..Emotion::ALL.len())
            .map(|i| {
                let (x, y) = point(i, RADAR_RADIUS * ring);
                format!("{x:.1},{y:.1}")
            })
            .collect();
        let _ = writeln!(
            svg,
            "<polygon points=\"{}\" fill=\"none\" stroke=\"#CCCCCC\" stroke-width=\"1\"/>",
            pts.join(" ")
        );
    }

    for (i, emotion) in Emotion::ALL.into_iter().enumerate() {
        let (x, y) = point(i, RADAR_RADIUS);
        let (lx, ly) = point(i, RADAR_RADIUS + 25.0);
        let _ = writeln!(
            svg,
            "<line x1=\"{c}\" y1=\"{cy}\" x2=\"{x:.1}\" y2=\"{y:.1}\" stroke=\"#CCCCCC\"/>",
            cy = c + 20.0
        );
        let _ = writeln!(
            svg,
            "<text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"sans-serif\" font-size=\"13\">{emotion}</text>"
        );
    }

    let pts: Vec<String> = Emotion::ALL
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            let (x, y) = point(i, RADAR_RADIUS * profile.get(e).clamp(0.0, 1.0));
            format!("{x:.1},{y:.1}")
        })
        .collect();
    let _ = writeln!(
        svg,
        "<polygon points=\"{}\" fill=\"steelblue\" fill-opacity=\"0.25\" stroke=\"steelblue\" stroke-width=\"2\"/>",
        pts.join(" ")
    );
    svg.push_str("</svg>\n");
    svg
}

const TIMELINE_WIDTH: f64 = 800.0;
const TIMELINE_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 120.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Line chart of raw per-sentence scores. `None` with fewer than two
/// sentences, since there is no shift to show.
pub fn timeline_svg(per_sentence: &[EmotionScores]) -> Option<String> {
    if per_sentence.len() < 2 {
        return None;
    }
    let plot_w = TIMELINE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = TIMELINE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = per_sentence
        .iter()
        .map(EmotionScores::max)
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    let last = (per_sentence.len() - 1) as f64;
    let x_at = |i: usize| MARGIN_LEFT + plot_w * i as f64 / last;
    let y_at = |v: f64| MARGIN_TOP + plot_h * (1.0 - v / y_max);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{TIMELINE_WIDTH}\" height=\"{TIMELINE_HEIGHT}\" viewBox=\"0 0 {TIMELINE_WIDTH} {TIMELINE_HEIGHT}\">"
    );
    let _ = writeln!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"18\">Emotion Timeline</text>",
        MARGIN_LEFT + plot_w / 2.0
    );

    // axes
    let bottom = MARGIN_TOP + plot_h;
    let _ = writeln!(
        svg,
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{bottom}\" stroke=\"black\"/>"
    );
    let _ = writeln!(
        svg,
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{bottom}\" x2=\"{}\" y2=\"{bottom}\" stroke=\"black\"/>",
        MARGIN_LEFT + plot_w
    );
    for i in 0..per_sentence.len() {
        let _ = writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\">{}</text>",
            x_at(i),
            bottom + 16.0,
            i + 1
        );
    }
    for tick in 0..=4 {
        let v = y_max * tick as f64 / 4.0;
        let _ = writeln!(
            svg,
            "<text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"11\">{v:.2}</text>",
            MARGIN_LEFT - 6.0,
            y_at(v) + 4.0
        );
    }
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\">Sentence</text>",
        MARGIN_LEFT + plot_w / 2.0,
        TIMELINE_HEIGHT - 12.0
    );
    let _ = writeln!(
        svg,
        "<text x=\"16\" y=\"{y}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\" transform=\"rotate(-90 16 {y})\">Intensity</text>",
        y = MARGIN_TOP + plot_h / 2.0
    );

    for (row, emotion) in Emotion::ALL.into_iter().enumerate() {
        let color = emotion_color(emotion);
        let pts: Vec<(f64, f64)> = per_sentence
            .iter()
            .enumerate()
            .map(|(i, s)| (x_at(i), y_at(s.get(emotion))))
            .collect();
        let path: Vec<String> = pts.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
        let _ = writeln!(
            svg,
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>",
            path.join(" ")
        );
        for (x, y) in &pts {
            let _ = writeln!(
                svg,
                "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3.5\" fill=\"{color}\"/>"
            );
        }
        // legend
        let ly = MARGIN_TOP + 10.0 + row as f64 * 18.0;
        let lx = TIMELINE_WIDTH - MARGIN_RIGHT + 15.0;
        let _ = writeln!(
            svg,
            "<line x1=\"{lx}\" y1=\"{ly}\" x2=\"{}\" y2=\"{ly}\" stroke=\"{color}\" stroke-width=\"2\"/>",
            lx + 18.0
        );
        let _ = writeln!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">{emotion}</text>",
            lx + 24.0,
            ly + 4.0
        );
    }
    svg.push_str("</svg>\n");
    Some(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str, scores: &[(Emotion, f64)]) -> DisplayWord {
        DisplayWord {
            word: w.to_string(),
            scores: scores.iter().copied().collect(),
        }
    }

    #[test]
    fn word_color_follows_dominant_emotion() {
        let mut s = WordScores::new();
        assert_eq!(word_color(&s), None);
        s.insert(Emotion::Anger, 0.8);
        s.insert(Emotion::Fear, 0.3);
        assert_eq!(word_color(&s), Some("#FF4444"));
    }

    #[test]
    fn transcript_modes() {
        let sentences = vec![
            vec![word("thrilled", &[(Emotion::Joy, 0.9)]), word("trip", &[])],
            vec![word("terrified", &[(Emotion::Fear, 0.9)])],
        ];
        assert_eq!(
            render_transcript(&sentences, Highlight::Plain),
            "thrilled trip\nterrified\n"
        );
        let ansi = render_transcript(&sentences, Highlight::Ansi);
        assert!(ansi.contains("\x1b[38;2;255;215;0mthrilled\x1b[0m trip"));
        let html = render_transcript(&sentences, Highlight::Html);
        assert!(html.contains("<p><span style=\"color:#9944CC\">terrified</span></p>"));
    }

    #[test]
    fn radar_has_axis_per_emotion() {
        let mut p = EmotionScores::new();
        p.set(Emotion::Joy, 1.0);
        let svg = radar_svg(&p, DEFAULT_RADAR_TITLE);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Emotion Profile"));
        for e in Emotion::ALL {
            assert!(svg.contains(&format!(">{}</text>", e)));
        }
        assert_eq!(svg.matches("<polygon").count(), 5);
    }

    #[test]
    fn timeline_needs_two_sentences() {
        let one = vec![EmotionScores::new()];
        assert!(timeline_svg(&one).is_none());

        let mut a = EmotionScores::new();
        a.set(Emotion::Joy, 0.9);
        let mut b = EmotionScores::new();
        b.set(Emotion::Fear, 0.8);
        let svg = timeline_svg(&[a, b]).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 6);
        assert!(svg.contains("Emotion Timeline"));
        assert!(svg.contains("Sentence"));
        assert!(svg.contains("Intensity"));
    }
}
