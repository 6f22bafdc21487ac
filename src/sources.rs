//! Reading input documents into plain text.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::error::{EmotionError, Result};

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["txt", "md", "pdf", "docx", "odt"];

pub fn is_supported(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Reads a supported document as text, dispatching on the file extension.
pub fn read_text(path: &Path) -> Result<String> {
    match extension(path).as_deref() {
        Some("txt") | Some("md") => {
            let bytes = fs::read(path).map_err(|source| EmotionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Some("pdf") => pdf_extract::extract_text(path)
            .map_err(|e| EmotionError::Document(format!("{}: {e}", path.display()))),
        Some("docx") => extract_text_from_docx(path),
        Some("odt") => extract_text_from_odt(path),
        _ => Err(EmotionError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Markup of one zipped office format.
struct OfficeLayout {
    entry: &'static str,
    /// Elements whose character data is document text, whitespace included.
    text_runs: &'static [&'static [u8]],
    paragraph_ends: &'static [&'static [u8]],
    line_breaks: &'static [&'static [u8]],
    /// Empty elements standing for a space or a tab.
    spaces: &'static [&'static [u8]],
}

const DOCX: OfficeLayout = OfficeLayout {
    entry: "word/document.xml",
    text_runs: &[b"t"],
    paragraph_ends: &[b"p"],
    line_breaks: &[b"br", b"cr"],
    spaces: &[b"tab"],
};

const ODT: OfficeLayout = OfficeLayout {
    entry: "content.xml",
    text_runs: &[b"p", b"h"],
    paragraph_ends: &[b"p", b"h"],
    line_breaks: &[b"line-break", b"br"],
    spaces: &[b"s", b"tab"],
};

pub fn extract_text_from_docx(path: &Path) -> Result<String> {
    extract_office(path, &DOCX)
}

pub fn extract_text_from_odt(path: &Path) -> Result<String> {
    extract_office(path, &ODT)
}

fn extract_office(path: &Path, layout: &OfficeLayout) -> Result<String> {
    let doc_err = |msg: String| EmotionError::Document(format!("{}: {msg}", path.display()));
    let file = File::open(path).map_err(|source| EmotionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut zip = ZipArchive::new(file).map_err(|e| doc_err(e.to_string()))?;
    let mut entry = zip
        .by_name(layout.entry)
        .map_err(|_| doc_err(format!("missing {}", layout.entry)))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    parse_office_xml(&xml, layout).map_err(doc_err)
}

/// Text is taken verbatim inside text runs, so run boundaries in the middle
/// of a sentence keep their spaces. Character data between runs is markup
/// indentation and is skipped.
fn parse_office_xml(xml: &str, layout: &OfficeLayout) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut run_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if has_name(layout.text_runs, name.as_ref()) {
                    run_depth += 1;
                }
                push_empty_element(&mut out, layout, name.as_ref());
            }
            Ok(Event::Empty(e)) => push_empty_element(&mut out, layout, e.local_name().as_ref()),
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if has_name(layout.text_runs, name.as_ref()) {
                    run_depth = run_depth.saturating_sub(1);
                }
                if has_name(layout.paragraph_ends, name.as_ref()) {
                    out.push_str("\n\n");
                }
            }
            Ok(Event::Text(t)) if run_depth > 0 => {
                out.push_str(&t.decode().map_err(|e| e.to_string())?);
            }
            Ok(Event::CData(t)) if run_depth > 0 => {
                out.push_str(&t.decode().map_err(|e| e.to_string())?);
            }
            Ok(Event::GeneralRef(r)) if run_depth > 0 => {
                match r.resolve_char_ref().map_err(|e| e.to_string())? {
                    Some(ch) => out.push(ch),
                    None => {
                        let name = r.decode().map_err(|e| e.to_string())?;
                        match resolve_predefined_entity(&name) {
                            Some(s) => out.push_str(s),
                            None => return Err(format!("unknown entity &{name};")),
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse failed: {e}")),
            _ => {}
        }
    }
    Ok(collapse_blank_lines(&out))
}

fn push_empty_element(out: &mut String, layout: &OfficeLayout, name: &[u8]) {
    if has_name(layout.line_breaks, name) {
        out.push('\n');
    } else if has_name(layout.spaces, name) {
        out.push(' ');
    }
}

fn has_name(names: &[&[u8]], name: &[u8]) -> bool {
    names.iter().any(|n| *n == name)
}

/// Trims lines and keeps at most one blank line between paragraphs, so
/// paragraph ends still read as sentence boundaries.
fn collapse_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut blank = false;
    for line in s.lines().map(str::trim) {
        if line.is_empty() {
            blank = !out.is_empty();
            continue;
        }
        if blank {
            out.push('\n');
            blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docx_paragraphs_become_lines() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>I am happy</w:t></w:r></w:p>
            <w:p><w:r><w:t>First</w:t><w:br/><w:t>second</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = parse_office_xml(xml, &DOCX).unwrap();
        assert_eq!(text, "I am happy\n\nFirst\nsecond");
    }

    #[test]
    fn odt_headings_end_lines() {
        let xml = r#"<office:text xmlns:office="o" xmlns:text="t">
            <text:h>Title</text:h><text:p>Body text</text:p>
        </office:text>"#;
        let text = parse_office_xml(xml, &ODT).unwrap();
        assert_eq!(text, "Title\n\nBody text");
    }

    #[test]
    fn split_runs_keep_their_spaces() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p>
                <w:r><w:t xml:space="preserve">I am not </w:t></w:r>
                <w:r><w:t>happy</w:t></w:r>
            </w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_office_xml(xml, &DOCX).unwrap(), "I am not happy");
    }

    #[test]
    fn entities_are_resolved() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>They don&apos;t &amp; won&#8217;t &#x3C;3</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(
            parse_office_xml(xml, &DOCX).unwrap(),
            "They don't & won\u{2019}t <3"
        );
    }

    #[test]
    fn odt_space_elements_separate_words() {
        let xml = r#"<office:text xmlns:office="o" xmlns:text="t">
            <text:p>so<text:s/>very<text:tab/><text:span>glad</text:span></text:p>
        </office:text>"#;
        assert_eq!(parse_office_xml(xml, &ODT).unwrap(), "so very glad");
    }

    #[test]
    fn extension_dispatch() {
        assert!(is_supported(Path::new("a/b/notes.TXT")));
        assert!(is_supported(Path::new("x.docx")));
        assert!(!is_supported(Path::new("image.png")));
        assert!(matches!(
            read_text(Path::new("image.png")),
            Err(EmotionError::UnsupportedFormat(_))
        ));
    }
}
