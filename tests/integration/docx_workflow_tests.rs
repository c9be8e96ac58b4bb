/*!
 * End-to-end tests for tagging .docx documents
 */

use anyhow::Result;
use doctag::app_config::Config;
use doctag::docx::{xml, DocumentTagger, DocxArchive};
use doctag::errors::DocumentError;
use doctag::tagging::{ProcessingPool, TaggingRules};
use crate::common;

const BOLD: &str = "<w:rPr><w:b/></w:rPr>";
const ITALIC: &str = "<w:rPr><w:i/></w:rPr>";

fn document_tagger(config: &Config) -> DocumentTagger {
    common::init_test_logging();
    DocumentTagger::new(
        TaggingRules::from_config(config).unwrap(),
        config.document.clone(),
        ProcessingPool::new(config.workers).unwrap(),
    )
}

fn paragraph_texts(xml_text: &str) -> Vec<String> {
    xml::scan_paragraphs(xml_text)
        .iter()
        .map(|p| common::span_text(&p.spans(xml_text).unwrap()))
        .collect()
}

/// Body paragraphs, headers and footers are all tagged
#[test]
fn test_tagFile_withBodyAndHeader_shouldTagEveryContentPart() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = [
        common::formatted_paragraph(&[(BOLD, "CDEV"), ("", " annual report")]),
        common::paragraph("CANADA DEVELOPMENT INVESTMENT CORPORATION"),
        common::paragraph(""),
        common::paragraph("Results under IFRS"),
    ]
    .concat();
    let header = format!(
        "<w:hdr xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">{}</w:hdr>",
        common::paragraph("Prepared by the CFO")
    );
    let input = common::create_test_docx(temp_dir.path(), "report.docx", &body, &[("word/header1.xml", &header)])?;
    let output = temp_dir.path().join("report_translated.docx");

    let report = document_tagger(&common::test_config()).tag_file(&input, &output)?;

    assert_eq!(report.parts, 2);
    assert_eq!(report.paragraphs, 5);
    assert_eq!(report.tagged, 3);
    assert_eq!(report.brand_skipped, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.malformed, 0);

    let document = common::read_part(&output, "word/document.xml")?;
    assert_eq!(
        paragraph_texts(&document),
        vec![
            "CDEV [PROT] annual report [FR]",
            "CANADA DEVELOPMENT INVESTMENT CORPORATION [PROT]",
            "",
            "Results under IFRS [PROT] [FR]",
        ]
    );

    let header = common::read_part(&output, "word/header1.xml")?;
    assert_eq!(paragraph_texts(&header), vec!["Prepared by the CFO [FR]"]);
    Ok(())
}

/// Run properties stay attached to their runs
#[test]
fn test_tagFile_withFormattedRuns_shouldKeepEveryRunProperty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = common::formatted_paragraph(&[(BOLD, "Acme"), (ITALIC, " makes"), ("", " widgets")]);
    let input = common::create_test_docx(temp_dir.path(), "acme.docx", &body, &[])?;
    let output = temp_dir.path().join("acme_out.docx");

    document_tagger(&common::test_config()).tag_file(&input, &output)?;

    let document = common::read_part(&output, "word/document.xml")?;
    let paragraphs = xml::scan_paragraphs(&document);
    assert_eq!(paragraphs.len(), 1);

    let spans = paragraphs[0].spans(&document)?;
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0].formatting.0, BOLD);
    assert_eq!(spans[1].formatting.0, ITALIC);
    assert_eq!(spans[2].formatting.0, "");
    assert_eq!(common::span_text(&spans), "Acme [PROT] makes widgets [FR]");
    assert_eq!(document.matches("<w:r>").count(), 3);
    Ok(())
}

/// Styles and theme parts are left byte for byte
#[test]
fn test_tagFile_withStylesAndTheme_shouldLeaveThemUntouched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let styles = "<w:styles><w:p><w:r><w:t>CDEV style sample</w:t></w:r></w:p></w:styles>";
    let theme = "<a:theme><w:p><w:r><w:t>IFRS</w:t></w:r></w:p></a:theme>";
    let input = common::create_test_docx(
        temp_dir.path(),
        "styled.docx",
        &common::paragraph("CDEV"),
        &[("word/styles.xml", styles), ("word/theme/theme1.xml", theme)],
    )?;
    let output = temp_dir.path().join("styled_out.docx");

    let report = document_tagger(&common::test_config()).tag_file(&input, &output)?;

    assert_eq!(report.parts, 1);
    assert_eq!(common::read_part(&output, "word/styles.xml")?, styles);
    assert_eq!(common::read_part(&output, "word/theme/theme1.xml")?, theme);
    assert_eq!(common::read_part(&output, "[Content_Types].xml")?, common::read_part(&input, "[Content_Types].xml")?);
    Ok(())
}

/// Escaped characters survive the round trip
#[test]
fn test_tagFile_withEscapedText_shouldReEscape() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_docx(temp_dir.path(), "esc.docx", &common::paragraph("R&amp;D at CDEV &lt;draft&gt;"), &[])?;
    let output = temp_dir.path().join("esc_out.docx");

    document_tagger(&common::test_config()).tag_file(&input, &output)?;

    let document = common::read_part(&output, "word/document.xml")?;
    assert!(document.contains("R&amp;D at CDEV [PROT] &lt;draft&gt; [FR]"));
    assert_eq!(paragraph_texts(&document), vec!["R&D at CDEV [PROT] <draft> [FR]"]);
    Ok(())
}

/// Tagging an already tagged document changes nothing
#[test]
fn test_tagFile_appliedTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = [
        common::formatted_paragraph(&[(BOLD, "Acme"), ("", " under IFRS")]),
        common::paragraph("Plain sentence."),
    ]
    .concat();
    let input = common::create_test_docx(temp_dir.path(), "twice.docx", &body, &[])?;
    let first = temp_dir.path().join("first.docx");
    let second = temp_dir.path().join("second.docx");
    let tagger = document_tagger(&common::test_config());

    tagger.tag_file(&input, &first)?;
    tagger.tag_file(&first, &second)?;

    assert_eq!(
        common::read_part(&first, "word/document.xml")?,
        common::read_part(&second, "word/document.xml")?
    );
    Ok(())
}

/// Paragraphs nested in text boxes are tagged on their own
#[test]
fn test_tagPart_withTextBox_shouldTagNestedParagraphSeparately() {
    let xml_text = concat!(
        "<w:p><w:r><w:t xml:space=\"preserve\">Outer CDEV </w:t></w:r>",
        "<w:r><w:txbxContent><w:p><w:r><w:t>Inner IFRS</w:t></w:r></w:p></w:txbxContent></w:r>",
        "<w:r><w:t>text</w:t></w:r></w:p>"
    );
    let mut report = Default::default();

    let rewritten = document_tagger(&common::test_config()).tag_part(xml_text, &mut report);

    let mut texts = paragraph_texts(&rewritten);
    texts.sort();
    assert_eq!(texts, vec!["Inner IFRS [PROT] [FR]", "Outer CDEV [PROT] text [FR]"]);
}

#[test]
fn test_tagArchive_withTrailingSpaces_shouldPreserveWhitespace() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = "<w:p><w:r><w:t>CDEV</w:t></w:r><w:r><w:t xml:space=\"preserve\"> and more</w:t></w:r></w:p>";
    let input = common::create_test_docx(temp_dir.path(), "ws.docx", body, &[])?;
    let mut archive = DocxArchive::open(&input)?;

    document_tagger(&common::test_config()).tag_archive(&mut archive)?;

    let document = String::from_utf8(archive.entry("word/document.xml").unwrap().data.clone())?;
    let paragraphs = xml::scan_paragraphs(&document);
    let spans = paragraphs[0].spans(&document)?;
    assert_eq!(common::span_text(&spans), "CDEV [PROT] and more [FR]");
    for node in &paragraphs[0].nodes {
        let tag = &document[node.tag.clone()];
        let content = &document[node.content.clone()];
        if content.starts_with(' ') || content.ends_with(' ') {
            assert!(tag.contains("xml:space=\"preserve\""), "missing preserve on {tag}");
        }
    }
    Ok(())
}

#[test]
fn test_tagFile_withNonDocxZip_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("not_a_doc.docx");
    {
        use std::io::Write;
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path)?);
        zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())?;
        zip.write_all(b"hello")?;
        zip.finish()?;
    }

    let result = document_tagger(&common::test_config()).tag_file(&path, &temp_dir.path().join("out.docx"));

    assert!(matches!(result, Err(DocumentError::NotADocument(_))));
    Ok(())
}

#[test]
fn test_tagFile_withGarbageFile_shouldReportArchiveError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "garbage.docx", "this is not a zip")?;

    let result = document_tagger(&common::test_config()).tag_file(&path, &temp_dir.path().join("out.docx"));

    assert!(matches!(result, Err(DocumentError::Archive(_))));
    Ok(())
}
