//! Lenient tag-oriented XML extraction.
//!
//! The citydata endpoints return flat XML where every field of interest is
//! addressable by tag name, so extraction mirrors a DOM
//! `getElementsByTagName(...)[0]` lookup: first matching descendant wins,
//! a missing tag is simply absent, and numeric text that fails to parse
//! degrades to zero instead of failing the response.

use roxmltree::{Document, Node};

/// Returns the trimmed text of the first descendant element named `tag`,
/// or `None` if the tag is absent or empty.
#[must_use]
pub fn tag_text<'a>(doc: &'a Document<'_>, tag: &str) -> Option<&'a str> {
    first_named(doc.root_element(), tag).and_then(element_text)
}

/// Returns the trimmed text of the first child (at any depth) of `node`
/// named `tag`.
#[must_use]
pub fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    first_named(node, tag).and_then(element_text)
}

/// Returns every descendant element of the document named `tag`, in
/// document order.
pub fn tagged_elements<'a, 'input>(
    doc: &'a Document<'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.root_element()
        .descendants()
        .filter(move |node| node.is_element() && node.has_tag_name(tag))
}

/// Parses an optional numeric string, treating absence, surrounding
/// whitespace failures, thousands separators, and garbage all as zero.
#[must_use]
pub fn lenient_u64(value: Option<&str>) -> u64 {
    value
        .map(|text| text.trim().replace(',', ""))
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

fn first_named<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|candidate| candidate.is_element() && candidate.has_tag_name(tag))
}

fn element_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "<SeoulRtd.citydata_ppltn>\
        <AREA_NM>강남역</AREA_NM>\
        <AREA_PPLTN_MIN>30000</AREA_PPLTN_MIN>\
        <AREA_PPLTN_MAX> 32,000 </AREA_PPLTN_MAX>\
        <EMPTY></EMPTY>\
        </SeoulRtd.citydata_ppltn>";

    #[test]
    fn finds_first_tag_text() {
        let doc = Document::parse(BODY).unwrap();
        assert_eq!(tag_text(&doc, "AREA_NM"), Some("강남역"));
    }

    #[test]
    fn missing_tag_is_absent_not_an_error() {
        let doc = Document::parse(BODY).unwrap();
        assert_eq!(tag_text(&doc, "AREA_CONGEST_LVL"), None);
    }

    #[test]
    fn empty_tag_is_absent() {
        let doc = Document::parse(BODY).unwrap();
        assert_eq!(tag_text(&doc, "EMPTY"), None);
    }

    #[test]
    fn lenient_parse_accepts_separators_and_whitespace() {
        let doc = Document::parse(BODY).unwrap();
        assert_eq!(lenient_u64(tag_text(&doc, "AREA_PPLTN_MIN")), 30000);
        assert_eq!(lenient_u64(tag_text(&doc, "AREA_PPLTN_MAX")), 32000);
    }

    #[test]
    fn lenient_parse_degrades_to_zero() {
        assert_eq!(lenient_u64(None), 0);
        assert_eq!(lenient_u64(Some("확인 불가")), 0);
        assert_eq!(lenient_u64(Some("-12")), 0);
    }

    #[test]
    fn iterates_repeated_elements_in_order() {
        let body = "<root>\
            <CMRCL_RSB><RSB_MID_CTGR>한식</RSB_MID_CTGR></CMRCL_RSB>\
            <CMRCL_RSB><RSB_MID_CTGR>카페</RSB_MID_CTGR></CMRCL_RSB>\
            </root>";
        let doc = Document::parse(body).unwrap();
        let mids: Vec<_> = tagged_elements(&doc, "CMRCL_RSB")
            .filter_map(|node| child_text(node, "RSB_MID_CTGR"))
            .collect();
        assert_eq!(mids, vec!["한식", "카페"]);
    }
}
