//! Header-anchored SOAP section extraction.
//!
//! Each section runs from its header to the next known header or the end of
//! the text. A missing header leaves that section empty; parsing never fails.

const SECTION_HEADERS: [&str; 4] = ["subjective", "objective", "assessment", "plan"];

/// Split a raw model response into (subjective, objective, assessment, plan).
pub fn parse_soap_sections(raw: &str) -> (String, String, String, String) {
    // ASCII lowercase preserves byte offsets, so positions found in the
    // lowered copy index the original text directly.
    let lower = raw.to_ascii_lowercase();

    // First occurrence of each header, ordered by position.
    let mut anchors: Vec<(usize, usize)> = SECTION_HEADERS
        .iter()
        .enumerate()
        .filter_map(|(index, header)| lower.find(header).map(|pos| (pos, index)))
        .collect();
    anchors.sort_unstable();

    let mut sections: [String; 4] = Default::default();
    for (slot, &(pos, index)) in anchors.iter().enumerate() {
        let content_start = pos + SECTION_HEADERS[index].len();
        let content_end = anchors
            .get(slot + 1)
            .map(|&(next_pos, _)| next_pos)
            .unwrap_or(raw.len());
        let content = raw[content_start..content_end]
            .trim_start_matches([':', '-', ' ', '\t'])
            .trim();
        sections[index] = content.to_string();
    }

    let [subjective, objective, assessment, plan] = sections;
    (subjective, objective, assessment, plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_four_sections() {
        let raw = "SUBJECTIVE: Reports fatigue.\nOBJECTIVE: BP 120/80.\nASSESSMENT: Stable.\nPLAN: Recheck in a month.";
        let (s, o, a, p) = parse_soap_sections(raw);
        assert_eq!(s, "Reports fatigue.");
        assert_eq!(o, "BP 120/80.");
        assert_eq!(a, "Stable.");
        assert_eq!(p, "Recheck in a month.");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let raw = "Subjective: a\nobjective: b\nAssessment: c\nplan: d";
        let (s, o, a, p) = parse_soap_sections(raw);
        assert_eq!((s.as_str(), o.as_str(), a.as_str(), p.as_str()), ("a", "b", "c", "d"));
    }

    #[test]
    fn missing_header_leaves_field_empty() {
        let raw = "SUBJECTIVE: tired all day.\nPLAN: rest and fluids.";
        let (s, o, a, p) = parse_soap_sections(raw);
        assert_eq!(s, "tired all day.");
        assert!(o.is_empty());
        assert!(a.is_empty());
        assert_eq!(p, "rest and fluids.");
    }

    #[test]
    fn empty_input_yields_empty_sections() {
        let (s, o, a, p) = parse_soap_sections("");
        assert!(s.is_empty() && o.is_empty() && a.is_empty() && p.is_empty());
    }

    #[test]
    fn sections_out_of_order_still_bound_each_other() {
        let raw = "PLAN: follow up.\nSUBJECTIVE: headaches.";
        let (s, _, _, p) = parse_soap_sections(raw);
        assert_eq!(p, "follow up.");
        assert_eq!(s, "headaches.");
    }

    #[test]
    fn multiline_sections_are_preserved() {
        let raw = "SUBJECTIVE:\nLine one.\nLine two.\nOBJECTIVE: vitals below.";
        let (s, o, _, _) = parse_soap_sections(raw);
        assert_eq!(s, "Line one.\nLine two.");
        assert_eq!(o, "vitals below.");
    }

    #[test]
    fn preamble_before_first_header_is_dropped() {
        let raw = "Here is the note you asked for.\n\nSUBJECTIVE: cough.\nOBJECTIVE: clear lungs.\nASSESSMENT: viral.\nPLAN: fluids.";
        let (s, _, _, _) = parse_soap_sections(raw);
        assert_eq!(s, "cough.");
    }

    #[test]
    fn non_ascii_content_does_not_break_offsets() {
        let raw = "SUBJECTIVE: migraine aura \u{2014} photophobia.\nOBJECTIVE: BP 118/76.";
        let (s, o, _, _) = parse_soap_sections(raw);
        assert!(s.contains("photophobia"));
        assert_eq!(o, "BP 118/76.");
    }
}
