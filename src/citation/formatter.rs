use super::builder::{Citation, PersonLine};

/// Appended to lines completed from a cross-referenced family.
pub const ENHANCED_MARKER: &str = "[+]";

/// Prefix of the target person's line.
const TARGET_MARKER: &str = "→ ";

fn header(citation: &Citation) -> String {
    match citation.page_references.len() {
        0 => format!("Information on family {} includes:", citation.family_id),
        1 => format!(
            "Information on page {} includes:",
            citation.page_references[0]
        ),
        _ => format!(
            "Information on pages {} includes:",
            citation.page_references.join(", ")
        ),
    }
}

fn name_with_markers(line: &PersonLine) -> String {
    if line.note_markers.is_empty() {
        line.name.clone()
    } else {
        format!("{} {}", line.name, line.note_markers.join(" "))
    }
}

/// `Antti Korvela (b 1750, d 1810)`, dates only when known.
fn spouse_text(line: &PersonLine) -> Option<String> {
    let spouse = line.spouse.as_deref()?;
    let mut dates = Vec::new();
    if let Some(birth) = &line.spouse_birth {
        dates.push(format!("b {}", birth));
    }
    if let Some(death) = &line.spouse_death {
        dates.push(format!("d {}", death));
    }
    if dates.is_empty() {
        Some(spouse.to_string())
    } else {
        Some(format!("{} ({})", spouse, dates.join(", ")))
    }
}

/// One person as a comma-separated line: name, birth, marriage, death.
fn person_text(line: &PersonLine) -> String {
    let mut parts = vec![name_with_markers(line)];
    if let Some(birth) = &line.birth {
        parts.push(format!("b {}", birth));
    }
    match (spouse_text(line), &line.marriage) {
        (Some(spouse), Some(marriage)) => parts.push(format!("m {} {}", spouse, marriage)),
        (Some(spouse), None) => parts.push(format!("m {}", spouse)),
        (None, Some(marriage)) => parts.push(format!("m {}", marriage)),
        (None, None) => {}
    }
    if let Some(death) = &line.death {
        parts.push(format!("d {}", death));
    }

    let mut text = parts.join(", ");
    if line.is_target {
        text.insert_str(0, TARGET_MARKER);
    }
    if line.enhanced {
        text.push(' ');
        text.push_str(ENHANCED_MARKER);
    }
    text
}

/// Formats a citation as plain text, one item per line.
///
/// Missing dates are left out; a family without couples renders only the
/// header and its notes.
pub fn format_citation_as_text(citation: &Citation) -> String {
    let mut out = String::new();
    out.push_str(&header(citation));
    out.push('\n');

    for parent in &citation.parents {
        out.push_str(&person_text(parent));
        out.push('\n');
    }
    if let Some(marriage) = &citation.marriage {
        out.push_str(&format!("m {}\n", marriage));
    }

    if !citation.children.is_empty() {
        out.push_str("Children:\n");
        for child in &citation.children {
            out.push_str(&person_text(child));
            out.push('\n');
        }
    }
    if let Some(count) = citation.children_died_infancy.filter(|c| *c > 0) {
        out.push_str(&format!("Children died in infancy: {}\n", count));
    }

    for extra in &citation.additional_spouses {
        let mut text = format!("Additional spouse: {}", person_text(&extra.spouse));
        if let Some(marriage) = &extra.marriage {
            text.push_str(&format!(", m {}", marriage));
        }
        out.push_str(&text);
        out.push('\n');
    }

    if !citation.notes.is_empty() || !citation.note_definitions.is_empty() {
        out.push_str("Notes:\n");
        for note in &citation.notes {
            out.push_str(note);
            out.push('\n');
        }
        for (marker, text) in &citation.note_definitions {
            out.push_str(&format!("{} {}\n", marker, text));
        }
    }

    let sources: Vec<String> = citation
        .parents
        .iter()
        .chain(citation.children.iter())
        .filter(|line| line.enhanced)
        .map(|line| format!("{}: {}", line.name, line.enhanced_from.join(", ")))
        .collect();
    if !sources.is_empty() {
        out.push_str(&format!(
            "{} = completed from a cross-referenced family ({})\n",
            ENHANCED_MARKER,
            sources.join("; ")
        ));
    }

    out
}

/// Formats a citation as pretty-printed JSON.
pub fn format_citation_as_json(citation: &Citation) -> String {
    serde_json::to_string_pretty(citation).unwrap_or_default()
}
