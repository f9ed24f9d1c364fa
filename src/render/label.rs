use crate::{chart::PedigreeChart, pedigree::record::HorseRecord, pedigree::tree::AncestorNode};

pub const NO_INBREEDING: &str = "No inbreeding detected within selected generations.";

/// From this generation on, wedge labels drop country tag and year.
pub const COMPACT_LABEL_GENERATION: u32 = 8;

/// `"{name} {year} ({key})"`; the year is omitted when absent and the key when it equals the
/// name. Unknown ancestors show `"{key} (not_found)"` or nothing.
pub fn display_label(node: &AncestorNode) -> String {
    match (&node.record, &node.unresolved_key) {
        (Some(rec), _) => record_label(rec),
        (None, Some(key)) => format!("{key} (not_found)"),
        (None, None) => String::new(),
    }
}

pub fn record_label(rec: &HorseRecord) -> String {
    let mut base = if rec.name.is_empty() {
        rec.primary_key.clone()
    } else {
        rec.name.clone()
    };
    if let Some(year) = rec.birth_year {
        base = format!("{base} {year}");
    }
    if base == rec.primary_key {
        return base;
    }
    format!("{base} ({})", rec.primary_key)
}

/// `"{name} {year}"` heading for the queried individual.
pub fn title_label(node: &AncestorNode) -> String {
    match (&node.record, &node.unresolved_key) {
        (Some(rec), _) => name_year(rec),
        (None, Some(key)) => format!("{key} (not_found)"),
        (None, None) => String::new(),
    }
}

fn name_year(rec: &HorseRecord) -> String {
    match rec.birth_year {
        Some(y) => format!("{} {y}", rec.name),
        None => rec.name.clone(),
    }
}

/// Remove a trailing `"(XXX)"` country tag.
pub fn strip_country(name: &str) -> &str {
    let trimmed = name.trim_end();
    if trimmed.ends_with(')')
        && let Some(open) = trimmed.rfind('(')
    {
        return trimmed[..open].trim_end();
    }
    trimmed
}

/// Two-line wedge label (`name` / `country year`), or the bare name for outer rings.
pub fn wedge_label(rec: &HorseRecord, depth: u32) -> String {
    if depth >= COMPACT_LABEL_GENERATION {
        return strip_country(&rec.name).to_owned();
    }
    let (name, country) = match rec.name.split_once('(') {
        Some((head, tail)) => (head.trim(), format!("({tail}")),
        None => (rec.name.as_str(), String::new()),
    };
    let second = match rec.birth_year {
        Some(y) => format!("{} {y}", country.trim()).trim().to_owned(),
        None => country.trim().to_owned(),
    };
    if second.is_empty() {
        name.to_owned()
    } else {
        format!("{name}\n{second}")
    }
}

/// `"Name 12.50% 3 x 4 / Other 6.25% 4 x 5"`, strongest contribution first.
pub fn inbreeding_summary(chart: &PedigreeChart) -> String {
    let parts: Vec<String> = chart
        .inbreeding
        .by_contribution()
        .into_iter()
        .map(|entry| {
            let name = chart
                .record_for(&entry.primary_key)
                .map(|r| strip_country(&r.name).to_owned())
                .unwrap_or_else(|| entry.primary_key.clone());
            let mut gens = entry.generations();
            gens.sort_unstable();
            let gens_text = gens
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" x ");
            format!("{name} {:.2}% {gens_text}", entry.contribution_percent())
        })
        .collect();
    if parts.is_empty() {
        NO_INBREEDING.to_string()
    } else {
        parts.join(" / ")
    }
}

/// Break a summary into lines of at most `max_chars`, preferring the `" / "` separators.
pub fn wrap_summary(summary: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for part in summary.split(" / ") {
        let candidate = if current.is_empty() {
            part.to_owned()
        } else {
            format!("{current} / {part}")
        };
        if candidate.chars().count() > max_chars && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, part.to_owned()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= max_chars {
            out.push(line);
            continue;
        }
        out.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
    }
    out
}

/// Escape text for HTML and SVG output.
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
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

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
