//! Name derivations for labels, classes and slice keys.

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
///
/// `"visit_type"` becomes `"Visit_Type"`, `"arm"` becomes `"Arm"`.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

/// First character uppercased, the rest lowercased.
fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `"visit_date"` → `"Visit Date"`, used when a field has no label.
pub fn label_from_name(name: &str) -> String {
    name.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"visit_date"` → `"VisitDate"`, the local name of a field's code class.
pub fn class_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Slice-key local name for the slice-level dimensions seen so far.
pub fn slice_key_name<S: AsRef<str>>(slice_dimensions: &[S]) -> String {
    slice_dimensions
        .iter()
        .map(|d| title_case(d.as_ref()))
        .collect()
}
