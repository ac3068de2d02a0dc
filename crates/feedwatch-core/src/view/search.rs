/// Case-insensitive substring match against any of `fields`.
/// Only an empty term matches everything; whitespace is significant.
pub fn matches_search<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
