/// Markers that introduce a tag filter inside workspace search text, checked in order.
const TAG_LABELS: [&str; 3] = ["tags:", "tag:", "t:"];

/// Split free-form workspace search text into `(text_search, tags_search)`.
///
/// Tokens are separated by single spaces. A token containing one of the tag
/// markers contributes whatever follows the marker as the tag filter; when
/// several tokens do, the last one wins. Every other token is kept, in order,
/// as the free-text filter.
pub fn parse_search_text(search_text: &str) -> (String, String) {
    let mut text_tokens: Vec<&str> = Vec::new();
    let mut tags_search = String::new();

    for token in search_text.split(' ') {
        let tags = TAG_LABELS
            .iter()
            .find_map(|label| token.split_once(label).map(|(_, tags)| tags));

        match tags {
            Some(tags) => tags_search = tags.to_string(),
            None => text_tokens.push(token),
        }
    }

    (text_tokens.join(" ").trim_end_matches(' ').to_string(), tags_search)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (String, String) {
        parse_search_text(input)
    }

    #[test]
    fn test_no_tags() {
        assert_eq!(parse("normalsearchstring"), ("normalsearchstring".into(), "".into()));
    }

    #[test]
    fn test_only_tags() {
        assert_eq!(parse("tags:12345"), ("".into(), "12345".into()));
        assert_eq!(parse("tags:prod"), ("".into(), "prod".into()));
    }

    #[test]
    fn test_tags_and_search_string() {
        assert_eq!(
            parse("normalsearchstring tags:12345"),
            ("normalsearchstring".into(), "12345".into())
        );
    }

    #[test]
    fn test_last_tag_clause_wins() {
        assert_eq!(
            parse("normalsearchstring tags:12345 tags:54321 normalsearchstring2"),
            ("normalsearchstring normalsearchstring2".into(), "54321".into())
        );
    }

    #[test]
    fn test_list_of_tags() {
        assert_eq!(parse("tags:12345,54321"), ("".into(), "12345,54321".into()));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse("t:12345"), ("".into(), "12345".into()));
        assert_eq!(parse("tag:12345"), ("".into(), "12345".into()));
    }

    #[test]
    fn test_all_empty() {
        assert_eq!(parse(""), ("".into(), "".into()));
    }
}
