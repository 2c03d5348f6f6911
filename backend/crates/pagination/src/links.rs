//! Navigation link construction.

use url::Url;

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Build the absolute link to `page`, preserving every other query
/// parameter of `base`. The link to the first page drops the parameter.
///
/// # Examples
///
/// ```
/// use pagination::page_link;
/// use url::Url;
///
/// let base = Url::parse("http://localhost/ads?category=bikes&page=3").expect("url");
/// assert_eq!(page_link(&base, 4), "http://localhost/ads?category=bikes&page=4");
/// assert_eq!(page_link(&base, 1), "http://localhost/ads?category=bikes");
/// ```
#[must_use]
pub fn page_link(base: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_fragment(None);
    if retained.is_empty() && page <= 1 {
        link.set_query(None);
        return link.into();
    }

    {
        let mut pairs = link.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    link.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://h/ads", 2, "http://h/ads?page=2")]
    #[case("http://h/ads?page=2", 1, "http://h/ads")]
    #[case("http://h/ads?page=2&title=bike", 3, "http://h/ads?title=bike&page=3")]
    #[case("http://h/ads?title=red+bike&page=2", 1, "http://h/ads?title=red+bike")]
    #[case("http://h/ads?page=9#frag", 2, "http://h/ads?page=2")]
    fn link_replaces_only_the_page_parameter(
        #[case] base: &str,
        #[case] page: u32,
        #[case] expected: &str,
    ) {
        let base = Url::parse(base).expect("base url");
        assert_eq!(page_link(&base, page), expected);
    }
}
