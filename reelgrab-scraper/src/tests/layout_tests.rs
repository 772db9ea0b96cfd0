use super::*;
use crate::fixtures;

fn layout() -> LetterboxdLayout {
    LetterboxdLayout::new("https://letterboxd.com/")
}

#[test]
fn test_parses_posters_in_page_order() {
    let html = fixtures::page(&format!(
        "{}{}",
        fixtures::poster("Dune", "/film/dune-2021/", None),
        fixtures::poster("Paris, Texas", "/film/paris-texas/", None),
    ));
    let films = layout().parse_listing(&html);

    assert_eq!(films.len(), 2);
    assert_eq!(films[0].name, "Dune");
    assert_eq!(films[0].link, "https://letterboxd.com/film/dune-2021/");
    assert_eq!(films[1].name, "Paris, Texas");
    assert_eq!(films[1].rating, None);
}

#[test]
fn test_full_fixture_page_yields_every_poster() {
    let films = layout().parse_listing(&fixtures::watchlist_page("Film", 20));
    assert_eq!(films.len(), 20);
    assert_eq!(films[19].name, "Film 19");
}

#[test]
fn test_markup_without_posters_is_empty() {
    for markup in [
        "",
        "not html at all <<<>>>",
        "<html><body><p>This member's watchlist is empty.</p></body></html>",
        "<ul><li class=\"other\"><img alt=\"Decoy\"></li></ul>",
    ] {
        assert!(layout().parse_listing(markup).is_empty(), "{markup:?}");
    }
}

#[test]
fn test_missing_alt_and_link_degrade_to_unknown() {
    let html = fixtures::page(r#"<li class="poster-container"><div class="poster"></div></li>"#);
    let films = layout().parse_listing(&html);

    assert_eq!(films.len(), 1);
    assert_eq!(films[0].name, UNKNOWN);
    assert_eq!(films[0].link, UNKNOWN);
}

#[test]
fn test_falls_back_to_anchor_href() {
    let html = fixtures::page(
        r#"<li class="poster-container"><img alt="Heat"><a href="/film/heat-1995/">Heat</a></li>"#,
    );
    let films = layout().parse_listing(&html);
    assert_eq!(films[0].link, "https://letterboxd.com/film/heat-1995/");
}

#[test]
fn test_absolute_links_are_kept() {
    let html = fixtures::page(
        r#"<li class="poster-container"><img alt="Heat"><a href="https://boxd.it/2bDa">x</a></li>"#,
    );
    assert_eq!(layout().parse_listing(&html)[0].link, "https://boxd.it/2bDa");
}

#[test]
fn test_counts_rating_stars() {
    let html = fixtures::page(&format!(
        "{}{}{}",
        fixtures::poster("Five", "/film/five/", Some(" ★★★★★ ")),
        fixtures::poster("Three and a half", "/film/three/", Some("★★★½")),
        fixtures::poster("Unrated", "/film/unrated/", Some("")),
    ));
    let films = layout().parse_listing(&html);

    assert_eq!(films[0].rating, Some(5));
    assert_eq!(films[1].rating, Some(3));
    assert_eq!(films[2].rating, None);
}

#[test]
fn test_parses_release_year() {
    assert_eq!(layout().parse_release_year(&fixtures::detail_page(2021)), Some(2021));
}

#[test]
fn test_release_year_missing_or_garbled() {
    assert_eq!(layout().parse_release_year("<html></html>"), None);
    assert_eq!(
        layout().parse_release_year(r#"<a href="/films/year/soon/">TBA</a>"#),
        None
    );
}

#[test]
fn test_page_urls() {
    assert_eq!(
        watchlist_page_url("https://letterboxd.com/", "alice", 3),
        "https://letterboxd.com/alice/watchlist/page/3/"
    );
    assert_eq!(
        rated_page_url("https://letterboxd.com", "bob", 5, 1),
        "https://letterboxd.com/bob/films/rated/5/page/1/"
    );
}
