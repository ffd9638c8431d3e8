mod common;

use std::time::Duration;

use common::{FakeSearch, titles, track};
use setlistify::{Error, resolver::CatalogResolver};

#[tokio::test]
async fn single_artist_resolves_every_song_in_order() {
    // later songs answer first
    let search = FakeSearch::new()
        .with("track:Bloody Mary artist:Lady Gaga", track("1", "Bloody Mary", &["Lady Gaga"]))
        .with("track:Abracadabra artist:Lady Gaga", track("2", "Abracadabra", &["Lady Gaga"]))
        .with("track:Judas artist:Lady Gaga", track("3", "Judas", &["Lady Gaga"]))
        .delayed("track:Bloody Mary artist:Lady Gaga", Duration::from_millis(30))
        .delayed("track:Abracadabra artist:Lady Gaga", Duration::from_millis(15));

    let resolver = CatalogResolver::new(&search);
    let resolved = resolver
        .resolve("Lady Gaga", &titles(&["Bloody Mary", "Abracadabra", "Judas"]))
        .await
        .unwrap();

    let ids: Vec<&str> = resolved.iter().map(|t| t.catalog_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(resolved[0].title, "Bloody Mary");
    assert_eq!(resolved[0].catalog_name, "Bloody Mary");
    assert_eq!(resolved[0].artist_names, vec!["Lady Gaga"]);
}

#[tokio::test]
async fn unmatched_songs_are_dropped_without_placeholder() {
    let search = FakeSearch::new()
        .with("track:One artist:Band", track("1", "One", &["Band"]))
        .with("track:Three artist:Band", track("3", "Three", &["Band"]))
        .delayed("track:One artist:Band", Duration::from_millis(10));

    let resolved = CatalogResolver::new(&search)
        .resolve("Band", &titles(&["One", "Two", "Three", "Four"]))
        .await
        .unwrap();

    let indices: Vec<usize> = resolved.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(resolved[1].title, "Three");
}

#[tokio::test]
async fn single_artist_does_not_fall_back() {
    let search = FakeSearch::new();

    let resolved = CatalogResolver::new(&search)
        .resolve("Lady Gaga", &titles(&["Unreleased Song"]))
        .await
        .unwrap();

    assert!(resolved.is_empty());
    assert_eq!(
        search.queries(),
        vec!["track:Unreleased Song artist:Lady Gaga"]
    );
}

#[tokio::test]
async fn co_billed_songs_fall_back_to_first_split_artist() {
    let search = FakeSearch::new()
        .with("track:HUMBLE. artist:Kendrick Lamar", track("k1", "HUMBLE.", &["Kendrick Lamar"]))
        .with("track:DNA. artist:Kendrick Lamar", track("k2", "DNA.", &["Kendrick Lamar"]));

    let resolved = CatalogResolver::new(&search)
        .resolve("Kendrick Lamar & SZA", &titles(&["HUMBLE.", "DNA."]))
        .await
        .unwrap();

    let ids: Vec<&str> = resolved.iter().map(|t| t.catalog_id.as_str()).collect();
    assert_eq!(ids, vec!["k1", "k2"]);

    // combined billing first, then the first artist, never the second
    let queries = search.queries();
    assert!(queries.contains(&"track:HUMBLE. artist:Kendrick Lamar & SZA".to_string()));
    assert!(!queries.iter().any(|q| q.ends_with("artist:SZA")));
}

#[tokio::test]
async fn fallback_tries_artists_in_billing_order() {
    let search = FakeSearch::new()
        .with("track:Snooze artist:SZA", track("s1", "Snooze", &["SZA"]));

    let resolved = CatalogResolver::new(&search)
        .resolve("Kendrick Lamar & SZA", &titles(&["Snooze"]))
        .await
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].catalog_id, "s1");
    assert_eq!(
        search.queries(),
        vec![
            "track:Snooze artist:Kendrick Lamar & SZA",
            "track:Snooze artist:Kendrick Lamar",
            "track:Snooze artist:SZA",
        ]
    );
}

#[tokio::test]
async fn combined_billing_match_skips_fallback() {
    let search = FakeSearch::new().with(
        "track:All The Stars artist:Kendrick Lamar & SZA",
        track("a1", "All The Stars", &["Kendrick Lamar", "SZA"]),
    );

    let resolved = CatalogResolver::new(&search)
        .resolve("Kendrick Lamar & SZA", &titles(&["All The Stars"]))
        .await
        .unwrap();

    assert_eq!(resolved[0].artist_names, vec!["Kendrick Lamar", "SZA"]);
    assert_eq!(search.queries().len(), 1);
}

#[tokio::test]
async fn empty_setlist_resolves_to_nothing() {
    let search = FakeSearch::new();
    let resolved = CatalogResolver::new(&search)
        .resolve("Lady Gaga", &[])
        .await
        .unwrap();

    assert!(resolved.is_empty());
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn auth_failure_propagates() {
    let search = FakeSearch::new()
        .with("track:One artist:Band", track("1", "One", &["Band"]))
        .failing("track:Two artist:Band", || {
            Error::AuthFailure("no refresh token available".to_string())
        });

    let result = CatalogResolver::new(&search)
        .resolve("Band", &titles(&["One", "Two"]))
        .await;

    assert!(matches!(result, Err(Error::AuthFailure(_))));
}

#[tokio::test]
async fn resolved_tracks_are_a_subsequence_of_the_setlist() {
    let setlist = titles(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    let mut search = FakeSearch::new();
    for (i, title) in setlist.iter().enumerate() {
        if i % 3 != 1 {
            let query = format!("track:{} artist:X", title);
            search = search
                .with(&query, track(&i.to_string(), title, &["X"]))
                .delayed(&query, Duration::from_millis((setlist.len() - i) as u64 * 3));
        }
    }

    let resolved = CatalogResolver::new(&search)
        .resolve("X", &setlist)
        .await
        .unwrap();

    let indices: Vec<usize> = resolved.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 2, 3, 5, 6]);
    for track in &resolved {
        assert_eq!(track.title, setlist[track.index]);
    }
}
