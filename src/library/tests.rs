use super::*;
use crate::config::TrackDisplayField;
use crate::error::CatalogError;

fn t(id: u64, title: &str, artist: &str, album: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: artist.into(),
        album: album.into(),
        duration_secs: 180,
        audio_url: format!("/music/{title}.mp3"),
        is_liked: false,
    }
}

fn sample() -> Vec<Track> {
    vec![
        t(1, "Blackened", "Metallica", "...And Justice for All"),
        t(2, "Paranoid", "Black Sabbath", "Paranoid"),
        t(3, "Teardrop", "Massive Attack", "Mezzanine"),
    ]
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let track = t(1, "Song", "  Artist  ", "");
    assert_eq!(
        display_from_fields(
            &track,
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - "
        ),
        "Artist - Song"
    );

    // Empty album is skipped rather than leaving a dangling separator.
    assert_eq!(
        display_from_fields(
            &track,
            &[TrackDisplayField::Album, TrackDisplayField::Title],
            " - "
        ),
        "Song"
    );
    assert_eq!(
        display_from_fields(&track, &[TrackDisplayField::Filename], " - "),
        "Song"
    );
}

#[test]
fn format_time_renders_minutes_and_padded_seconds() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(-3.0), "0:00");
    assert_eq!(format_time(5.9), "0:05");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(3600.0), "60:00");
}

#[test]
fn search_matches_title_artist_and_album_case_insensitively() {
    let catalog = Catalog::new(sample(), LikeStore::in_memory());

    let ids = |q: &str| catalog.search(q).iter().map(|t| t.id).collect::<Vec<_>>();
    assert_eq!(ids("black"), vec![1, 2]);
    assert_eq!(ids("MEZZ"), vec![3]);
    assert_eq!(ids("paranoid"), vec![2]);
    assert!(ids("   ").is_empty());
    assert!(ids("nothing here").is_empty());
}

#[test]
fn get_by_id_and_ids() {
    let catalog = Catalog::new(sample(), LikeStore::in_memory());

    assert_eq!(catalog.get_by_id(2).unwrap().title, "Paranoid");
    assert!(matches!(
        catalog.get_by_id(42),
        Err(CatalogError::TrackNotFound(42))
    ));

    let got: Vec<u64> = catalog.get_by_ids(&[3, 1, 99]).iter().map(|t| t.id).collect();
    assert_eq!(got, vec![1, 3]);
}

#[test]
fn toggle_like_flips_flag_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("likes.toml");

    let mut catalog = Catalog::new(sample(), LikeStore::at(&path));
    let liked = catalog.toggle_like(3).unwrap();
    assert!(liked.is_liked);
    assert_eq!(catalog.liked().len(), 1);
    assert_eq!(catalog.liked_indices(), vec![2]);
    assert!(path.exists());

    // A fresh catalog over the same store sees the like.
    let reloaded = Catalog::new(sample(), LikeStore::at(&path));
    assert!(reloaded.get_by_id(3).unwrap().is_liked);

    let unliked = catalog.toggle_like(3).unwrap();
    assert!(!unliked.is_liked);
    assert!(catalog.liked().is_empty());

    assert!(matches!(
        catalog.toggle_like(7),
        Err(CatalogError::TrackNotFound(7))
    ));
}

#[test]
fn unreadable_likes_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("likes.toml");
    std::fs::write(&path, "liked = 12").unwrap();

    let catalog = Catalog::new(sample(), LikeStore::at(&path));
    assert!(catalog.liked().is_empty());
}

#[test]
fn track_duration_is_none_when_unknown() {
    let mut track = t(1, "Song", "", "");
    assert_eq!(track.duration(), Some(std::time::Duration::from_secs(180)));
    track.duration_secs = 0;
    assert_eq!(track.duration(), None);
}

fn discography() -> Vec<Track> {
    vec![
        t(1, "Blackened", "Metallica", "...And Justice for All"),
        t(2, "One", "Metallica", "...And Justice for All"),
        t(3, "Battery", "metallica", "Master of Puppets"),
        t(4, "Paranoid", "Black Sabbath", "Paranoid"),
        t(5, "Loose Track", "Black Sabbath", ""),
        t(6, "Untagged", "", ""),
    ]
}

#[test]
fn albums_group_tracks_by_artist_and_album_tag() {
    let catalog = Catalog::new(discography(), LikeStore::in_memory());

    let albums: Vec<(&str, &str, Vec<u64>)> = catalog
        .albums()
        .iter()
        .map(|a| (a.artist.as_str(), a.title.as_str(), a.track_ids.clone()))
        .collect();
    assert_eq!(
        albums,
        vec![
            ("Black Sabbath", "Paranoid", vec![4]),
            ("Metallica", "...And Justice for All", vec![1, 2]),
            ("metallica", "Master of Puppets", vec![3]),
        ]
    );
    let ids: Vec<u64> = catalog.albums().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(catalog.album(2).unwrap().duration_secs, 360);

    let titles: Vec<String> = catalog
        .album_tracks(2)
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Blackened", "One"]);
    assert!(matches!(
        catalog.album_tracks(9),
        Err(CatalogError::AlbumNotFound(9))
    ));
}

#[test]
fn album_lookup_by_artist_and_search() {
    let catalog = Catalog::new(discography(), LikeStore::in_memory());

    let by_artist: Vec<&str> = catalog
        .albums_by_artist("METAL")
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(by_artist, vec!["...And Justice for All", "Master of Puppets"]);

    let found: Vec<u64> = catalog.search_albums("paranoid").iter().map(|a| a.id).collect();
    assert_eq!(found, vec![1]);
    assert_eq!(catalog.search_albums("sabbath").len(), 1);
    assert!(catalog.search_albums("  ").is_empty());
}

#[test]
fn artists_collect_their_tracks_and_albums() {
    let catalog = Catalog::new(discography(), LikeStore::in_memory());

    let names: Vec<&str> = catalog.artists().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Black Sabbath", "Metallica"]);

    let metallica = catalog.artist(2).unwrap();
    assert_eq!(metallica.track_ids, vec![1, 2, 3]);
    let albums: Vec<u64> = catalog.artist_albums(2).unwrap().iter().map(|a| a.id).collect();
    assert_eq!(albums, vec![2, 3]);

    let sabbath: Vec<u64> = catalog.artist_tracks(1).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(sabbath, vec![4, 5]);

    assert_eq!(catalog.search_artists("bLaCk").len(), 1);
    assert!(catalog.search_artists("").is_empty());
    assert!(matches!(
        catalog.artist(7),
        Err(CatalogError::ArtistNotFound(7))
    ));
}

#[test]
fn playlists_create_edit_and_delete() {
    let mut catalog = Catalog::new(sample(), LikeStore::in_memory());
    assert!(catalog.playlists().is_empty());

    let first = catalog.create_playlist("  Road Trip ", "long drives").unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.name, "Road Trip");
    assert_eq!(first.description, "long drives");
    assert!(first.tracks.is_empty());

    let second = catalog.create_playlist("", "").unwrap();
    assert_eq!(second.id, 2);
    assert_eq!(second.name, "New Playlist");

    let renamed = catalog
        .update_playlist(
            2,
            PlaylistUpdate {
                name: Some("Focus".into()),
                description: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Focus");
    assert_eq!(renamed.description, "");

    let deleted = catalog.delete_playlist(1).unwrap();
    assert_eq!(deleted.name, "Road Trip");
    assert_eq!(catalog.playlists().len(), 1);
    assert!(matches!(
        catalog.delete_playlist(1),
        Err(CatalogError::PlaylistNotFound(1))
    ));

    // Ids keep growing past the highest existing one.
    assert_eq!(catalog.create_playlist("Next", "").unwrap().id, 3);
}

#[test]
fn playlist_tracks_follow_playlist_order() {
    let mut catalog = Catalog::new(sample(), LikeStore::in_memory());
    let id = catalog.create_playlist("Mix", "").unwrap().id;

    catalog.add_to_playlist(id, 3).unwrap();
    catalog.add_to_playlist(id, 1).unwrap();
    let again = catalog.add_to_playlist(id, 3).unwrap();
    assert_eq!(again.tracks.len(), 2);

    let ids = |c: &Catalog| -> Vec<u64> { c.playlist_tracks(id).unwrap().iter().map(|t| t.id).collect() };
    assert_eq!(ids(&catalog), vec![3, 1]);
    assert_eq!(catalog.playlist_duration(id).unwrap(), 360);

    catalog.reorder_playlist(id, &[1, 3, 2]).unwrap();
    assert_eq!(ids(&catalog), vec![1, 3, 2]);

    catalog.remove_from_playlist(id, 3).unwrap();
    assert_eq!(ids(&catalog), vec![1, 2]);
    // Removing a track that is not in the playlist changes nothing.
    catalog.remove_from_playlist(id, 3).unwrap();
    assert_eq!(ids(&catalog), vec![1, 2]);

    assert!(matches!(
        catalog.add_to_playlist(id, 42),
        Err(CatalogError::TrackNotFound(42))
    ));
    assert!(matches!(
        catalog.reorder_playlist(id, &[1, 42]),
        Err(CatalogError::TrackNotFound(42))
    ));
    assert_eq!(ids(&catalog), vec![1, 2]);
    assert!(matches!(
        catalog.add_to_playlist(9, 1),
        Err(CatalogError::PlaylistNotFound(9))
    ));
}

#[test]
fn playlists_persist_across_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("playlists.toml");

    let mut catalog =
        Catalog::new(sample(), LikeStore::in_memory()).with_playlists(PlaylistStore::at(&path));
    let id = catalog.create_playlist("Keepers", "").unwrap().id;
    catalog.add_to_playlist(id, 2).unwrap();
    assert!(path.exists());

    // Entries are stored by file, so renumbered ids still resolve.
    let mut rescanned = sample();
    rescanned.reverse();
    for (i, t) in rescanned.iter_mut().enumerate() {
        t.id = i as u64 + 10;
    }
    let reloaded =
        Catalog::new(rescanned, LikeStore::in_memory()).with_playlists(PlaylistStore::at(&path));
    assert_eq!(reloaded.playlists().len(), 1);
    let titles: Vec<String> = reloaded
        .playlist_tracks(id)
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Paranoid"]);
}

#[test]
fn failed_playlist_save_leaves_playlists_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut catalog = Catalog::new(sample(), LikeStore::in_memory())
        .with_playlists(PlaylistStore::at(blocker.join("playlists.toml")));
    assert!(matches!(
        catalog.create_playlist("Lost", ""),
        Err(CatalogError::Io(_))
    ));
    assert!(catalog.playlists().is_empty());
}

#[test]
fn unreadable_playlists_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlists.toml");
    std::fs::write(&path, "playlist = \"nope\"").unwrap();

    let catalog =
        Catalog::new(sample(), LikeStore::in_memory()).with_playlists(PlaylistStore::at(&path));
    assert!(catalog.playlists().is_empty());
}

#[test]
fn format_duration_uses_hours_only_when_needed() {
    assert_eq!(format_duration(0), "0m");
    assert_eq!(format_duration(59), "0m");
    assert_eq!(format_duration(540), "9m");
    assert_eq!(format_duration(3600 + 5 * 60 + 30), "1h 5m");
}

#[test]
fn track_reads_from_toml_without_liked_flag() {
    let track: Track = toml::from_str(
        r#"
        id = 4
        title = "Song"
        artist = "Artist"
        album = ""
        duration_secs = 61
        audio_url = "/music/song.mp3"
        "#,
    )
    .unwrap();
    assert_eq!(track.id, 4);
    assert!(!track.is_liked);
}
