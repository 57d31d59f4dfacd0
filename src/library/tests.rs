use super::display::display_name_for;
use super::locator::LocatorRegistry;
use std::path::Path;

#[test]
fn display_name_strips_only_the_last_extension() {
    assert_eq!(display_name_for("Song.mp3"), "Song");
    assert_eq!(display_name_for("Live.at.Home.flac"), "Live.at.Home");
    assert_eq!(display_name_for("no_extension"), "no_extension");
}

#[test]
fn display_name_never_ends_up_empty() {
    assert_eq!(display_name_for(".ogg"), ".ogg");
    assert_eq!(display_name_for("trailing."), "trailing.");
}

#[test]
fn locators_are_unique_per_mint_and_resolve_to_their_path() {
    let registry = LocatorRegistry::new();
    let a = registry.mint(Path::new("/music/a.mp3"));
    let b = registry.mint(Path::new("/music/a.mp3"));

    assert_ne!(a, b);
    assert_eq!(registry.resolve(&a).unwrap(), Path::new("/music/a.mp3"));
    assert_eq!(registry.resolve(&b).unwrap(), Path::new("/music/a.mp3"));
    assert_eq!(registry.live(), 2);
}

#[test]
fn dropping_a_locator_releases_it() {
    let registry = LocatorRegistry::new();
    let a = registry.mint(Path::new("/music/a.mp3"));
    let b = registry.mint(Path::new("/music/b.mp3"));

    drop(a);
    assert_eq!(registry.live(), 1);
    assert!(registry.resolve(&b).is_some());

    drop(b);
    assert_eq!(registry.live(), 0);
}
