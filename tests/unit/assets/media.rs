use super::*;

#[test]
fn sniffs_common_containers() {
    assert_eq!(sniff_audio_container(b"OggS\0\x02"), Some(AudioContainer::Ogg));
    assert_eq!(sniff_audio_container(b"fLaC\0\0\0\x22"), Some(AudioContainer::Flac));
    assert_eq!(sniff_audio_container(b"ID3\x04\0"), Some(AudioContainer::Mp3));
    assert_eq!(sniff_audio_container(&[0xFF, 0xFB, 0x90, 0x00]), Some(AudioContainer::Mp3));
    assert_eq!(
        sniff_audio_container(b"RIFF\x24\0\0\0WAVEfmt "),
        Some(AudioContainer::Wav)
    );
    assert_eq!(
        sniff_audio_container(b"\0\0\0\x20ftypM4A "),
        Some(AudioContainer::Mp4)
    );
}

#[test]
fn rejects_unknown_or_truncated_headers() {
    assert_eq!(sniff_audio_container(b""), None);
    assert_eq!(sniff_audio_container(b"RIFF"), None);
    assert_eq!(sniff_audio_container(b"\x89PNG\r\n\x1a\n"), None);
    assert_eq!(sniff_audio_container(&[0xFF]), None);
}

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/b.jpg").unwrap(), "a/b.jpg");
    assert_eq!(normalize_rel_path("a\\b.jpg").unwrap(), "a/b.jpg");
    assert_eq!(normalize_rel_path("./a//b.jpg").unwrap(), "a/b.jpg");
    assert_eq!(normalize_rel_path("g1/./a.jpg").unwrap(), "g1/a.jpg");
}

#[test]
fn normalize_path_rejects_keys_outside_the_root() {
    let keys = [
        "../x.jpg",
        "a/../../x.jpg",
        "/etc/passwd",
        "\\share\\x.jpg",
        "C:\\x.jpg",
        "",
        "./",
    ];
    for key in keys {
        match normalize_rel_path(key) {
            Err(LoadError::InvalidKey { src, .. }) => assert_eq!(src, key),
            other => panic!("{key:?} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn resolve_joins_under_root() {
    let media = FsMediaSource::new("assets");
    assert_eq!(
        media.resolve("groups/g1/a.jpg").unwrap(),
        Path::new("assets").join("groups/g1/a.jpg")
    );
    assert!(matches!(
        media.resolve("../secret"),
        Err(LoadError::InvalidKey { .. })
    ));
    assert_eq!(media.root(), Path::new("assets"));
}
