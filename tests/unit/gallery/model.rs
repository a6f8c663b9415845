use super::*;

#[test]
fn descriptors_use_camel_case_json() {
    let group: Group = serde_json::from_str(
        r#"{
            "id": "group1",
            "audioSrc": "assets/group1.ogg",
            "images": [
                {"id": "g1-img1", "src": "assets/g1-img1.jpg", "caption": "View 1"},
                {"src": "assets/g1-img2.jpg"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(group.audio_src.as_deref(), Some("assets/group1.ogg"));
    assert_eq!(group.images.len(), 2);
    assert_eq!(group.images[0].caption.as_deref(), Some("View 1"));
    assert_eq!(group.images[1].id, None);

    let json = serde_json::to_value(&group).unwrap();
    assert_eq!(json["audioSrc"], "assets/group1.ogg");
    assert!(json["images"][1].get("caption").is_none());
}

#[test]
fn missing_audio_and_images_are_tolerated() {
    let group: Group = serde_json::from_str(r#"{"id": "bare"}"#).unwrap();
    assert!(group.audio_src.is_none());
    assert!(group.images.is_empty());
    assert!(group.critical_keys().is_empty());
    assert!(group.keys().is_empty());
}

#[test]
fn critical_keys_are_audio_and_first_image() {
    let group = Group::new("g")
        .with_audio("a.ogg")
        .with_image("1.jpg")
        .with_image("2.jpg");
    assert_eq!(group.critical_keys(), vec!["a.ogg", "1.jpg"]);
    assert_eq!(group.keys(), vec!["a.ogg", "1.jpg", "2.jpg"]);

    let silent = Group::new("s").with_image("").with_image("2.jpg");
    assert!(silent.critical_keys().is_empty());
    assert_eq!(silent.keys(), vec!["2.jpg"]);
}
