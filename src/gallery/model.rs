#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// The whole slideshow, in play order.
pub struct Gallery {
    /// Groups in play order.
    pub groups: Vec<Group>,
}

/// A thematic set of images sharing one background track.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Stable group id, e.g. `group1`.
    pub id: String,
    /// Background track played while the group is on screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_src: Option<String>,
    /// Images in slide order.
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One image of a group.
pub struct ImageEntry {
    /// Optional image id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource key.
    pub src: String,
    /// Optional caption shown with the slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Group {
    /// Empty group with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the background track.
    pub fn with_audio(mut self, src: impl Into<String>) -> Self {
        self.audio_src = Some(src.into());
        self
    }

    /// Append an image without id or caption.
    pub fn with_image(mut self, src: impl Into<String>) -> Self {
        self.images.push(ImageEntry {
            id: None,
            src: src.into(),
            caption: None,
        });
        self
    }

    /// Audio plus first image, skipping empty keys.
    pub fn critical_keys(&self) -> Vec<&str> {
        let audio = self.audio_src.as_deref();
        let first = self.images.first().map(|img| img.src.as_str());
        audio.into_iter().chain(first).filter(|s| !s.is_empty()).collect()
    }

    /// Every non-empty key the group references.
    pub fn keys(&self) -> Vec<&str> {
        self.audio_src
            .as_deref()
            .into_iter()
            .chain(self.images.iter().map(|img| img.src.as_str()))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/model.rs"]
mod tests;
