/// Relationship ids assigned while a presentation is assembled.
///
/// Slide parts are related to their media before the slide XML is
/// generated, so the markup can carry the real `r:embed` ids.
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// (slide_index, image_index_in_slide) -> rId
    image_ids: HashMap<(usize, usize), String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_image(&mut self, slide_index: usize, image_index_in_slide: usize, rel_id: String) {
        self.image_ids
            .insert((slide_index, image_index_in_slide), rel_id);
    }

    pub fn get_image_id(&self, slide_index: usize, image_index_in_slide: usize) -> Option<&str> {
        self.image_ids
            .get(&(slide_index, image_index_in_slide))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_per_slide() {
        let mut map = RelationshipMapper::new();
        map.add_image(0, 0, "rId2".to_string());
        map.add_image(1, 0, "rId3".to_string());
        assert_eq!(map.get_image_id(0, 0), Some("rId2"));
        assert_eq!(map.get_image_id(1, 0), Some("rId3"));
        assert_eq!(map.get_image_id(1, 1), None);
    }
}
